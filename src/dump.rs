//! Post-run diagnostic dump.
//!
//! Prints the register block followed by a 10x10 grid for each requested
//! memory page.

use crate::cpu::{Cpu, PAGE_COUNT};
use std::io::{self, Write};

const GRID_HEADER: &str = "       0      1      2      3      4      5      6      7      8      9";

/// Write the register block and pages `start_page..=end_page`.
///
/// Pages past the end of memory are skipped; an empty range prints only
/// the registers.
pub fn write_dump<W: Write + ?Sized>(
    out: &mut W,
    cpu: &Cpu,
    start_page: usize,
    end_page: usize,
) -> io::Result<()> {
    let regs = &cpu.regs;

    writeln!(out)?;
    writeln!(out, "REGISTERS:")?;
    writeln!(out, "accumulator          {}", regs.accumulator)?;
    writeln!(out, "instructionCounter   {:04}", regs.counter)?;
    writeln!(out, "instructionRegister  {}", regs.instruction)?;
    writeln!(out, "operationCode        {:02}", regs.instruction.opcode())?;
    writeln!(out, "indexRegister        {:+06}", regs.index)?;
    writeln!(out)?;

    writeln!(out, "MEMORY:")?;
    for page in start_page..=end_page.min(PAGE_COUNT - 1) {
        let Ok(words) = cpu.mem.page(page) else {
            continue;
        };

        writeln!(out, "PAGE # {:02}", page)?;
        writeln!(out)?;
        writeln!(out, "{}", GRID_HEADER)?;
        for (row, cells) in words.chunks(10).enumerate() {
            write!(out, "{:3} ", row * 10)?;
            for cell in cells {
                write!(out, "{:06} ", cell.value())?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Word;

    fn dump_to_string(cpu: &Cpu, start_page: usize, end_page: usize) -> String {
        let mut buf = Vec::new();
        write_dump(&mut buf, cpu, start_page, end_page).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_register_block() {
        let mut cpu = Cpu::new();
        cpu.regs.accumulator = Word::new(7000).unwrap();
        cpu.regs.counter = 6;
        cpu.regs.instruction = Word::new(450_000).unwrap();
        cpu.regs.index = -3;

        let dump = dump_to_string(&cpu, 0, 0);
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "REGISTERS:");
        assert_eq!(lines[2], "accumulator          +07000");
        assert_eq!(lines[3], "instructionCounter   0006");
        assert_eq!(lines[4], "instructionRegister  +450000");
        assert_eq!(lines[5], "operationCode        45");
        assert_eq!(lines[6], "indexRegister        -00003");
        assert_eq!(lines[8], "MEMORY:");
    }

    #[test]
    fn test_page_grid() {
        let mut cpu = Cpu::new();
        cpu.mem.write(0, Word::new(100_007).unwrap()).unwrap();
        cpu.mem.write(19, Word::new(-42).unwrap()).unwrap();

        let dump = dump_to_string(&cpu, 0, 0);

        assert!(dump.contains("PAGE # 00\n\n"));
        assert!(dump.contains(GRID_HEADER));
        assert!(dump.contains("\n  0 100007 000000 000000"));
        assert!(dump.contains("\n 10 000000 000000 000000 000000 000000 000000 000000 000000 000000 -00042 \n"));
        assert!(dump.contains("\n 90 000000"));
    }

    #[test]
    fn test_page_range() {
        let mut cpu = Cpu::new();
        cpu.mem.write(512, Word::new(1).unwrap()).unwrap();

        let dump = dump_to_string(&cpu, 2, 5);
        assert!(!dump.contains("PAGE # 01"));
        for page in ["PAGE # 02", "PAGE # 03", "PAGE # 04", "PAGE # 05"] {
            assert!(dump.contains(page));
        }
        assert!(!dump.contains("PAGE # 06"));
        assert!(dump.contains("\n 10 000000 000000 000001 "));
    }

    #[test]
    fn test_empty_range() {
        let cpu = Cpu::new();
        let dump = dump_to_string(&cpu, 5, 2);
        assert!(dump.ends_with("MEMORY:\n"));
    }
}
