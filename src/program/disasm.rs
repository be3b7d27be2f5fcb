//! Disassembler for Simpletron programs.
//!
//! Converts memory words back to readable mnemonics.

use crate::cpu::decode::{decode, Opcode};
use crate::word::Word;

/// Disassemble a single word to text.
pub fn disassemble_word(word: Word) -> String {
    let instr = decode(word);
    match instr.opcode {
        Opcode::Unknown(_) => format!("??? ; {}", word),
        Opcode::LoadImmediate => format!("LOADIM {}", word.immediate().value()),
        Opcode::Halt => {
            let (start, end) = instr.halt_pages();
            format!("HALT {:02}-{:02}", start, end)
        }
        // These take their address from the index register, or no address.
        op if op.is_indexed() => op.mnemonic().to_string(),
        Opcode::Increment | Opcode::Decrement | Opcode::Swap => instr.opcode.mnemonic().to_string(),
        op => format!("{} {:04}", op.mnemonic(), instr.operand),
    }
}

/// Disassemble a program listing.
pub fn disassemble(words: &[Word]) -> String {
    let mut output = String::new();
    output.push_str("; Simpletron Disassembly\n");
    output.push_str("; ----------------------\n\n");

    for (addr, word) in words.iter().enumerate() {
        let line = disassemble_word(*word);
        output.push_str(&format!("{:02}: {:<16} ; {}\n", addr, line, word));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: i32) -> Word {
        Word::new(value).unwrap()
    }

    #[test]
    fn test_disassemble_direct() {
        assert_eq!(disassemble_word(word(100_007)), "READ 0007");
        assert_eq!(disassemble_word(word(-300_008)), "ADD 0008");
    }

    #[test]
    fn test_disassemble_special_forms() {
        assert_eq!(disassemble_word(word(-211_234)), "LOADIM -211234");
        assert_eq!(disassemble_word(word(450_205)), "HALT 02-05");
        assert_eq!(disassemble_word(word(310_000)), "ADDX");
        assert_eq!(disassemble_word(word(430_000)), "SWAP");
    }

    #[test]
    fn test_disassemble_data() {
        assert!(disassemble_word(word(4000)).starts_with("???"));
    }

    #[test]
    fn test_disassemble_listing() {
        let listing = disassemble(&[word(100_007), word(450_000)]);
        assert!(listing.contains("00: READ 0007"));
        assert!(listing.contains("01: HALT 00-00"));
        assert!(listing.contains("; +450000"));
    }
}
