//! CPU execution engine for the Simpletron.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use crate::cpu::{Memory, Registers};
use crate::cpu::decode::{self, Instruction, Opcode};
use crate::cpu::io::Input;
use crate::cpu::memory::MemoryError;
use crate::word::Word;
use log::{info, trace, warn};
use serde::{Serialize, Deserialize};
use std::io::{self, Write};
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU executed HALT; the operand named these pages for the dump.
    Halted { start_page: usize, end_page: usize },
    /// CPU stopped on a fault.
    Faulted(Fault),
}

/// A fatal condition raised by a program.
///
/// `location` is always the address of the faulting instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Fault {
    #[error("unknown opcode {code:02} at location {location:04}")]
    UnknownOpcode { code: u8, location: usize },

    #[error("memory address {address} out of range at location {location:04}")]
    OutOfRange { address: i64, location: usize },

    #[error("attempt to divide by zero at location {location:04}")]
    DivisionByZero { location: usize },

    #[error("accumulator overflow ({value}) at location {location:04}")]
    AccumulatorOverflow { value: i64, location: usize },

    #[error("input value {value} out of range at location {location:04}")]
    InvalidInput { value: i64, location: usize },

    #[error("input exhausted at location {location:04}")]
    InputExhausted { location: usize },
}

/// Where the instruction counter goes after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Advance,
    Jumped,
    Halted,
}

/// The Simpletron CPU.
#[derive(Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Current execution state.
    pub state: CpuState,
    /// Instructions executed.
    pub cycles: u64,
    /// Print a trace line before each instruction.
    pub trace: bool,
}

impl Cpu {
    /// Create a new CPU with zeroed state.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            state: CpuState::Running,
            cycles: 0,
            trace: true,
        }
    }

    /// Load a program into memory at location 0.
    pub fn load_program(&mut self, program: &[Word]) -> Result<(), MemoryError> {
        self.mem.load_program(0, program)
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed, or an error. A fault also
    /// moves the CPU into [`CpuState::Faulted`].
    pub fn step<I, W>(&mut self, input: &mut I, out: &mut W) -> Result<Instruction, CpuError>
    where
        I: Input + ?Sized,
        W: Write + ?Sized,
    {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        // Fetch
        let location = self.regs.counter;
        let raw = self.mem.read(location)?;
        self.regs.instruction = raw;

        // Decode
        let instr = decode::decode(raw);
        trace!("{:04}: {} {:?}", location, raw, instr);
        if self.trace {
            writeln!(out, "Executing instruction at {:04}: {} {}", location, raw, instr)?;
        }

        // Execute
        let flow = match self.execute(instr, location, input, out) {
            Ok(flow) => flow,
            Err(CpuError::Fault(fault)) => {
                warn!("{}", fault);
                self.state = CpuState::Faulted(fault);
                return Err(CpuError::Fault(fault));
            }
            Err(e) => return Err(e),
        };

        if flow == Flow::Advance {
            self.regs.advance();
        }

        self.cycles += 1;

        Ok(instr)
    }

    /// Run until halt or error.
    ///
    /// Returns the number of instructions executed.
    pub fn run<I, W>(&mut self, input: &mut I, out: &mut W) -> Result<u64, CpuError>
    where
        I: Input + ?Sized,
        W: Write + ?Sized,
    {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            self.step(input, out)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited<I, W>(&mut self, max_cycles: u64, input: &mut I, out: &mut W) -> Result<u64, CpuError>
    where
        I: Input + ?Sized,
        W: Write + ?Sized,
    {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.state == CpuState::Running && self.cycles < limit {
            self.step(input, out)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction fetched from `location`.
    fn execute<I, W>(
        &mut self,
        instr: Instruction,
        location: usize,
        input: &mut I,
        out: &mut W,
    ) -> Result<Flow, CpuError>
    where
        I: Input + ?Sized,
        W: Write + ?Sized,
    {
        let operand = usize::from(instr.operand);

        match instr.opcode {
            // ==================== Input/Output ====================

            Opcode::Read => {
                write!(out, "? ")?;
                out.flush()?;
                let value = input
                    .read_value()?
                    .ok_or(Fault::InputExhausted { location })?;
                let word = Word::try_from(value)
                    .map_err(|_| Fault::InvalidInput { value, location })?;
                self.store(operand, word, location)?;
            }

            Opcode::Write => {
                let value = self.load(operand, location)?;
                writeln!(out, "{}", value.value())?;
            }

            // ==================== Load/Store ====================

            Opcode::Load => {
                self.regs.accumulator = self.load(operand, location)?;
            }

            Opcode::LoadImmediate => {
                self.regs.accumulator = self.regs.instruction.immediate();
            }

            Opcode::LoadIndex => {
                self.regs.index = self.load(operand, location)?.value();
            }

            Opcode::LoadIndexed => {
                let addr = self.index_address(location)?;
                self.regs.accumulator = self.load(addr, location)?;
            }

            Opcode::Store => {
                self.store(operand, self.regs.accumulator, location)?;
            }

            Opcode::StoreIndexed => {
                let addr = self.index_address(location)?;
                self.store(addr, self.regs.accumulator, location)?;
            }

            // ==================== Arithmetic ====================

            Opcode::Add | Opcode::AddIndexed => {
                let rhs = self.operand_word(instr, location)?;
                let sum = i64::from(self.regs.accumulator) + i64::from(rhs);
                self.set_accumulator(sum, location)?;
            }

            Opcode::Subtract | Opcode::SubtractIndexed => {
                let rhs = self.operand_word(instr, location)?;
                let difference = i64::from(self.regs.accumulator) - i64::from(rhs);
                self.set_accumulator(difference, location)?;
            }

            Opcode::Multiply | Opcode::MultiplyIndexed => {
                let rhs = self.operand_word(instr, location)?;
                let product = i64::from(self.regs.accumulator) * i64::from(rhs);
                self.set_accumulator(product, location)?;
            }

            Opcode::Divide | Opcode::DivideIndexed => {
                let divisor = self.operand_word(instr, location)?;
                if divisor.is_zero() {
                    return Err(Fault::DivisionByZero { location }.into());
                }
                // Truncates toward zero; the quotient can't leave the range.
                let quotient = i64::from(self.regs.accumulator) / i64::from(divisor);
                self.set_accumulator(quotient, location)?;
            }

            Opcode::Increment => self.regs.increment_index(),

            Opcode::Decrement => self.regs.decrement_index(),

            // ==================== Control Flow ====================

            Opcode::Branch => {
                self.regs.jump(operand);
                return Ok(Flow::Jumped);
            }

            Opcode::BranchNeg => {
                if self.regs.accumulator.is_negative() {
                    self.regs.jump(operand);
                    return Ok(Flow::Jumped);
                }
                // A BRANCHNEG at location 3 loops back to the top when not taken.
                if location == 3 {
                    self.regs.jump(0);
                    return Ok(Flow::Jumped);
                }
            }

            Opcode::BranchZero => {
                if self.regs.accumulator.is_zero() {
                    self.regs.jump(operand);
                    return Ok(Flow::Jumped);
                }
            }

            Opcode::Swap => {
                let index = i64::from(self.regs.index);
                let accumulator = self.regs.accumulator.value();
                self.set_accumulator(index, location)?;
                self.regs.index = accumulator;
            }

            Opcode::Halt => {
                let (start_page, end_page) = instr.halt_pages();
                info!("halted at {:04} after {} cycles", location, self.cycles + 1);
                self.state = CpuState::Halted { start_page, end_page };
                return Ok(Flow::Halted);
            }

            Opcode::Unknown(code) => {
                return Err(Fault::UnknownOpcode { code, location }.into());
            }
        }

        Ok(Flow::Advance)
    }

    /// The memory word an arithmetic instruction works on: at the operand,
    /// or at the index register for the indexed forms.
    fn operand_word(&self, instr: Instruction, location: usize) -> Result<Word, Fault> {
        let addr = if instr.opcode.is_indexed() {
            self.index_address(location)?
        } else {
            usize::from(instr.operand)
        };
        self.load(addr, location)
    }

    fn index_address(&self, location: usize) -> Result<usize, Fault> {
        let address = i64::from(self.regs.index);
        Memory::index(address).map_err(|_| Fault::OutOfRange { address, location })
    }

    fn load(&self, addr: usize, location: usize) -> Result<Word, Fault> {
        self.mem
            .read(addr)
            .map_err(|_| Fault::OutOfRange { address: addr as i64, location })
    }

    fn store(&mut self, addr: usize, value: Word, location: usize) -> Result<(), Fault> {
        self.mem
            .write(addr, value)
            .map_err(|_| Fault::OutOfRange { address: addr as i64, location })
    }

    /// Overflow leaves the accumulator untouched.
    fn set_accumulator(&mut self, value: i64, location: usize) -> Result<(), Fault> {
        self.regs.accumulator = Word::try_from(value)
            .map_err(|_| Fault::AccumulatorOverflow { value, location })?;
        Ok(())
    }

    /// The fault that stopped the CPU, if any.
    pub fn fault(&self) -> Option<Fault> {
        match self.state {
            CpuState::Faulted(fault) => Some(fault),
            _ => None,
        }
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        matches!(self.state, CpuState::Halted { .. })
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("{0}")]
    Fault(#[from] Fault),

    #[error("console I/O error: {0}")]
    Io(String),
}

impl From<io::Error> for CpuError {
    fn from(e: io::Error) -> Self {
        CpuError::Io(e.to_string())
    }
}
