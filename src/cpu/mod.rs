//! CPU emulation for the Simpletron.
//!
//! This module implements the complete Simpletron architecture:
//! - 10,000 six-digit memory words in pages of 100
//! - 4 registers: accumulator, index, instruction counter, instruction register
//! - 23-instruction set with single-address architecture

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;
pub mod io;

pub use memory::{Memory, MemoryError, MEMORY_SIZE, PAGE_SIZE, PAGE_COUNT};
pub use registers::Registers;
pub use decode::{Instruction, Opcode};
pub use execute::{Cpu, CpuError, CpuState, Fault};
pub use io::{Input, LineInput, ScriptedInput};
