//! # Simpletron
//!
//! A fetch-decode-execute interpreter for the Simpletron, a small decimal
//! accumulator machine.
//!
//! Each memory word is a signed six-digit integer. An instruction packs a
//! two-digit opcode and a four-digit operand into one word; the machine
//! has an accumulator, an index register, an instruction counter and an
//! instruction register. Programs are loaded into page 0 and run until
//! HALT or a fault, after which registers and memory are dumped.

pub mod word;
pub mod cpu;
pub mod program;
pub mod dump;
pub mod runner;

// Re-export commonly used types
pub use word::{Word, WordError};
pub use cpu::{Cpu, CpuState, CpuError, Fault, Memory, Registers, Instruction, Opcode, Input, LineInput, ScriptedInput};
pub use program::{load_file, load_interactive, load_prompted, parse_program, disassemble, LoadError, Program};
pub use dump::write_dump;
pub use runner::{execute, RunConfig, Termination};
