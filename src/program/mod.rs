//! Program loading and listing.
//!
//! This module provides:
//! - A loader (text file or keyboard → memory words)
//! - A disassembler (memory words → readable text)

pub mod loader;
pub mod disasm;

pub use loader::{load_file, load_interactive, load_prompted, parse_program, LoadError, Program};
pub use disasm::{disassemble, disassemble_word};
