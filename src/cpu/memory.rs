//! Simpletron memory subsystem.
//!
//! Memory is a flat array of 10,000 words viewed as 100 pages of 100
//! words. Programs are loaded into page 0 and execution never leaves it.

use crate::word::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of words in memory.
pub const MEMORY_SIZE: usize = 10_000;

/// The number of words in a page.
pub const PAGE_SIZE: usize = 100;

/// The number of pages in memory.
pub const PAGE_COUNT: usize = MEMORY_SIZE / PAGE_SIZE;

/// Simpletron memory: 10,000 signed six-digit words.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![Word::zero(); MEMORY_SIZE],
        }
    }

    /// Read a cell.
    #[inline]
    pub fn read(&self, addr: usize) -> Result<Word, MemoryError> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange(addr as i64))
    }

    /// Write a cell.
    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) -> Result<(), MemoryError> {
        let cell = self.cells
            .get_mut(addr)
            .ok_or(MemoryError::AddressOutOfRange(addr as i64))?;
        *cell = value;
        Ok(())
    }

    /// Convert a signed address (the index register may hold anything) to
    /// a memory index.
    pub fn index(addr: i64) -> Result<usize, MemoryError> {
        usize::try_from(addr)
            .ok()
            .filter(|&index| index < MEMORY_SIZE)
            .ok_or(MemoryError::AddressOutOfRange(addr))
    }

    /// Load a program into memory starting at the given address.
    pub fn load_program(&mut self, start_addr: usize, program: &[Word]) -> Result<(), MemoryError> {
        let available = MEMORY_SIZE.saturating_sub(start_addr);
        if program.len() > available {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available,
            });
        }

        self.cells[start_addr..start_addr + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// The 100 words of a page.
    pub fn page(&self, page: usize) -> Result<&[Word], MemoryError> {
        let start = page.checked_mul(PAGE_SIZE).ok_or(MemoryError::PageOutOfRange(page))?;
        self.cells
            .get(start..start + PAGE_SIZE)
            .ok_or(MemoryError::PageOutOfRange(page))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count non-zero cells
        let non_zero = self.cells.iter().filter(|cell| !cell.is_zero()).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("memory address {0} out of range (0-9999)")]
    AddressOutOfRange(i64),

    #[error("page {0} out of range (0-99)")]
    PageOutOfRange(usize),

    #[error("program size {size} exceeds available space {available}")]
    ProgramTooLarge { size: usize, available: usize },
}
