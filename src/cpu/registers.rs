//! Simpletron CPU registers.
//!
//! The Simpletron has four registers:
//! - accumulator: six-digit word, overflow is fatal
//! - index register: signed integer used as an address, never range-checked
//! - instruction counter: location of the next fetch, confined to page 0
//! - instruction register: the most recently fetched word

use crate::cpu::memory::PAGE_SIZE;
use crate::word::Word;
use serde::{Serialize, Deserialize};

/// The Simpletron register file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub accumulator: Word,
    pub index: i32,
    pub counter: usize,
    pub instruction: Word,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self {
            accumulator: Word::zero(),
            index: 0,
            counter: 0,
            instruction: Word::zero(),
        }
    }

    /// Increment the instruction counter, wrapping to 0 at the end of the
    /// page.
    pub fn advance(&mut self) {
        self.jump(self.counter + 1);
    }

    /// Set the instruction counter. Targets past the page land on 0.
    pub fn jump(&mut self, target: usize) {
        self.counter = if target >= PAGE_SIZE { 0 } else { target };
    }

    /// Increment the index register.
    pub fn increment_index(&mut self) {
        self.index = self.index.wrapping_add(1);
    }

    /// Decrement the index register.
    pub fn decrement_index(&mut self) {
        self.index = self.index.wrapping_sub(1);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut regs = Registers::new();
        regs.counter = 10;

        regs.advance();
        assert_eq!(regs.counter, 11);
    }

    #[test]
    fn test_advance_wraps_at_page_end() {
        let mut regs = Registers::new();
        regs.counter = PAGE_SIZE - 1;
        regs.advance();
        assert_eq!(regs.counter, 0);
    }

    #[test]
    fn test_jump() {
        let mut regs = Registers::new();
        regs.jump(42);
        assert_eq!(regs.counter, 42);
        regs.jump(150);
        assert_eq!(regs.counter, 0);
    }

    #[test]
    fn test_index_unchecked() {
        let mut regs = Registers::new();
        regs.index = 999_999;
        regs.increment_index();
        assert_eq!(regs.index, 1_000_000);

        regs.index = i32::MIN;
        regs.decrement_index();
        assert_eq!(regs.index, i32::MAX);
    }
}
