//! The Simpletron word.
//!
//! Every memory cell, the accumulator and the instruction register hold a
//! signed six-digit decimal value. Instructions are packed into the same
//! word: the two high digits are the opcode and the four low digits are
//! the operand.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A signed six-digit decimal word.
///
/// Value range: -999,999 to +999,999
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Word(i32);

impl Word {
    /// Maximum positive value: +999,999
    pub const MAX: i32 = 999_999;

    /// Minimum negative value: -999,999
    pub const MIN: i32 = -999_999;

    /// Divisor splitting a word into opcode and operand.
    pub const OPCODE_SCALE: u32 = 10_000;

    /// Modulus applied by LOADIM to the raw instruction word.
    pub const IMMEDIATE_MODULUS: i32 = 1_000_000;

    /// Create a zero word.
    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Create a word, rejecting values outside the six-digit range.
    pub fn new(value: i32) -> Result<Self, WordError> {
        Self::try_from(i64::from(value))
    }

    /// Pack an opcode and operand into an instruction word.
    ///
    /// `negative` sets the sign of the whole word; decoding ignores it.
    pub fn pack(negative: bool, opcode: u8, operand: u16) -> Result<Self, WordError> {
        if opcode > 99 {
            return Err(WordError::OpcodeOutOfRange(opcode));
        }
        if operand > 9999 {
            return Err(WordError::OperandOutOfRange(operand));
        }
        let magnitude = i32::from(opcode) * Self::OPCODE_SCALE as i32 + i32::from(operand);
        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Get the integer value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// High two digits of the magnitude.
    #[inline]
    pub const fn opcode(self) -> u8 {
        (self.0.unsigned_abs() / Self::OPCODE_SCALE) as u8
    }

    /// Low four digits of the magnitude.
    #[inline]
    pub const fn operand(self) -> u16 {
        (self.0.unsigned_abs() % Self::OPCODE_SCALE) as u16
    }

    /// The value LOADIM places in the accumulator: the whole word reduced
    /// modulo one million, keeping its sign.
    #[inline]
    pub const fn immediate(self) -> Self {
        Self(self.0 % Self::IMMEDIATE_MODULUS)
    }

    /// Check if negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Check if zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check whether an arbitrary integer fits in a word.
    #[inline]
    pub fn in_range(value: i64) -> bool {
        (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value)
    }
}

impl TryFrom<i64> for Word {
    type Error = WordError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if Self::in_range(value) {
            Ok(Self(value as i32))
        } else {
            Err(WordError::OutOfRange(value))
        }
    }
}

impl From<Word> for i64 {
    fn from(word: Word) -> Self {
        i64::from(word.0)
    }
}

impl fmt::Display for Word {
    /// Signed, zero-padded to six columns (`+01007`, `-211234`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+06}", self.0)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:+06})", self.0)
    }
}

/// Errors constructing a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("value {0} out of range for a word [-999999, 999999]")]
    OutOfRange(i64),

    #[error("opcode {0} does not fit in two digits")]
    OpcodeOutOfRange(u8),

    #[error("operand {0} does not fit in four digits")]
    OperandOutOfRange(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_range() {
        assert!(Word::new(999_999).is_ok());
        assert!(Word::new(-999_999).is_ok());
        assert_eq!(Word::new(1_000_000), Err(WordError::OutOfRange(1_000_000)));
        assert_eq!(Word::new(-1_000_000), Err(WordError::OutOfRange(-1_000_000)));
    }

    #[test]
    fn test_word_split() {
        let word = Word::new(-211_234).unwrap();
        assert_eq!(word.opcode(), 21);
        assert_eq!(word.operand(), 1234);

        let word = Word::new(450_205).unwrap();
        assert_eq!(word.opcode(), 45);
        assert_eq!(word.operand(), 205);
    }

    #[test]
    fn test_pack() {
        assert_eq!(Word::pack(false, 10, 7).unwrap().value(), 100_007);
        assert_eq!(Word::pack(true, 21, 1234).unwrap().value(), -211_234);
        assert!(Word::pack(false, 100, 0).is_err());
        assert!(Word::pack(false, 10, 10_000).is_err());
    }

    #[test]
    fn test_immediate_keeps_sign() {
        assert_eq!(Word::new(211_234).unwrap().immediate().value(), 211_234);
        assert_eq!(Word::new(-211_234).unwrap().immediate().value(), -211_234);
    }

    #[test]
    fn test_display() {
        assert_eq!(Word::new(1007).unwrap().to_string(), "+01007");
        assert_eq!(Word::new(-42).unwrap().to_string(), "-00042");
        assert_eq!(Word::new(211_234).unwrap().to_string(), "+211234");
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let word: Word = serde_json::from_str("-4500").unwrap();
        assert_eq!(word.value(), -4500);
        assert!(serde_json::from_str::<Word>("1000000").is_err());
    }
}
