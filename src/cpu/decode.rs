//! Instruction decoder for the Simpletron.
//!
//! An instruction word is split by magnitude: the two high digits select
//! the operation and the four low digits are the operand. The sign of the
//! word never takes part in decoding.

use crate::word::{Word, WordError};
use serde::{Serialize, Deserialize};
use std::fmt;

/// Operation codes.
///
/// Every two-digit value decodes; values outside the instruction set land
/// in [`Opcode::Unknown`] and fault when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ==================== Input/Output ====================

    /// Read a word from the console into memory.
    Read,
    /// Write a memory word to the console.
    Write,

    // ==================== Load/Store ====================

    /// Load accumulator from memory.
    Load,
    /// Load accumulator from the instruction word itself.
    LoadImmediate,
    /// Load index register from memory.
    LoadIndex,
    /// Load accumulator from the location held in the index register.
    LoadIndexed,
    /// Store accumulator to memory.
    Store,
    /// Store accumulator to the location held in the index register.
    StoreIndexed,

    // ==================== Arithmetic ====================

    Add,
    AddIndexed,
    Subtract,
    SubtractIndexed,
    Divide,
    DivideIndexed,
    Multiply,
    MultiplyIndexed,
    /// Increment index register.
    Increment,
    /// Decrement index register.
    Decrement,

    // ==================== Control Flow ====================

    Branch,
    BranchNeg,
    BranchZero,
    /// Exchange accumulator and index register.
    Swap,
    Halt,

    /// Any code outside the instruction set.
    Unknown(u8),
}

impl Opcode {
    const READ: u8 = 10;
    const WRITE: u8 = 11;
    const LOAD: u8 = 20;
    const LOADIM: u8 = 21;
    const LOADX: u8 = 22;
    const LOADIDX: u8 = 23;
    const STORE: u8 = 25;
    const STOREIDX: u8 = 26;
    const ADD: u8 = 30;
    const ADDX: u8 = 31;
    const SUBTRACT: u8 = 32;
    const SUBTRACTX: u8 = 33;
    const DIVIDE: u8 = 34;
    const DIVIDEX: u8 = 35;
    const MULTIPLY: u8 = 36;
    const MULTIPLYX: u8 = 37;
    const INC: u8 = 38;
    const DEC: u8 = 39;
    const BRANCH: u8 = 40;
    const BRANCHNEG: u8 = 41;
    const BRANCHZERO: u8 = 42;
    const SWAP: u8 = 43;
    const HALT: u8 = 45;

    /// Every recognized operation, in code order.
    pub const ALL: [Opcode; 23] = [
        Opcode::Read,
        Opcode::Write,
        Opcode::Load,
        Opcode::LoadImmediate,
        Opcode::LoadIndex,
        Opcode::LoadIndexed,
        Opcode::Store,
        Opcode::StoreIndexed,
        Opcode::Add,
        Opcode::AddIndexed,
        Opcode::Subtract,
        Opcode::SubtractIndexed,
        Opcode::Divide,
        Opcode::DivideIndexed,
        Opcode::Multiply,
        Opcode::MultiplyIndexed,
        Opcode::Increment,
        Opcode::Decrement,
        Opcode::Branch,
        Opcode::BranchNeg,
        Opcode::BranchZero,
        Opcode::Swap,
        Opcode::Halt,
    ];

    /// Map a numeric code to an operation.
    pub fn from_code(code: u8) -> Self {
        match code {
            Self::READ => Opcode::Read,
            Self::WRITE => Opcode::Write,
            Self::LOAD => Opcode::Load,
            Self::LOADIM => Opcode::LoadImmediate,
            Self::LOADX => Opcode::LoadIndex,
            Self::LOADIDX => Opcode::LoadIndexed,
            Self::STORE => Opcode::Store,
            Self::STOREIDX => Opcode::StoreIndexed,
            Self::ADD => Opcode::Add,
            Self::ADDX => Opcode::AddIndexed,
            Self::SUBTRACT => Opcode::Subtract,
            Self::SUBTRACTX => Opcode::SubtractIndexed,
            Self::DIVIDE => Opcode::Divide,
            Self::DIVIDEX => Opcode::DivideIndexed,
            Self::MULTIPLY => Opcode::Multiply,
            Self::MULTIPLYX => Opcode::MultiplyIndexed,
            Self::INC => Opcode::Increment,
            Self::DEC => Opcode::Decrement,
            Self::BRANCH => Opcode::Branch,
            Self::BRANCHNEG => Opcode::BranchNeg,
            Self::BRANCHZERO => Opcode::BranchZero,
            Self::SWAP => Opcode::Swap,
            Self::HALT => Opcode::Halt,
            other => Opcode::Unknown(other),
        }
    }

    /// The numeric code.
    pub fn code(self) -> u8 {
        match self {
            Opcode::Read => Self::READ,
            Opcode::Write => Self::WRITE,
            Opcode::Load => Self::LOAD,
            Opcode::LoadImmediate => Self::LOADIM,
            Opcode::LoadIndex => Self::LOADX,
            Opcode::LoadIndexed => Self::LOADIDX,
            Opcode::Store => Self::STORE,
            Opcode::StoreIndexed => Self::STOREIDX,
            Opcode::Add => Self::ADD,
            Opcode::AddIndexed => Self::ADDX,
            Opcode::Subtract => Self::SUBTRACT,
            Opcode::SubtractIndexed => Self::SUBTRACTX,
            Opcode::Divide => Self::DIVIDE,
            Opcode::DivideIndexed => Self::DIVIDEX,
            Opcode::Multiply => Self::MULTIPLY,
            Opcode::MultiplyIndexed => Self::MULTIPLYX,
            Opcode::Increment => Self::INC,
            Opcode::Decrement => Self::DEC,
            Opcode::Branch => Self::BRANCH,
            Opcode::BranchNeg => Self::BRANCHNEG,
            Opcode::BranchZero => Self::BRANCHZERO,
            Opcode::Swap => Self::SWAP,
            Opcode::Halt => Self::HALT,
            Opcode::Unknown(code) => code,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Load => "LOAD",
            Opcode::LoadImmediate => "LOADIM",
            Opcode::LoadIndex => "LOADX",
            Opcode::LoadIndexed => "LOADIDX",
            Opcode::Store => "STORE",
            Opcode::StoreIndexed => "STOREIDX",
            Opcode::Add => "ADD",
            Opcode::AddIndexed => "ADDX",
            Opcode::Subtract => "SUBTRACT",
            Opcode::SubtractIndexed => "SUBTRACTX",
            Opcode::Divide => "DIVIDE",
            Opcode::DivideIndexed => "DIVIDEX",
            Opcode::Multiply => "MULTIPLY",
            Opcode::MultiplyIndexed => "MULTIPLYX",
            Opcode::Increment => "INC",
            Opcode::Decrement => "DEC",
            Opcode::Branch => "BRANCH",
            Opcode::BranchNeg => "BRANCHNEG",
            Opcode::BranchZero => "BRANCHZERO",
            Opcode::Swap => "SWAP",
            Opcode::Halt => "HALT",
            Opcode::Unknown(_) => "???",
        }
    }

    /// Whether the operation addresses memory through the index register
    /// instead of its operand.
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            Opcode::LoadIndexed
                | Opcode::StoreIndexed
                | Opcode::AddIndexed
                | Opcode::SubtractIndexed
                | Opcode::DivideIndexed
                | Opcode::MultiplyIndexed
        )
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: u16,
}

impl Instruction {
    /// HALT splits its operand into the first and last page to dump.
    pub fn halt_pages(&self) -> (usize, usize) {
        let operand = usize::from(self.operand);
        (operand / 100, operand % 100)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(OpCode: {:02}, Operand: {:04})", self.opcode.code(), self.operand)
    }
}

/// Decode an instruction word.
pub fn decode(word: Word) -> Instruction {
    Instruction {
        opcode: Opcode::from_code(word.opcode()),
        operand: word.operand(),
    }
}

/// Encode an instruction as a positive word.
pub fn encode(instr: &Instruction) -> Result<Word, WordError> {
    Word::pack(false, instr.opcode.code(), instr.operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_halt() {
        let instr = decode(Word::new(450_205).unwrap());
        assert_eq!(instr.opcode, Opcode::Halt);
        assert_eq!(instr.halt_pages(), (2, 5));
    }

    #[test]
    fn test_decode_ignores_sign() {
        let instr = decode(Word::new(-300_008).unwrap());
        assert_eq!(instr, Instruction { opcode: Opcode::Add, operand: 8 });
    }

    #[test]
    fn test_decode_unknown() {
        assert_eq!(decode(Word::new(1007).unwrap()).opcode, Opcode::Unknown(0));
        assert_eq!(decode(Word::new(440_000).unwrap()).opcode, Opcode::Unknown(44));
        assert_eq!(decode(Word::new(999_999).unwrap()).opcode, Opcode::Unknown(99));
    }

    #[test]
    fn test_opcode_code_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_code(op.code()), op);
        }
    }

    #[test]
    fn test_encode_drops_sign() {
        let word = Word::new(-250_009).unwrap();
        assert_eq!(encode(&decode(word)).unwrap().value(), 250_009);

        let unknown = Instruction { opcode: Opcode::Unknown(99), operand: 9999 };
        assert_eq!(encode(&unknown).unwrap().value(), 999_999);
    }

    #[test]
    fn test_indexed_opcodes() {
        assert!(Opcode::AddIndexed.is_indexed());
        assert!(!Opcode::LoadIndex.is_indexed());
        assert!(!Opcode::Add.is_indexed());
    }

    proptest! {
        #[test]
        fn decode_inverts_pack(negative in any::<bool>(), opcode in 0u8..=99, operand in 0u16..=9999) {
            let word = Word::pack(negative, opcode, operand).unwrap();
            let instr = decode(word);
            prop_assert_eq!(instr.opcode.code(), opcode);
            prop_assert_eq!(instr.operand, operand);
        }
    }
}
