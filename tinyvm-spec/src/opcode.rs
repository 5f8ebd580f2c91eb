//! # TinyVM Opcode Definitions
//!
//! Every instruction starts with a single opcode byte (0x00-0x08).
//!
//! ## Operand Layout
//!
//! | Opcode | Operand bytes |
//! |--------|---------------|
//! | MOV_TO_REG   | `[reg:1][imm:2]` |
//! | MOV_TO_RAM   | `[addr:2][reg:1]` |
//! | MOV_FROM_RAM | `[reg:1][addr:2]` |
//! | DUMPREG      | none |
//! | ADD / SUB    | `[dst:4 | src:4]` |
//! | INC / DEC    | `[reg:1]` |
//! | RET          | none |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SpecError;

/// Instruction opcode (one byte)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// MOV_TO_REG: reg = imm
    MovToReg = 0x00,
    /// MOV_TO_RAM: mem[addr] = reg (word)
    MovToRam = 0x01,
    /// MOV_FROM_RAM: reg = mem[addr] (word)
    MovFromRam = 0x02,
    /// DUMPREG: print a, b, ip
    Dumpreg = 0x03,
    /// ADD: dst = dst + src
    Add = 0x04,
    /// SUB: dst = dst - src
    Sub = 0x05,
    /// INC: reg = reg + 1
    Inc = 0x06,
    /// DEC: reg = reg - 1
    Dec = 0x07,
    /// RET: halt
    Ret = 0x08,
}

impl Opcode {
    /// All opcodes in encoding order
    pub const ALL: [Opcode; 9] = [
        Opcode::MovToReg,
        Opcode::MovToRam,
        Opcode::MovFromRam,
        Opcode::Dumpreg,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Inc,
        Opcode::Dec,
        Opcode::Ret,
    ];

    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Opcode::MovToReg),
            0x01 => Some(Opcode::MovToRam),
            0x02 => Some(Opcode::MovFromRam),
            0x03 => Some(Opcode::Dumpreg),
            0x04 => Some(Opcode::Add),
            0x05 => Some(Opcode::Sub),
            0x06 => Some(Opcode::Inc),
            0x07 => Some(Opcode::Dec),
            0x08 => Some(Opcode::Ret),
            _ => None,
        }
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Number of operand bytes following the opcode byte
    pub const fn operand_len(self) -> usize {
        match self {
            Opcode::MovToReg | Opcode::MovToRam | Opcode::MovFromRam => 3,
            Opcode::Add | Opcode::Sub | Opcode::Inc | Opcode::Dec => 1,
            Opcode::Dumpreg | Opcode::Ret => 0,
        }
    }

    /// Total encoded length, opcode byte included
    #[inline]
    pub const fn encoded_len(self) -> usize {
        1 + self.operand_len()
    }

    /// Lower-case mnemonic used in traces and assembly text
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::MovToReg => "mov_to_reg",
            Opcode::MovToRam => "mov_to_ram",
            Opcode::MovFromRam => "mov_from_ram",
            Opcode::Dumpreg => "dumpreg",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Inc => "inc",
            Opcode::Dec => "dec",
            Opcode::Ret => "ret",
        }
    }

    /// Look up an opcode by its mnemonic
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == mnemonic)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = SpecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Opcode::from_u8(value).ok_or(SpecError::UnknownOpcode(value))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
