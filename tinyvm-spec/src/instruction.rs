//! TinyVM Instruction Set
//!
//! Variable-length instructions: 1-byte opcode followed by 0-3 operand bytes.

use serde::{Deserialize, Serialize};

use crate::opcode::Opcode;
use crate::register::Register;
use crate::{Address, Word};

/// TinyVM instruction with decoded operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// MOV_TO_REG: dst = value
    MovToReg { dst: Register, value: Word },

    /// MOV_TO_RAM: mem[address] = src (word write)
    MovToRam { address: Address, src: Register },

    /// MOV_FROM_RAM: dst = mem[address] (word read)
    MovFromRam { dst: Register, address: Address },

    /// DUMPREG: print registers and ip
    Dumpreg,

    /// ADD: dst = dst + src (wrapping)
    Add { dst: Register, src: Register },

    /// SUB: dst = dst - src (wrapping)
    Sub { dst: Register, src: Register },

    /// INC: dst = dst + 1 (wrapping)
    Inc { dst: Register },

    /// DEC: dst = dst - 1 (wrapping)
    Dec { dst: Register },

    /// RET: halt execution
    Ret,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::MovToReg { .. } => Opcode::MovToReg,
            Instruction::MovToRam { .. } => Opcode::MovToRam,
            Instruction::MovFromRam { .. } => Opcode::MovFromRam,
            Instruction::Dumpreg => Opcode::Dumpreg,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Sub { .. } => Opcode::Sub,
            Instruction::Inc { .. } => Opcode::Inc,
            Instruction::Dec { .. } => Opcode::Dec,
            Instruction::Ret => Opcode::Ret,
        }
    }

    /// Encoded size in bytes
    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.opcode().encoded_len()
    }

    #[inline]
    pub fn is_ret(&self) -> bool {
        matches!(self, Instruction::Ret)
    }
}
