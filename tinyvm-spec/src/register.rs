//! Register definitions for TinyVM

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpecError;

/// Number of registers
pub const NUM_REGISTERS: usize = 2;

/// General-purpose register (16-bit)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    A = 0,
    B = 1,
}

impl Register {
    pub const ALL: [Register; NUM_REGISTERS] = [Register::A, Register::B];

    /// Decode a register code as stored in an operand byte (or nibble)
    #[inline]
    pub fn from_code(code: u8) -> Result<Self, SpecError> {
        match code {
            0 => Ok(Register::A),
            1 => Ok(Register::B),
            _ => Err(SpecError::InvalidRegister(code)),
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Register::A => "a",
            Register::B => "b",
        }
    }
}

impl TryFrom<u8> for Register {
    type Error = SpecError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Register::from_code(code)
    }
}

impl FromStr for Register {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(Register::A),
            "b" => Ok(Register::B),
            _ => Err(SpecError::InvalidRegisterName(s.to_string())),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
