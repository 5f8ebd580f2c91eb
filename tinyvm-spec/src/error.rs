//! # Error Types for TinyVM

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("Invalid register code: {0} (valid codes: 0-1)")]
    InvalidRegister(u8),

    #[error("Invalid register name: {0:?}")]
    InvalidRegisterName(String),

    #[error("Unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),
}
