//! Assembler errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("Syntax error in operand {operand:?}: {message}")]
    SyntaxError { operand: String, message: String },

    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("Invalid register: {0}")]
    InvalidRegister(String),

    #[error("Invalid immediate value: {0} (expected 0-65535)")]
    InvalidImmediate(String),

    #[error("Invalid address: {0} (expected [0]-[65535])")]
    InvalidAddress(String),

    #[error("Missing operand for {mnemonic}: expected {expected}, found {found}")]
    MissingOperand {
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected operand for {mnemonic}: expected {expected}, found {found}")]
    UnexpectedOperand {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
