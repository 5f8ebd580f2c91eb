//! Runtime error types for TinyVM

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Memory out of bounds: {len} byte(s) at address {address} exceed capacity {capacity}")]
    OutOfBounds {
        address: usize,
        len: usize,
        capacity: usize,
    },

    #[error("Invalid register code {code} in instruction at ip {ip}")]
    InvalidRegister { code: u8, ip: u16 },

    #[error("Unknown opcode {opcode:#04x} at ip {ip}")]
    UnknownOpcode { opcode: u8, ip: u16 },

    #[error("Memory image too short: expected {expected} bytes, found {found}")]
    TruncatedImage { expected: usize, found: usize },

    #[error("Invalid memory capacity: {0} (valid range: 1-65535)")]
    InvalidCapacity(usize),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
