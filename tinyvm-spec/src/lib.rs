//! # TinyVM Specification
//!
//! Byte-addressed register machine with a single shared memory for code and data.
//!
//! ## Key Features
//! - 2 general-purpose 16-bit registers (`a`, `b`)
//! - 16-bit instruction pointer
//! - Byte memory, default 8192 cells, von Neumann layout (code and data interleaved)
//! - 9 instructions, 1-byte opcode followed by 0-3 operand bytes
//! - Little-endian 16-bit words

pub mod opcode;
pub mod register;
pub mod instruction;
pub mod encoding;
pub mod command;
pub mod error;

pub use opcode::Opcode;
pub use register::{Register, NUM_REGISTERS};
pub use instruction::Instruction;
pub use command::Command;
pub use error::SpecError;

/// Default memory capacity in bytes
pub const DEFAULT_CAPACITY: usize = 8192;

/// Largest memory capacity addressable by a 16-bit instruction pointer
pub const MAX_CAPACITY: usize = u16::MAX as usize;

/// Longest encoded instruction (opcode + 3 operand bytes)
pub const MAX_INSTRUCTION_LEN: usize = 4;

/// Machine word (register width)
pub type Word = u16;

/// Memory address
pub type Address = u16;
