//! # TinyVM Disassembler
//!
//! Decode TinyVM bytecode and render it as mnemonic text.
//!
//! The formatter is shared with the runtime's debug tracer, so a listing and
//! a trace print the same text for the same instruction.
//!
//! ## Example
//!
//! ```rust
//! use tinyvm_disassembler::{decode, format};
//!
//! let bytes = [0x00, 0x01, 0x2A, 0x00];
//! let (inst, len) = decode(&bytes, 0).unwrap();
//! assert_eq!(len, 4);
//! assert_eq!(format(&inst), "mov_to_reg b, 42");
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::disassemble;
pub use decoder::decode;
pub use formatter::format;
