//! TinyVM Assembler
//!
//! Turns mnemonics and operand text into [`Command`]s for the machine.
//!
//! ## Example
//!
//! ```rust
//! use tinyvm_assembler::parse_command;
//! use tinyvm_spec::{Command, Instruction, Register};
//!
//! let cmd = parse_command("mov_to_reg", &["a", "5"]).unwrap();
//! assert_eq!(cmd, Command::Write(Instruction::MovToReg { dst: Register::A, value: 5 }));
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{AssemblerError, Result};
pub use parser::{parse_command, parse_line, parse_operand, parse_register, Operand};

use tinyvm_spec::Command;

/// Parse every non-blank line of `source`
pub fn assemble(source: &str) -> Result<Vec<Command>> {
    source
        .lines()
        .filter_map(|line| parse_line(line).transpose())
        .collect()
}
