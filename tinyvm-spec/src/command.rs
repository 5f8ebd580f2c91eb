//! Commands accepted by the machine's public surface.
//!
//! A front end turns user input into a [`Command`]; each command maps to
//! exactly one encoder write or one control operation on the machine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::instruction::Instruction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Encode an instruction at the write cursor
    Write(Instruction),
    /// Execute memory from address 0 until `ret`
    Run,
    /// Zero memory, registers, and ip
    Reset,
    /// Dump memory to a file
    Save(PathBuf),
    /// Reset, then fill memory from a file
    Load(PathBuf),
}

impl Command {
    /// Mnemonic as typed by the user
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Command::Write(inst) => inst.opcode().mnemonic(),
            Command::Run => "run",
            Command::Reset => "reset",
            Command::Save(_) => "save",
            Command::Load(_) => "load",
        }
    }
}

impl From<Instruction> for Command {
    fn from(inst: Instruction) -> Self {
        Command::Write(inst)
    }
}
