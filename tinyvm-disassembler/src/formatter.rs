//! Instruction formatting to assembly text
//!
//! Registers print by name, RAM operands in brackets, immediates in decimal.

use tinyvm_spec::{Instruction, Register};

/// Format instruction as assembly text
pub fn format(instr: &Instruction) -> String {
    let mnemonic = instr.opcode().mnemonic();

    match instr {
        Instruction::MovToReg { dst, value } => {
            format!("{} {}, {}", mnemonic, format_reg(*dst), value)
        }
        Instruction::MovToRam { address, src } => {
            format!("{} {}, {}", mnemonic, format_addr(*address), format_reg(*src))
        }
        Instruction::MovFromRam { dst, address } => {
            format!("{} {}, {}", mnemonic, format_reg(*dst), format_addr(*address))
        }
        Instruction::Add { dst, src } | Instruction::Sub { dst, src } => {
            format!("{} {}, {}", mnemonic, format_reg(*dst), format_reg(*src))
        }
        Instruction::Inc { dst } | Instruction::Dec { dst } => {
            format!("{} {}", mnemonic, format_reg(*dst))
        }
        Instruction::Dumpreg | Instruction::Ret => mnemonic.to_string(),
    }
}

fn format_reg(reg: Register) -> &'static str {
    reg.name()
}

fn format_addr(address: u16) -> String {
    format!("[{}]", address)
}
