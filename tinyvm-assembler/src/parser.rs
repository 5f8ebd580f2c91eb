//! Command parser
//!
//! Maps a recognized mnemonic and its operand strings onto a [`Command`].
//! Splitting user input into mnemonic and operands is the caller's job.

use logos::Logos;
use std::path::PathBuf;
use tinyvm_spec::{Address, Command, Instruction, Opcode, Register, Word};

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;

/// A parsed operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// `a` or `b`
    Register(Register),
    /// Decimal value
    Immediate(Word),
    /// `[N]`
    Address(Address),
}

/// Parse one operand: a register name, a decimal immediate, or a bracketed address
pub fn parse_operand(text: &str) -> Result<Operand> {
    let tokens: Vec<Token> = Token::lexer(text)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| syntax_error(text, "unrecognized token"))?;

    match tokens.as_slice() {
        [Token::Register(reg)] => Ok(Operand::Register(*reg)),
        [Token::Number(n)] => Word::try_from(*n)
            .map(Operand::Immediate)
            .map_err(|_| AssemblerError::InvalidImmediate(text.trim().to_string())),
        [Token::LBracket, Token::Number(n), Token::RBracket] => Address::try_from(*n)
            .map(Operand::Address)
            .map_err(|_| AssemblerError::InvalidAddress(text.trim().to_string())),
        [] => Err(syntax_error(text, "empty operand")),
        _ => Err(syntax_error(text, "expected register, number, or [address]")),
    }
}

/// Parse register name
pub fn parse_register(text: &str) -> Result<Register> {
    match parse_operand(text) {
        Ok(Operand::Register(reg)) => Ok(reg),
        _ => Err(AssemblerError::InvalidRegister(text.trim().to_string())),
    }
}

fn parse_immediate(text: &str) -> Result<Word> {
    match parse_operand(text)? {
        Operand::Immediate(value) => Ok(value),
        _ => Err(AssemblerError::InvalidImmediate(text.trim().to_string())),
    }
}

fn parse_address(text: &str) -> Result<Address> {
    match parse_operand(text)? {
        Operand::Address(address) => Ok(address),
        _ => Err(AssemblerError::InvalidAddress(text.trim().to_string())),
    }
}

/// Parse a command from its mnemonic and up to two operand strings.
///
/// Blank operand strings count as absent.
pub fn parse_command(mnemonic: &str, operands: &[&str]) -> Result<Command> {
    let operands: Vec<&str> = operands
        .iter()
        .map(|op| op.trim())
        .filter(|op| !op.is_empty())
        .collect();

    match mnemonic {
        "run" => {
            expect_operands::<0>(mnemonic, &operands)?;
            return Ok(Command::Run);
        }
        "reset" => {
            expect_operands::<0>(mnemonic, &operands)?;
            return Ok(Command::Reset);
        }
        "save" => {
            let [path] = expect_operands(mnemonic, &operands)?;
            return Ok(Command::Save(PathBuf::from(path)));
        }
        "load" => {
            let [path] = expect_operands(mnemonic, &operands)?;
            return Ok(Command::Load(PathBuf::from(path)));
        }
        "mov" => {
            let [dst, src] = expect_operands(mnemonic, &operands)?;
            return parse_mov(dst, src).map(Command::Write);
        }
        _ => {}
    }

    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| AssemblerError::UnknownInstruction(mnemonic.to_string()))?;

    let inst = match opcode {
        Opcode::MovToReg => {
            let [dst, value] = expect_operands(mnemonic, &operands)?;
            Instruction::MovToReg {
                dst: parse_register(dst)?,
                value: parse_immediate(value)?,
            }
        }
        Opcode::MovToRam => {
            let [address, src] = expect_operands(mnemonic, &operands)?;
            Instruction::MovToRam {
                address: parse_address(address)?,
                src: parse_register(src)?,
            }
        }
        Opcode::MovFromRam => {
            let [dst, address] = expect_operands(mnemonic, &operands)?;
            Instruction::MovFromRam {
                dst: parse_register(dst)?,
                address: parse_address(address)?,
            }
        }
        Opcode::Dumpreg => {
            expect_operands::<0>(mnemonic, &operands)?;
            Instruction::Dumpreg
        }
        Opcode::Add | Opcode::Sub => {
            let [dst, src] = expect_operands(mnemonic, &operands)?;
            let (dst, src) = (parse_register(dst)?, parse_register(src)?);
            if opcode == Opcode::Add {
                Instruction::Add { dst, src }
            } else {
                Instruction::Sub { dst, src }
            }
        }
        Opcode::Inc => {
            let [dst] = expect_operands(mnemonic, &operands)?;
            Instruction::Inc { dst: parse_register(dst)? }
        }
        Opcode::Dec => {
            let [dst] = expect_operands(mnemonic, &operands)?;
            Instruction::Dec { dst: parse_register(dst)? }
        }
        Opcode::Ret => {
            expect_operands::<0>(mnemonic, &operands)?;
            Instruction::Ret
        }
    };

    Ok(Command::Write(inst))
}

/// Parse one line of source text: `mnemonic op1, op2`.
///
/// Anything after `;` is a comment. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let code = line.split(';').next().unwrap_or_default().trim();
    if code.is_empty() {
        return Ok(None);
    }

    let (mnemonic, rest) = match code.split_once(char::is_whitespace) {
        Some((mnemonic, rest)) => (mnemonic, rest.trim()),
        None => (code, ""),
    };

    let operands: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').collect()
    };

    parse_command(&mnemonic.to_ascii_lowercase(), &operands).map(Some)
}

/// `mov` picks its encoding from the operand shapes
fn parse_mov(dst: &str, src: &str) -> Result<Instruction> {
    match (parse_operand(dst)?, parse_operand(src)?) {
        (Operand::Address(address), Operand::Register(src)) => {
            Ok(Instruction::MovToRam { address, src })
        }
        (Operand::Register(dst), Operand::Address(address)) => {
            Ok(Instruction::MovFromRam { dst, address })
        }
        (Operand::Register(dst), Operand::Immediate(value)) => {
            Ok(Instruction::MovToReg { dst, value })
        }
        (Operand::Register(_), _) | (Operand::Address(_), _) => {
            Err(syntax_error(src, "operand shape not valid for mov"))
        }
        (Operand::Immediate(_), _) => Err(AssemblerError::InvalidRegister(dst.to_string())),
    }
}

fn expect_operands<'a, const N: usize>(mnemonic: &str, operands: &[&'a str]) -> Result<[&'a str; N]> {
    let found = operands.len();
    if found < N {
        return Err(AssemblerError::MissingOperand {
            mnemonic: mnemonic.to_string(),
            expected: N,
            found,
        });
    }
    operands.try_into().map_err(|_| AssemblerError::UnexpectedOperand {
        mnemonic: mnemonic.to_string(),
        expected: N,
        found,
    })
}

fn syntax_error(operand: &str, message: &str) -> AssemblerError {
    AssemblerError::SyntaxError {
        operand: operand.trim().to_string(),
        message: message.to_string(),
    }
}
