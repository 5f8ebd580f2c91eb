//! # Lexer for TinyVM operands

use logos::Logos;
use tinyvm_spec::Register;

/// Tokens of a single operand
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token {
    /// Register name (a, b)
    #[regex(r"[ab]", |lex| lex.slice().parse::<Register>().ok())]
    Register(Register),

    /// Decimal number, saturating at `u64::MAX`
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().unwrap_or(u64::MAX))]
    Number(u64),

    /// Opening bracket of a RAM address
    #[token("[")]
    LBracket,

    /// Closing bracket of a RAM address
    #[token("]")]
    RBracket,
}
