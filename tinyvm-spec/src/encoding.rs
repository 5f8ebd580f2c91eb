//! # Instruction Encoding Helpers
//!
//! Byte-level packing shared by the encoder, the executor, and the decoder.
//!
//! ## Layout
//!
//! ```text
//! MOV_TO_REG:   [0x00][reg][imm lo][imm hi]
//! MOV_TO_RAM:   [0x01][addr lo][addr hi][reg]
//! MOV_FROM_RAM: [0x02][reg][addr lo][addr hi]
//! DUMPREG:      [0x03]
//! ADD / SUB:    [0x04|0x05][dst << 4 | src]
//! INC / DEC:    [0x06|0x07][reg]
//! RET:          [0x08]
//! ```

use crate::instruction::Instruction;
use crate::register::Register;
use crate::Word;

/// Destination register nibble in a packed register pair
pub const PAIR_DST_SHIFT: u32 = 4;

/// Nibble mask for a packed register pair
pub const PAIR_NIBBLE_MASK: u8 = 0x0F;

// ============================================================================
// Word Packing
// ============================================================================

/// Split a word into little-endian bytes
#[inline]
pub const fn pack_word(value: Word) -> [u8; 2] {
    value.to_le_bytes()
}

/// Join two little-endian bytes into a word
#[inline]
pub const fn unpack_word(bytes: [u8; 2]) -> Word {
    Word::from_le_bytes(bytes)
}

// ============================================================================
// Register Pair Packing
// ============================================================================

/// Pack destination (high nibble) and source (low nibble) into one byte
#[inline]
pub const fn pack_register_pair(dst: Register, src: Register) -> u8 {
    (dst.code() << PAIR_DST_SHIFT) | (src.code() & PAIR_NIBBLE_MASK)
}

/// Split a packed pair into raw (destination, source) codes
#[inline]
pub const fn unpack_register_pair(byte: u8) -> (u8, u8) {
    (byte >> PAIR_DST_SHIFT, byte & PAIR_NIBBLE_MASK)
}

// ============================================================================
// Instruction Encoding
// ============================================================================

/// Encode an instruction into its byte sequence
pub fn encode(inst: &Instruction) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(inst.encoded_len());
    bytes.push(inst.opcode().to_u8());

    match *inst {
        Instruction::MovToReg { dst, value } => {
            bytes.push(dst.code());
            bytes.extend_from_slice(&pack_word(value));
        }
        Instruction::MovToRam { address, src } => {
            bytes.extend_from_slice(&pack_word(address));
            bytes.push(src.code());
        }
        Instruction::MovFromRam { dst, address } => {
            bytes.push(dst.code());
            bytes.extend_from_slice(&pack_word(address));
        }
        Instruction::Add { dst, src } | Instruction::Sub { dst, src } => {
            bytes.push(pack_register_pair(dst, src));
        }
        Instruction::Inc { dst } | Instruction::Dec { dst } => {
            bytes.push(dst.code());
        }
        Instruction::Dumpreg | Instruction::Ret => {}
    }

    debug_assert_eq!(bytes.len(), inst.encoded_len());
    bytes
}
