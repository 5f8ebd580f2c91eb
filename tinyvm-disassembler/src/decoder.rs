//! Instruction decoder

use tinyvm_spec::encoding::{unpack_register_pair, unpack_word};
use tinyvm_spec::{Instruction, Opcode, Register};
use crate::error::{DisassemblerError, Result};

/// Decode the instruction starting at `offset`.
///
/// Returns the instruction and its encoded length in bytes.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(Instruction, usize)> {
    let opcode_byte = *bytes.get(offset).ok_or(DisassemblerError::Truncated {
        offset,
        needed: 1,
        available: 0,
    })?;

    let opcode = Opcode::from_u8(opcode_byte).ok_or(DisassemblerError::UnknownOpcode {
        opcode: opcode_byte,
        offset,
    })?;

    let len = opcode.encoded_len();
    let available = bytes.len() - offset;
    if available < len {
        return Err(DisassemblerError::Truncated {
            offset,
            needed: len,
            available,
        });
    }
    let operands = &bytes[offset + 1..offset + len];

    let inst = match opcode {
        Opcode::MovToReg => Instruction::MovToReg {
            dst: decode_register(operands[0], offset)?,
            value: unpack_word([operands[1], operands[2]]),
        },
        Opcode::MovToRam => Instruction::MovToRam {
            address: unpack_word([operands[0], operands[1]]),
            src: decode_register(operands[2], offset)?,
        },
        Opcode::MovFromRam => Instruction::MovFromRam {
            dst: decode_register(operands[0], offset)?,
            address: unpack_word([operands[1], operands[2]]),
        },
        Opcode::Dumpreg => Instruction::Dumpreg,
        Opcode::Add => {
            let (dst, src) = decode_register_pair(operands[0], offset)?;
            Instruction::Add { dst, src }
        }
        Opcode::Sub => {
            let (dst, src) = decode_register_pair(operands[0], offset)?;
            Instruction::Sub { dst, src }
        }
        Opcode::Inc => Instruction::Inc {
            dst: decode_register(operands[0], offset)?,
        },
        Opcode::Dec => Instruction::Dec {
            dst: decode_register(operands[0], offset)?,
        },
        Opcode::Ret => Instruction::Ret,
    };

    Ok((inst, len))
}

fn decode_register(code: u8, offset: usize) -> Result<Register> {
    Register::from_code(code).map_err(|_| DisassemblerError::InvalidRegister { code, offset })
}

fn decode_register_pair(byte: u8, offset: usize) -> Result<(Register, Register)> {
    let (dst, src) = unpack_register_pair(byte);
    Ok((decode_register(dst, offset)?, decode_register(src, offset)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyvm_spec::encoding::encode;

    #[test]
    fn test_decode_mov_to_reg() {
        let bytes = [0x00, 0x01, 0xFF, 0xFF];
        let (inst, len) = decode(&bytes, 0).unwrap();
        assert_eq!(inst, Instruction::MovToReg { dst: Register::B, value: 65535 });
        assert_eq!(len, 4);
    }

    #[test]
    fn test_decode_at_offset() {
        let mut bytes = encode(&Instruction::Dumpreg);
        bytes.extend(encode(&Instruction::Sub { dst: Register::B, src: Register::A }));
        let (inst, len) = decode(&bytes, 1).unwrap();
        assert_eq!(inst, Instruction::Sub { dst: Register::B, src: Register::A });
        assert_eq!(len, 2);
    }

    #[test]
    fn test_decode_unknown_opcode() {
        let err = decode(&[0x09], 0).unwrap_err();
        assert_eq!(err, DisassemblerError::UnknownOpcode { opcode: 0x09, offset: 0 });
    }

    #[test]
    fn test_decode_invalid_register() {
        let err = decode(&[0x06, 0x02], 0).unwrap_err();
        assert_eq!(err, DisassemblerError::InvalidRegister { code: 2, offset: 0 });

        // Bad source nibble in a packed pair
        let err = decode(&[0x04, 0x03], 0).unwrap_err();
        assert_eq!(err, DisassemblerError::InvalidRegister { code: 3, offset: 0 });
    }

    #[test]
    fn test_decode_truncated() {
        let err = decode(&[0x02, 0x00], 0).unwrap_err();
        assert_eq!(
            err,
            DisassemblerError::Truncated { offset: 0, needed: 4, available: 2 }
        );

        let err = decode(&[0x08], 1).unwrap_err();
        assert_eq!(
            err,
            DisassemblerError::Truncated { offset: 1, needed: 1, available: 0 }
        );
    }
}
