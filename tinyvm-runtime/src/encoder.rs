//! Instruction encoder
//!
//! Writes instructions into memory at a cursor and advances it. The machine
//! lends its instruction pointer as the cursor while a program is authored.
//! Each write checks the full instruction length against the remaining
//! capacity first, so a failed write leaves memory untouched.

use tinyvm_spec::encoding::encode;
use tinyvm_spec::{Address, Instruction, Register, Word};

use crate::error::Result;
use crate::memory::Memory;

pub struct Encoder<'a> {
    memory: &'a mut Memory,
    cursor: &'a mut u16,
}

impl<'a> Encoder<'a> {
    pub fn new(memory: &'a mut Memory, cursor: &'a mut u16) -> Self {
        Encoder { memory, cursor }
    }

    /// Offset where the next instruction will be written
    pub fn cursor(&self) -> u16 {
        *self.cursor
    }

    /// Encode `inst` at the cursor and advance past it
    pub fn write(&mut self, inst: &Instruction) -> Result<()> {
        let bytes = encode(inst);
        let address = *self.cursor as usize;

        self.memory.write_bytes(address, &bytes)?;

        // Capacity never exceeds u16::MAX, so the end offset fits
        *self.cursor += bytes.len() as u16;
        Ok(())
    }

    pub fn write_mov_to_reg(&mut self, dst: Register, value: Word) -> Result<()> {
        self.write(&Instruction::MovToReg { dst, value })
    }

    pub fn write_mov_to_ram(&mut self, address: Address, src: Register) -> Result<()> {
        self.write(&Instruction::MovToRam { address, src })
    }

    pub fn write_mov_from_ram(&mut self, dst: Register, address: Address) -> Result<()> {
        self.write(&Instruction::MovFromRam { dst, address })
    }

    pub fn write_dumpreg(&mut self) -> Result<()> {
        self.write(&Instruction::Dumpreg)
    }

    pub fn write_add(&mut self, dst: Register, src: Register) -> Result<()> {
        self.write(&Instruction::Add { dst, src })
    }

    pub fn write_sub(&mut self, dst: Register, src: Register) -> Result<()> {
        self.write(&Instruction::Sub { dst, src })
    }

    pub fn write_inc(&mut self, dst: Register) -> Result<()> {
        self.write(&Instruction::Inc { dst })
    }

    pub fn write_dec(&mut self, dst: Register) -> Result<()> {
        self.write(&Instruction::Dec { dst })
    }

    pub fn write_ret(&mut self) -> Result<()> {
        self.write(&Instruction::Ret)
    }
}
