//! Memory subsystem
//!
//! A fixed-size byte array shared by code and data. Words are 16-bit,
//! little-endian, and may sit at any byte offset.

use tinyvm_spec::encoding::{pack_word, unpack_word};
use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<u8>,
}

impl Memory {
    /// Create zero-filled memory with `capacity` cells
    pub fn new(capacity: usize) -> Self {
        Memory {
            cells: vec![0; capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Fail unless `[address, address + len)` lies inside memory
    pub fn check_range(&self, address: usize, len: usize) -> Result<()> {
        match address.checked_add(len) {
            Some(end) if end <= self.cells.len() => Ok(()),
            _ => Err(RuntimeError::OutOfBounds {
                address,
                len,
                capacity: self.cells.len(),
            }),
        }
    }

    pub fn read_u8(&self, address: usize) -> Result<u8> {
        self.check_range(address, 1)?;
        Ok(self.cells[address])
    }

    pub fn write_u8(&mut self, address: usize, value: u8) -> Result<()> {
        self.check_range(address, 1)?;
        self.cells[address] = value;
        Ok(())
    }

    pub fn read_u16(&self, address: usize) -> Result<u16> {
        self.check_range(address, 2)?;
        Ok(unpack_word([self.cells[address], self.cells[address + 1]]))
    }

    pub fn write_u16(&mut self, address: usize, value: u16) -> Result<()> {
        self.write_bytes(address, &pack_word(value))
    }

    /// Write a byte run; nothing is written unless the whole run fits
    pub fn write_bytes(&mut self, address: usize, bytes: &[u8]) -> Result<()> {
        self.check_range(address, bytes.len())?;
        self.cells[address..address + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Zero every cell in place
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Full cell sequence, in address order
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }
}
