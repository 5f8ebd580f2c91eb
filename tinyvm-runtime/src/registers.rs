//! Register file
//!
//! Indexed by [`Register`], so every access is checked at decode time rather
//! than on each read or write. Arithmetic wraps at 16 bits.

use tinyvm_spec::{Register, Word, NUM_REGISTERS};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFile {
    values: [Word; NUM_REGISTERS],
}

impl RegisterFile {
    /// Create a register file with all registers zeroed
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, reg: Register) -> Word {
        self.values[reg.index()]
    }

    #[inline]
    pub fn set(&mut self, reg: Register, value: Word) {
        self.values[reg.index()] = value;
    }

    pub fn increment(&mut self, reg: Register) {
        let value = self.get(reg).wrapping_add(1);
        self.set(reg, value);
    }

    pub fn decrement(&mut self, reg: Register) {
        let value = self.get(reg).wrapping_sub(1);
        self.set(reg, value);
    }

    /// dst = dst + src
    pub fn add(&mut self, dst: Register, src: Register) {
        let value = self.get(dst).wrapping_add(self.get(src));
        self.set(dst, value);
    }

    /// dst = dst - src
    pub fn sub(&mut self, dst: Register, src: Register) {
        let value = self.get(dst).wrapping_sub(self.get(src));
        self.set(dst, value);
    }

    /// Name used in traces
    #[inline]
    pub fn name(&self, reg: Register) -> &'static str {
        reg.name()
    }

    /// Zero all registers
    pub fn reset(&mut self) {
        self.values = [0; NUM_REGISTERS];
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_register() -> impl Strategy<Value = Register> {
        prop_oneof![Just(Register::A), Just(Register::B)]
    }

    proptest! {
        #[test]
        fn test_set_get(reg in arb_register(), value in any::<u16>()) {
            let mut regs = RegisterFile::new();
            regs.set(reg, value);
            prop_assert_eq!(regs.get(reg), value);
        }

        #[test]
        fn test_inc_dec_inverse(reg in arb_register(), value in any::<u16>()) {
            let mut regs = RegisterFile::new();
            regs.set(reg, value);
            regs.increment(reg);
            regs.decrement(reg);
            prop_assert_eq!(regs.get(reg), value);
        }
    }
}
