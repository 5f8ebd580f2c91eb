//! Debug tracer
//!
//! Emits one line per executed instruction:
//!
//! ```text
//! debug [00]: mov_to_reg a, 5
//! debug [01]: add a, b
//! debug [02]: ret
//! ```

use std::io::{self, Write};

use tinyvm_disassembler::format;
use tinyvm_spec::Instruction;

/// Render a single trace line (without the trailing newline)
pub fn trace_line(seq: u64, inst: &Instruction) -> String {
    format!("debug [{:02}]: {}", seq, format(inst))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer {
    enabled: bool,
}

impl Tracer {
    pub fn new(enabled: bool) -> Self {
        Tracer { enabled }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Write the trace line for `inst` if tracing is on
    pub fn emit(&self, out: &mut dyn Write, seq: u64, inst: &Instruction) -> io::Result<()> {
        if self.enabled {
            writeln!(out, "{}", trace_line(seq, inst))?;
        }
        Ok(())
    }
}
