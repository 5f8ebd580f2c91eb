//! # TinyVM Runtime
//!
//! A register-and-RAM virtual machine: one byte memory holding both bytecode
//! and data, two 16-bit registers, and an instruction pointer.
//!
//! Programs are authored in place through the [`Encoder`], which writes at
//! the instruction pointer, and executed with [`VM::run`], which rewinds the
//! instruction pointer to 0 and loops until `ret`.
//!
//! ## Example
//!
//! ```rust
//! use tinyvm_runtime::{VM, VMConfig};
//! use tinyvm_spec::Register;
//!
//! let mut vm = VM::with_output(VMConfig::default(), Box::new(std::io::sink())).unwrap();
//! let mut enc = vm.encoder();
//! enc.write_mov_to_reg(Register::A, 5).unwrap();
//! enc.write_mov_to_reg(Register::B, 3).unwrap();
//! enc.write_add(Register::A, Register::B).unwrap();
//! enc.write_ret().unwrap();
//!
//! vm.run().unwrap();
//! assert_eq!(vm.registers().get(Register::A), 8);
//! ```

pub mod error;
pub mod memory;
pub mod registers;
pub mod encoder;
pub mod state;
pub mod trace;
pub mod vm;
pub mod persist;

pub use error::{Result, RuntimeError};
pub use memory::Memory;
pub use registers::RegisterFile;
pub use encoder::Encoder;
pub use state::{ExecState, HaltReason};
pub use trace::{trace_line, Tracer};
pub use vm::{ExecutionResult, VMConfig, VM};
