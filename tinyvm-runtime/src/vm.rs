//! Virtual Machine for TinyVM
//!
//! Owns memory, the register file, and the instruction pointer. Between runs
//! the instruction pointer is the encoder's write cursor; `run` resets it to 0
//! and drives the fetch-decode-execute loop until `ret`.

use std::io::{self, Write};

use tinyvm_spec::{Command, Instruction, Opcode, Register, DEFAULT_CAPACITY, MAX_CAPACITY};
use tracing::{debug, trace};

use crate::encoder::Encoder;
use crate::error::{Result, RuntimeError};
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::state::{ExecState, HaltReason};
use crate::trace::Tracer;

/// VM configuration
#[derive(Debug, Clone)]
pub struct VMConfig {
    /// Memory size in bytes (1-65535)
    pub capacity: usize,

    /// Emit a trace line per executed instruction
    pub debug: bool,

    /// Stop after this many instructions. `None` runs until `ret`, forever if
    /// the program never reaches one.
    pub max_cycles: Option<u64>,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            debug: false,
            max_cycles: None,
        }
    }
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Number of instructions executed
    pub cycles: u64,

    /// Reason for halting
    pub halt_reason: HaltReason,
}

/// TinyVM Virtual Machine
pub struct VM {
    pub(crate) memory: Memory,
    pub(crate) registers: RegisterFile,
    pub(crate) ip: u16,
    state: ExecState,
    tracer: Tracer,
    config: VMConfig,
    /// Sink for dumpreg and trace lines
    output: Box<dyn Write>,
}

impl VM {
    /// Create a VM that prints to stdout
    pub fn new(config: VMConfig) -> Result<Self> {
        Self::with_output(config, Box::new(io::stdout()))
    }

    /// Create a VM that prints dumpreg and trace lines to `output`
    pub fn with_output(config: VMConfig, output: Box<dyn Write>) -> Result<Self> {
        if config.capacity == 0 || config.capacity > MAX_CAPACITY {
            return Err(RuntimeError::InvalidCapacity(config.capacity));
        }

        Ok(Self {
            memory: Memory::new(config.capacity),
            registers: RegisterFile::new(),
            ip: 0,
            state: ExecState::Idle,
            tracer: Tracer::new(config.debug),
            config,
            output,
        })
    }

    /// Run from address 0 until `ret`.
    ///
    /// On success the ip is reset to 0. On error the ip is left where the
    /// failing instruction was being decoded or executed.
    pub fn run(&mut self) -> Result<ExecutionResult> {
        self.ip = 0;
        self.state = ExecState::Running;
        debug!(capacity = self.memory.capacity(), "run started");

        let outcome = self.execute_loop();

        // Halted and aborted runs both return to Idle
        self.state = ExecState::Idle;
        let flushed = self.output.flush();
        let result = outcome?;
        flushed?;

        self.ip = 0;
        debug!(cycles = result.cycles, reason = ?result.halt_reason, "run finished");
        Ok(result)
    }

    fn execute_loop(&mut self) -> Result<ExecutionResult> {
        let mut cycles = 0u64;

        while self.state.is_running() {
            if let Some(limit) = self.config.max_cycles {
                if cycles >= limit {
                    return Ok(ExecutionResult {
                        cycles,
                        halt_reason: HaltReason::CycleLimit,
                    });
                }
            }

            let at = self.ip;
            let byte = self.fetch_u8()?;
            let opcode = Opcode::from_u8(byte)
                .ok_or(RuntimeError::UnknownOpcode { opcode: byte, ip: at })?;
            trace!(ip = at, %opcode, "fetch");

            self.dispatch(opcode, at, cycles)?;
            cycles += 1;
        }

        Ok(ExecutionResult {
            cycles,
            halt_reason: HaltReason::Ret,
        })
    }

    /// Hand control to the handler for `opcode`. Each handler consumes its own
    /// operand bytes, so on return the ip points at the next opcode.
    fn dispatch(&mut self, opcode: Opcode, at: u16, seq: u64) -> Result<()> {
        match opcode {
            Opcode::MovToReg => self.exec_mov_to_reg(at, seq),
            Opcode::MovToRam => self.exec_mov_to_ram(at, seq),
            Opcode::MovFromRam => self.exec_mov_from_ram(at, seq),
            Opcode::Dumpreg => self.exec_dumpreg(seq),
            Opcode::Add => self.exec_add(at, seq),
            Opcode::Sub => self.exec_sub(at, seq),
            Opcode::Inc => self.exec_inc(at, seq),
            Opcode::Dec => self.exec_dec(at, seq),
            Opcode::Ret => self.exec_ret(seq),
        }
    }

    // ========== Operand Fetch ==========

    fn fetch_u8(&mut self) -> Result<u8> {
        let byte = self.memory.read_u8(self.ip as usize)?;
        self.ip += 1;
        Ok(byte)
    }

    fn fetch_word(&mut self) -> Result<u16> {
        let word = self.memory.read_u16(self.ip as usize)?;
        self.ip += 2;
        Ok(word)
    }

    fn fetch_register(&mut self, at: u16) -> Result<Register> {
        let code = self.fetch_u8()?;
        decode_register(code, at)
    }

    fn fetch_register_pair(&mut self, at: u16) -> Result<(Register, Register)> {
        let byte = self.fetch_u8()?;
        let (dst, src) = tinyvm_spec::encoding::unpack_register_pair(byte);
        Ok((decode_register(dst, at)?, decode_register(src, at)?))
    }

    fn trace(&mut self, seq: u64, inst: &Instruction) -> Result<()> {
        self.tracer.emit(&mut self.output, seq, inst)?;
        Ok(())
    }

    // ========== Handlers ==========

    fn exec_mov_to_reg(&mut self, at: u16, seq: u64) -> Result<()> {
        let dst = self.fetch_register(at)?;
        let value = self.fetch_word()?;
        self.registers.set(dst, value);
        self.trace(seq, &Instruction::MovToReg { dst, value })
    }

    fn exec_mov_to_ram(&mut self, at: u16, seq: u64) -> Result<()> {
        let address = self.fetch_word()?;
        let src = self.fetch_register(at)?;
        self.memory.write_u16(address as usize, self.registers.get(src))?;
        self.trace(seq, &Instruction::MovToRam { address, src })
    }

    fn exec_mov_from_ram(&mut self, at: u16, seq: u64) -> Result<()> {
        let dst = self.fetch_register(at)?;
        let address = self.fetch_word()?;
        let value = self.memory.read_u16(address as usize)?;
        self.registers.set(dst, value);
        self.trace(seq, &Instruction::MovFromRam { dst, address })
    }

    fn exec_dumpreg(&mut self, seq: u64) -> Result<()> {
        self.trace(seq, &Instruction::Dumpreg)?;
        writeln!(self.output, "a: {}", self.registers.get(Register::A))?;
        writeln!(self.output, "b: {}", self.registers.get(Register::B))?;
        writeln!(self.output, "ip: {}", self.ip)?;
        Ok(())
    }

    fn exec_add(&mut self, at: u16, seq: u64) -> Result<()> {
        let (dst, src) = self.fetch_register_pair(at)?;
        self.registers.add(dst, src);
        self.trace(seq, &Instruction::Add { dst, src })
    }

    fn exec_sub(&mut self, at: u16, seq: u64) -> Result<()> {
        let (dst, src) = self.fetch_register_pair(at)?;
        self.registers.sub(dst, src);
        self.trace(seq, &Instruction::Sub { dst, src })
    }

    fn exec_inc(&mut self, at: u16, seq: u64) -> Result<()> {
        let dst = self.fetch_register(at)?;
        self.registers.increment(dst);
        self.trace(seq, &Instruction::Inc { dst })
    }

    fn exec_dec(&mut self, at: u16, seq: u64) -> Result<()> {
        let dst = self.fetch_register(at)?;
        self.registers.decrement(dst);
        self.trace(seq, &Instruction::Dec { dst })
    }

    fn exec_ret(&mut self, seq: u64) -> Result<()> {
        self.trace(seq, &Instruction::Ret)?;
        self.state = ExecState::Halted;
        Ok(())
    }

    // ========== Authoring & Control ==========

    /// Encoder writing at the current ip
    pub fn encoder(&mut self) -> Encoder<'_> {
        Encoder::new(&mut self.memory, &mut self.ip)
    }

    /// Encode one instruction at the current ip
    pub fn write(&mut self, inst: &Instruction) -> Result<()> {
        self.encoder().write(inst)
    }

    /// Zero memory and registers, rewind the ip
    pub fn reset(&mut self) {
        self.memory.clear();
        self.registers.reset();
        self.ip = 0;
        self.state = ExecState::Idle;
        debug!("machine reset");
    }

    /// Perform a single command. Only `Run` produces a result.
    pub fn apply(&mut self, command: &Command) -> Result<Option<ExecutionResult>> {
        match command {
            Command::Write(inst) => self.write(inst).map(|_| None),
            Command::Run => self.run().map(Some),
            Command::Reset => {
                self.reset();
                Ok(None)
            }
            Command::Save(path) => self.save(path).map(|_| None),
            Command::Load(path) => self.load(path).map(|_| None),
        }
    }

    // ========== Accessors ==========

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn ip(&self) -> u16 {
        self.ip
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }

    /// Toggle per-instruction trace lines
    pub fn set_debug(&mut self, enabled: bool) {
        self.config.debug = enabled;
        self.tracer.set_enabled(enabled);
    }
}

fn decode_register(code: u8, at: u16) -> Result<Register> {
    Register::from_code(code).map_err(|_| RuntimeError::InvalidRegister { code, ip: at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn create_vm(config: VMConfig) -> (VM, SharedBuffer) {
        let out = SharedBuffer::default();
        let vm = VM::with_output(config, Box::new(out.clone())).unwrap();
        (vm, out)
    }

    fn create_program(vm: &mut VM, instructions: &[Instruction]) {
        for inst in instructions {
            vm.write(inst).unwrap();
        }
    }

    #[test]
    fn test_vm_basic_execution() {
        let (mut vm, out) = create_vm(VMConfig::default());
        create_program(
            &mut vm,
            &[
                Instruction::MovToReg { dst: Register::A, value: 5 },
                Instruction::MovToReg { dst: Register::B, value: 3 },
                Instruction::Add { dst: Register::A, src: Register::B },
                Instruction::Ret,
            ],
        );
        assert_eq!(vm.ip(), 11);

        let result = vm.run().unwrap();

        assert_eq!(result.halt_reason, HaltReason::Ret);
        assert_eq!(result.cycles, 4);
        assert_eq!(vm.registers().get(Register::A), 8);
        assert_eq!(vm.registers().get(Register::B), 3);
        assert_eq!(vm.ip(), 0);
        assert_eq!(vm.state(), ExecState::Idle);
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_vm_dumpreg_output() {
        let (mut vm, out) = create_vm(VMConfig::default());
        create_program(
            &mut vm,
            &[
                Instruction::MovToReg { dst: Register::A, value: 5 },
                Instruction::MovToReg { dst: Register::B, value: 3 },
                Instruction::Add { dst: Register::A, src: Register::B },
                Instruction::Dumpreg,
                Instruction::Ret,
            ],
        );

        vm.run().unwrap();

        // ip points just past the dumpreg opcode
        assert_eq!(out.contents(), "a: 8\nb: 3\nip: 11\n");
    }

    #[test]
    fn test_vm_debug_trace() {
        let config = VMConfig {
            debug: true,
            ..VMConfig::default()
        };
        let (mut vm, out) = create_vm(config);
        create_program(
            &mut vm,
            &[
                Instruction::MovToReg { dst: Register::A, value: 7 },
                Instruction::MovToRam { address: 100, src: Register::A },
                Instruction::MovFromRam { dst: Register::B, address: 100 },
                Instruction::Dumpreg,
                Instruction::Ret,
            ],
        );

        vm.run().unwrap();

        assert_eq!(
            out.contents(),
            "debug [00]: mov_to_reg a, 7\n\
             debug [01]: mov_to_ram [100], a\n\
             debug [02]: mov_from_ram b, [100]\n\
             debug [03]: dumpreg\n\
             a: 7\n\
             b: 7\n\
             ip: 13\n\
             debug [04]: ret\n"
        );
    }

    #[test]
    fn test_trace_counter_restarts_each_run() {
        let config = VMConfig {
            debug: true,
            ..VMConfig::default()
        };
        let (mut vm, out) = create_vm(config);
        create_program(&mut vm, &[Instruction::Inc { dst: Register::A }, Instruction::Ret]);

        vm.run().unwrap();
        vm.run().unwrap();

        assert_eq!(
            out.contents(),
            "debug [00]: inc a\ndebug [01]: ret\ndebug [00]: inc a\ndebug [01]: ret\n"
        );
        assert_eq!(vm.registers().get(Register::A), 2);
    }

    #[test]
    fn test_failed_ram_access_is_not_traced() {
        let config = VMConfig {
            capacity: 64,
            debug: true,
            ..VMConfig::default()
        };
        let (mut vm, out) = create_vm(config);
        create_program(
            &mut vm,
            &[
                Instruction::Inc { dst: Register::B },
                Instruction::MovFromRam { dst: Register::A, address: 63 },
                Instruction::Ret,
            ],
        );

        let err = vm.run().unwrap_err();

        assert!(matches!(err, RuntimeError::OutOfBounds { address: 63, len: 2, capacity: 64 }));
        assert_eq!(out.contents(), "debug [00]: inc b\n");
        assert_eq!(vm.registers().get(Register::A), 0);
    }

    #[test]
    fn test_failed_store_is_not_traced() {
        let config = VMConfig {
            capacity: 64,
            debug: true,
            ..VMConfig::default()
        };
        let (mut vm, out) = create_vm(config);
        create_program(
            &mut vm,
            &[
                Instruction::MovToRam { address: 64, src: Register::A },
                Instruction::Ret,
            ],
        );

        assert!(vm.run().is_err());
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_vm_memory_operations() {
        let (mut vm, _) = create_vm(VMConfig::default());
        create_program(
            &mut vm,
            &[
                Instruction::MovToReg { dst: Register::A, value: 0xBEEF },
                Instruction::MovToRam { address: 4000, src: Register::A },
                Instruction::MovFromRam { dst: Register::B, address: 4000 },
                Instruction::Ret,
            ],
        );

        vm.run().unwrap();

        assert_eq!(vm.registers().get(Register::B), 0xBEEF);
        assert_eq!(vm.memory().read_u8(4000).unwrap(), 0xEF);
        assert_eq!(vm.memory().read_u8(4001).unwrap(), 0xBE);
    }

    #[test]
    fn test_vm_sub_wraps() {
        let (mut vm, _) = create_vm(VMConfig::default());
        create_program(
            &mut vm,
            &[
                Instruction::MovToReg { dst: Register::A, value: 1 },
                Instruction::MovToReg { dst: Register::B, value: 2 },
                Instruction::Sub { dst: Register::A, src: Register::B },
                Instruction::Ret,
            ],
        );

        vm.run().unwrap();
        assert_eq!(vm.registers().get(Register::A), 0xFFFF);
    }

    #[test]
    fn test_vm_inc_dec_wrap() {
        let (mut vm, _) = create_vm(VMConfig::default());
        create_program(
            &mut vm,
            &[
                Instruction::MovToReg { dst: Register::A, value: 65535 },
                Instruction::Inc { dst: Register::A },
                Instruction::Dec { dst: Register::B },
                Instruction::Ret,
            ],
        );

        vm.run().unwrap();
        assert_eq!(vm.registers().get(Register::A), 0);
        assert_eq!(vm.registers().get(Register::B), 65535);
    }

    #[test]
    fn test_vm_unknown_opcode() {
        let (mut vm, _) = create_vm(VMConfig::default());
        vm.write(&Instruction::Inc { dst: Register::B }).unwrap();
        vm.memory.write_u8(2, 0x09).unwrap();

        let err = vm.run().unwrap_err();

        assert!(matches!(err, RuntimeError::UnknownOpcode { opcode: 0x09, ip: 2 }));
        assert_eq!(vm.state(), ExecState::Idle);
        assert_eq!(vm.registers().get(Register::B), 1);
    }

    #[test]
    fn test_vm_unknown_opcode_first_byte() {
        let (mut vm, _) = create_vm(VMConfig::default());
        vm.memory.write_u8(0, 0xFF).unwrap();

        let err = vm.run().unwrap_err();

        assert!(matches!(err, RuntimeError::UnknownOpcode { opcode: 0xFF, ip: 0 }));
        assert_eq!(vm.registers(), &RegisterFile::new());
    }

    #[test]
    fn test_vm_invalid_register() {
        let (mut vm, _) = create_vm(VMConfig::default());
        // add with source nibble 2
        vm.memory.write_bytes(0, &[0x04, 0x02]).unwrap();

        let err = vm.run().unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidRegister { code: 2, ip: 0 }));
    }

    #[test]
    fn test_vm_runs_off_end() {
        let config = VMConfig {
            capacity: 8,
            ..VMConfig::default()
        };
        let (mut vm, _) = create_vm(config);
        // Two mov_to_reg a, 0 from zeroed memory, then no room for another opcode
        let err = vm.run().unwrap_err();
        assert!(matches!(err, RuntimeError::OutOfBounds { address: 8, len: 1, capacity: 8 }));
    }

    #[test]
    fn test_vm_ram_access_out_of_bounds() {
        let config = VMConfig {
            capacity: 64,
            ..VMConfig::default()
        };
        let (mut vm, _) = create_vm(config);
        create_program(
            &mut vm,
            &[
                Instruction::MovFromRam { dst: Register::A, address: 63 },
                Instruction::Ret,
            ],
        );

        let err = vm.run().unwrap_err();
        assert!(matches!(err, RuntimeError::OutOfBounds { address: 63, len: 2, .. }));
    }

    #[test]
    fn test_vm_cycle_limit() {
        let config = VMConfig {
            max_cycles: Some(100),
            ..VMConfig::default()
        };
        // Zeroed memory decodes as an endless run of mov_to_reg a, 0
        let (mut vm, _) = create_vm(config);

        let result = vm.run().unwrap();

        assert_eq!(result.halt_reason, HaltReason::CycleLimit);
        assert_eq!(result.cycles, 100);
        assert_eq!(vm.ip(), 0);
    }

    #[test]
    fn test_invalid_capacity() {
        let config = VMConfig {
            capacity: 0,
            ..VMConfig::default()
        };
        assert!(matches!(
            VM::with_output(config, Box::new(io::sink())),
            Err(RuntimeError::InvalidCapacity(0))
        ));

        let config = VMConfig {
            capacity: 70_000,
            ..VMConfig::default()
        };
        assert!(VM::with_output(config, Box::new(io::sink())).is_err());
    }

    #[test]
    fn test_reset() {
        let (mut vm, _) = create_vm(VMConfig::default());
        create_program(
            &mut vm,
            &[Instruction::MovToReg { dst: Register::B, value: 9 }, Instruction::Ret],
        );
        vm.run().unwrap();
        vm.write(&Instruction::Dumpreg).unwrap();

        vm.reset();

        assert_eq!(vm.ip(), 0);
        assert_eq!(vm.registers().get(Register::B), 0);
        assert!(vm.memory().as_bytes().iter().all(|&b| b == 0));
        assert_eq!(vm.memory().capacity(), 8192);
    }

    #[test]
    fn test_apply_commands() {
        let (mut vm, out) = create_vm(VMConfig::default());

        let commands = [
            Command::Write(Instruction::MovToReg { dst: Register::A, value: 2 }),
            Command::Write(Instruction::Inc { dst: Register::A }),
            Command::Write(Instruction::Dumpreg),
            Command::Write(Instruction::Ret),
        ];
        for command in &commands {
            assert_eq!(vm.apply(command).unwrap(), None);
        }

        let result = vm.apply(&Command::Run).unwrap();
        assert_eq!(
            result,
            Some(ExecutionResult {
                cycles: 4,
                halt_reason: HaltReason::Ret
            })
        );
        assert_eq!(out.contents(), "a: 3\nb: 0\nip: 7\n");

        vm.apply(&Command::Reset).unwrap();
        assert_eq!(vm.registers().get(Register::A), 0);
    }

    #[test]
    fn test_set_debug() {
        let (mut vm, out) = create_vm(VMConfig::default());
        vm.write(&Instruction::Ret).unwrap();

        vm.set_debug(true);
        vm.run().unwrap();

        assert!(vm.config().debug);
        assert_eq!(out.contents(), "debug [00]: ret\n");
    }
}
