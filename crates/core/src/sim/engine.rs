//! The execution engine.
//!
//! [`Simulator`] owns one run: the linked program, the architectural state,
//! and the cache hierarchy. It provides:
//! 1. **Stepping:** fetch, decode, and execute one instruction at a time,
//!    with every fault surfaced as a checked error.
//! 2. **Running:** repeat steps under a step budget, reporting exhaustion as
//!    a distinct outcome rather than an error.
//! 3. **Environment calls:** the console, heap, and exit services, buffered
//!    on the simulator so the core itself performs no I/O.
//!
//! Instruction fetch reads memory directly; only data loads and stores pass
//! through the cache hierarchy. A fetch therefore never perturbs the cache
//! statistics under study.

use std::mem;

use tracing::{debug, trace, warn};

use crate::cache::CacheHierarchy;
use crate::common::error::SimulatorError;
use crate::common::segments::{GLOBAL_POINTER, STACK_BEGIN, TEXT_BEGIN};
use crate::common::width::RegisterWidth;
use crate::config::SimulatorSettings;
use crate::isa::abi::reg;
use crate::isa::exec::{AmoWidth, CmpOp, Executor, IntBinOp, LoadKind};
use crate::isa::{Instruction, InstructionField, InstructionRegistry, MachineCode};
use crate::linker::LinkedProgram;
use crate::sim::coverage::Coverage;
use crate::sim::state::SimulatorState;

/// Lifecycle of one simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Loaded, nothing executed yet.
    Ready,
    /// At least one step taken, not finished.
    Running,
    /// The program exited. Stepping further is an error.
    Halted,
    /// A fault occurred. The machine stays errored until reset.
    Errored,
}

/// How a `run` ended when it did not fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program exited with this code.
    Halted {
        /// Guest exit code.
        exit_code: i32,
    },
    /// The step budget ran out first. The machine is still runnable.
    StepLimitExceeded {
        /// Steps taken by this call.
        steps: u64,
    },
}

/// A loaded guest machine: program, state, caches, and run policy.
#[derive(Debug)]
pub struct Simulator {
    program: LinkedProgram,
    settings: SimulatorSettings,
    state: SimulatorState,
    caches: CacheHierarchy,
    status: Status,
    error: Option<SimulatorError>,
    exit_code: Option<i32>,
    cycles: u64,
    stdout: String,
    coverage: Option<Coverage>,
    text_end: u64,
}

impl Simulator {
    /// Loads `program` into a fresh machine.
    ///
    /// The text and data images are placed at their segment bases, the
    /// program counter is set to the entry point, and (unless disabled in
    /// the settings) the stack and global pointers are initialized. The
    /// machine starts without caches; bind a hierarchy with
    /// [`set_caches`](Self::set_caches).
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::UnsupportedMachine`] when the settings name
    /// a register width the engine has no implementations for.
    pub fn new(program: LinkedProgram, settings: SimulatorSettings) -> Result<Self, SimulatorError> {
        if !settings.width.is_executable() {
            return Err(SimulatorError::UnsupportedMachine {
                width: settings.width,
            });
        }
        let text_end = TEXT_BEGIN + program.text.len() as u64 * 4;
        let mut sim = Self {
            state: SimulatorState::new(&program, settings.width, settings.set_regs_on_init),
            program,
            settings,
            caches: CacheHierarchy::default(),
            status: Status::Ready,
            error: None,
            exit_code: None,
            cycles: 0,
            stdout: String::new(),
            coverage: None,
            text_end,
        };
        sim.init_pointers();
        debug!(
            entry = sim.program.entry,
            insts = sim.program.text.len(),
            width = %sim.settings.width,
            "loaded"
        );
        Ok(sim)
    }

    fn init_pointers(&mut self) {
        if self.settings.set_regs_on_init {
            self.state.write_reg(reg::SP, STACK_BEGIN);
            self.state.write_reg(reg::GP, GLOBAL_POINTER);
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Executes one instruction.
    ///
    /// Returns the machine status after the step, [`Status::Halted`] when
    /// this step exited the program.
    ///
    /// # Errors
    ///
    /// Any fault (illegal instruction, unsupported width, misalignment,
    /// protected store, access violation) transitions the machine to
    /// [`Status::Errored`] and stays sticky: further steps fail with
    /// [`SimulatorError::NotRunnable`] until [`reset`](Self::reset).
    pub fn step(&mut self) -> Result<Status, SimulatorError> {
        match self.status {
            Status::Halted => return Err(SimulatorError::NotRunnable { state: "halted" }),
            Status::Errored => return Err(SimulatorError::NotRunnable { state: "errored" }),
            Status::Ready => self.status = Status::Running,
            Status::Running => {}
        }

        let pc = self.state.pc();
        if !self.settings.ecall_only_exit && pc >= self.text_end {
            self.halt(0);
            return Ok(self.status);
        }

        match self.exec_at(pc) {
            Ok(()) => {
                self.cycles += 1;
                if let Some(coverage) = &mut self.coverage {
                    coverage.note(pc);
                }
                Ok(self.status)
            }
            Err(error) => {
                self.status = Status::Errored;
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Runs until the program halts or the configured step budget runs out.
    ///
    /// # Errors
    ///
    /// Propagates the first fault, leaving the machine errored.
    pub fn run(&mut self) -> Result<RunOutcome, SimulatorError> {
        self.run_for(self.settings.max_steps)
    }

    /// Runs for at most `max_steps` instructions; a negative budget runs
    /// without limit.
    ///
    /// # Errors
    ///
    /// Propagates the first fault, leaving the machine errored.
    pub fn run_for(&mut self, max_steps: i64) -> Result<RunOutcome, SimulatorError> {
        let mut steps: u64 = 0;
        loop {
            if self.status == Status::Halted {
                return Ok(RunOutcome::Halted {
                    exit_code: self.exit_code.unwrap_or(0),
                });
            }
            if max_steps >= 0 && steps >= max_steps.unsigned_abs() {
                debug!(steps, "step budget exhausted");
                return Ok(RunOutcome::StepLimitExceeded { steps });
            }
            self.step()?;
            steps += 1;
        }
    }

    /// Returns the machine to its freshly loaded state.
    ///
    /// Registers, memory, the program counter, the console buffer, the cycle
    /// counter, and any recorded coverage are restored; cache *blocks* are
    /// invalidated but cache statistics are kept, so hit rates accumulate
    /// across repeated runs of the same program.
    pub fn reset(&mut self) {
        self.state = SimulatorState::new(
            &self.program,
            self.settings.width,
            self.settings.set_regs_on_init,
        );
        self.init_pointers();
        self.status = Status::Ready;
        self.error = None;
        self.exit_code = None;
        self.cycles = 0;
        self.stdout.clear();
        if let Some(coverage) = &mut self.coverage {
            coverage.clear();
        }
        self.caches.invalidate();
    }

    // ── Accessors ─────────────────────────────────────────────

    /// Current lifecycle status.
    pub const fn status(&self) -> Status {
        self.status
    }

    /// The fault that errored the machine, if any.
    pub const fn error(&self) -> Option<&SimulatorError> {
        self.error.as_ref()
    }

    /// Guest exit code, once halted.
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Retired instruction count.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The architectural state.
    pub const fn state(&self) -> &SimulatorState {
        &self.state
    }

    /// The loaded program.
    pub const fn program(&self) -> &LinkedProgram {
        &self.program
    }

    /// The bound cache hierarchy.
    pub const fn caches(&self) -> &CacheHierarchy {
        &self.caches
    }

    /// The bound cache hierarchy, for reconfiguration between runs.
    pub const fn caches_mut(&mut self) -> &mut CacheHierarchy {
        &mut self.caches
    }

    /// Replaces the cache hierarchy.
    pub fn set_caches(&mut self, caches: CacheHierarchy) {
        self.caches = caches;
    }

    /// Takes everything the guest printed since the last call.
    pub fn take_stdout(&mut self) -> String {
        mem::take(&mut self.stdout)
    }

    /// Starts or stops recording per-instruction execution counts.
    pub fn record_coverage(&mut self, enabled: bool) {
        self.coverage = if enabled {
            Some(Coverage::default())
        } else {
            None
        };
    }

    /// The recorded coverage, when enabled.
    pub const fn coverage(&self) -> Option<&Coverage> {
        self.coverage.as_ref()
    }

    // ── Fetch, decode, execute ────────────────────────────────

    fn exec_at(&mut self, pc: u64) -> Result<(), SimulatorError> {
        if pc % 4 != 0 {
            return Err(SimulatorError::Misaligned { addr: pc, size: 4 });
        }
        let word = self.state.load(pc, 4) as u32;
        let mcode = MachineCode::new(word);
        let inst = InstructionRegistry::global()
            .decode(mcode)
            .ok_or(SimulatorError::Decode { pc, word })?;
        trace!(pc, mnemonic = inst.name, "executing");
        self.execute(inst, mcode)
    }

    fn execute(&mut self, inst: &Instruction, mcode: MachineCode) -> Result<(), SimulatorError> {
        let rd = mcode.get(InstructionField::Rd);
        let rs1 = mcode.get(InstructionField::Rs1);
        let rs2 = mcode.get(InstructionField::Rs2);

        match inst.executor {
            Executor::Register(op) => {
                let a = self.state.read_reg(rs1);
                let b = self.state.read_reg(rs2);
                let value = self.int_op(inst.name, op, a, b)?;
                self.state.write_reg(rd, value);
                self.advance(mcode);
            }
            Executor::Immediate(op) => {
                let a = self.state.read_reg(rs1);
                let b = sext(mcode.imm_i());
                let value = self.int_op(inst.name, op, a, b)?;
                self.state.write_reg(rd, value);
                self.advance(mcode);
            }
            Executor::ShiftImmediate(op) => {
                let a = self.state.read_reg(rs1);
                let b = u64::from(mcode.get(InstructionField::Shamt));
                let value = self.int_op(inst.name, op, a, b)?;
                self.state.write_reg(rd, value);
                self.advance(mcode);
            }
            Executor::Load(kind) => {
                if matches!(kind, LoadKind::Double | LoadKind::WordUnsigned) {
                    self.require_w64(inst.name)?;
                }
                let addr = self.effective(self.state.read_reg(rs1), mcode.imm_i());
                let raw = self.data_load(addr, kind.size())?;
                let value = match kind {
                    LoadKind::Byte => sext(raw as u8 as i8 as i32),
                    LoadKind::Half => sext(raw as u16 as i16 as i32),
                    LoadKind::Word => sext(raw as u32 as i32),
                    LoadKind::Double => raw,
                    LoadKind::ByteUnsigned => u64::from(raw as u8),
                    LoadKind::HalfUnsigned => u64::from(raw as u16),
                    LoadKind::WordUnsigned => u64::from(raw as u32),
                };
                self.state.write_reg(rd, value);
                self.advance(mcode);
            }
            Executor::Store(kind) => {
                if kind.size() == 8 {
                    self.require_w64(inst.name)?;
                }
                let addr = self.effective(self.state.read_reg(rs1), mcode.imm_s());
                let value = self.state.read_reg(rs2);
                self.data_store(addr, kind.size(), value)?;
                self.advance(mcode);
            }
            Executor::Branch(cmp) => {
                let a = self.state.read_reg(rs1);
                let b = self.state.read_reg(rs2);
                if self.cmp_op(inst.name, cmp, a, b)? {
                    let target = self.state.pc().wrapping_add(sext(mcode.imm_b()));
                    self.state.set_pc(target);
                } else {
                    self.advance(mcode);
                }
            }
            Executor::Lui => {
                self.state.write_reg(rd, sext(mcode.imm_u()));
                self.advance(mcode);
            }
            Executor::Auipc => {
                let value = self.state.pc().wrapping_add(sext(mcode.imm_u()));
                self.state.write_reg(rd, value);
                self.advance(mcode);
            }
            Executor::Jal => {
                let pc = self.state.pc();
                self.state
                    .write_reg(rd, pc.wrapping_add(u64::from(mcode.length())));
                self.state.set_pc(pc.wrapping_add(sext(mcode.imm_j())));
            }
            Executor::Jalr => {
                let target = self
                    .state
                    .read_reg(rs1)
                    .wrapping_add(sext(mcode.imm_i()))
                    & !1;
                let link = self.state.pc().wrapping_add(u64::from(mcode.length()));
                self.state.write_reg(rd, link);
                self.state.set_pc(target);
            }
            Executor::Ecall => {
                self.ecall()?;
                self.advance(mcode);
            }
            Executor::Ebreak => {
                debug!(pc = self.state.pc(), "ebreak");
                self.advance(mcode);
            }
            Executor::Fence => self.advance(mcode),
            Executor::Amo { width, op } => {
                let addr = self.state.read_reg(rs1);
                let size = self.amo_align(inst.name, width, addr)?;
                let loaded = self.data_load(addr, size)?;
                let rhs = self.state.read_reg(rs2);
                let (stored, returned) = match width {
                    AmoWidth::Word => {
                        let f = op.rv32.ok_or_else(|| self.unsupported(inst.name))?;
                        (
                            u64::from(f(loaded as u32, rhs as u32)),
                            sext(loaded as u32 as i32),
                        )
                    }
                    AmoWidth::Double => {
                        let f = op.rv64.ok_or_else(|| self.unsupported(inst.name))?;
                        (f(loaded, rhs), loaded)
                    }
                };
                self.data_store(addr, size, stored)?;
                self.state.write_reg(rd, returned);
                self.advance(mcode);
            }
            Executor::LoadReserved(width) => {
                let addr = self.state.read_reg(rs1);
                let size = self.amo_align(inst.name, width, addr)?;
                let loaded = self.data_load(addr, size)?;
                let value = match width {
                    AmoWidth::Word => sext(loaded as u32 as i32),
                    AmoWidth::Double => loaded,
                };
                self.state.set_reservation(addr);
                self.state.write_reg(rd, value);
                self.advance(mcode);
            }
            Executor::StoreConditional(width) => {
                let addr = self.state.read_reg(rs1);
                let size = self.amo_align(inst.name, width, addr)?;
                if self.state.take_reservation(addr) {
                    let value = self.state.read_reg(rs2);
                    self.data_store(addr, size, value)?;
                    self.state.write_reg(rd, 0);
                } else {
                    self.state.write_reg(rd, 1);
                }
                self.advance(mcode);
            }
            Executor::FloatLoad => {
                let addr = self.effective(self.state.read_reg(rs1), mcode.imm_i());
                let bits = self.data_load(addr, 4)? as u32;
                self.state.write_fpr(rd, bits);
                self.advance(mcode);
            }
            Executor::FloatStore => {
                let addr = self.effective(self.state.read_reg(rs1), mcode.imm_s());
                let bits = u64::from(self.state.read_fpr(rs2));
                self.data_store(addr, 4, bits)?;
                self.advance(mcode);
            }
            Executor::FloatRegister(f) => {
                let value = f(self.state.read_fpr(rs1), self.state.read_fpr(rs2));
                self.state.write_fpr(rd, value);
                self.advance(mcode);
            }
            Executor::FloatUnary(f) => {
                self.state.write_fpr(rd, f(self.state.read_fpr(rs1)));
                self.advance(mcode);
            }
            Executor::FloatFma(f) => {
                let rs3 = mcode.get(InstructionField::Rs3);
                let value = f(
                    self.state.read_fpr(rs1),
                    self.state.read_fpr(rs2),
                    self.state.read_fpr(rs3),
                );
                self.state.write_fpr(rd, value);
                self.advance(mcode);
            }
            Executor::FloatCompare(f) => {
                let a = f32::from_bits(self.state.read_fpr(rs1));
                let b = f32::from_bits(self.state.read_fpr(rs2));
                self.state.write_reg(rd, u64::from(f(a, b)));
                self.advance(mcode);
            }
            Executor::FloatClass => {
                let value = f32::from_bits(self.state.read_fpr(rs1));
                self.state.write_reg(rd, u64::from(classify(value)));
                self.advance(mcode);
            }
            Executor::FloatMvToInt => {
                self.state
                    .write_reg(rd, sext(self.state.read_fpr(rs1) as i32));
                self.advance(mcode);
            }
            Executor::FloatMvFromInt => {
                self.state.write_fpr(rd, self.state.read_reg(rs1) as u32);
                self.advance(mcode);
            }
            Executor::FloatCvtToInt { signed } => {
                let value = f32::from_bits(self.state.read_fpr(rs1));
                let result = if signed {
                    let int = if value.is_nan() { i32::MAX } else { value as i32 };
                    sext(int)
                } else {
                    let int = if value.is_nan() { u32::MAX } else { value as u32 };
                    sext(int as i32)
                };
                self.state.write_reg(rd, result);
                self.advance(mcode);
            }
            Executor::FloatCvtFromInt { signed } => {
                let raw = self.state.read_reg(rs1) as u32;
                let value = if signed {
                    raw as i32 as f32
                } else {
                    raw as f32
                };
                self.state.write_fpr(rd, value.to_bits());
                self.advance(mcode);
            }
        }
        Ok(())
    }

    fn advance(&mut self, mcode: MachineCode) {
        let next = self.state.pc().wrapping_add(u64::from(mcode.length()));
        self.state.set_pc(next);
    }

    fn halt(&mut self, code: i32) {
        self.status = Status::Halted;
        self.exit_code = Some(code);
        debug!(code, cycles = self.cycles, "halted");
    }

    // ── Width dispatch ────────────────────────────────────────

    fn unsupported(&self, mnemonic: &'static str) -> SimulatorError {
        SimulatorError::UnsupportedWidth {
            mnemonic,
            width: self.settings.width,
        }
    }

    fn require_w64(&self, mnemonic: &'static str) -> Result<(), SimulatorError> {
        if self.settings.width == RegisterWidth::W64 {
            Ok(())
        } else {
            Err(self.unsupported(mnemonic))
        }
    }

    fn int_op(
        &self,
        mnemonic: &'static str,
        op: IntBinOp,
        a: u64,
        b: u64,
    ) -> Result<u64, SimulatorError> {
        match self.settings.width {
            RegisterWidth::W32 => op.rv32.map(|f| u64::from(f(a as u32, b as u32))),
            RegisterWidth::W64 => op.rv64.map(|f| f(a, b)),
            RegisterWidth::W16 | RegisterWidth::W128 => None,
        }
        .ok_or_else(|| self.unsupported(mnemonic))
    }

    fn cmp_op(
        &self,
        mnemonic: &'static str,
        cmp: CmpOp,
        a: u64,
        b: u64,
    ) -> Result<bool, SimulatorError> {
        match self.settings.width {
            RegisterWidth::W32 => cmp.rv32.map(|f| f(a as u32, b as u32)),
            RegisterWidth::W64 => cmp.rv64.map(|f| f(a, b)),
            RegisterWidth::W16 | RegisterWidth::W128 => None,
        }
        .ok_or_else(|| self.unsupported(mnemonic))
    }

    // ── Data memory ───────────────────────────────────────────

    fn effective(&self, base: u64, offset: i32) -> u64 {
        self.state.truncate(base.wrapping_add(sext(offset)))
    }

    /// Atomics are naturally aligned regardless of the alignment setting.
    fn amo_align(
        &self,
        mnemonic: &'static str,
        width: AmoWidth,
        addr: u64,
    ) -> Result<u32, SimulatorError> {
        if width == AmoWidth::Double {
            self.require_w64(mnemonic)?;
        }
        let size = width.size();
        if addr % u64::from(size) != 0 {
            return Err(SimulatorError::Misaligned { addr, size });
        }
        Ok(size)
    }

    fn check_access(&self, addr: u64, size: u32, store: bool) -> Result<(), SimulatorError> {
        if self.settings.aligned_addressing && size > 1 && addr % u64::from(size) != 0 {
            return Err(SimulatorError::Misaligned { addr, size });
        }
        if store && !self.settings.mutable_text && addr < self.text_end {
            return Err(SimulatorError::TextStore { addr });
        }
        if !self.settings.allow_access_btn_stack_heap {
            let sp = self.state.read_reg(reg::SP);
            if addr >= self.state.heap_end() && addr < sp {
                return Err(SimulatorError::AccessViolation { addr });
            }
        }
        Ok(())
    }

    fn data_load(&mut self, addr: u64, size: u32) -> Result<u64, SimulatorError> {
        self.check_access(addr, size, false)?;
        self.caches.access(addr);
        Ok(self.state.load(addr, size))
    }

    fn data_store(&mut self, addr: u64, size: u32, value: u64) -> Result<(), SimulatorError> {
        self.check_access(addr, size, true)?;
        self.caches.access(addr);
        self.state.store(addr, size, value);
        Ok(())
    }

    // ── Environment calls ─────────────────────────────────────

    fn ecall(&mut self) -> Result<(), SimulatorError> {
        let selector = self.state.read_reg(reg::A0);
        let arg = self.state.read_reg(reg::A1);
        match selector {
            1 => {
                let text = match self.settings.width {
                    RegisterWidth::W32 => (arg as u32 as i32).to_string(),
                    _ => (arg as i64).to_string(),
                };
                self.stdout.push_str(&text);
            }
            4 => self.print_string(arg),
            9 => {
                let bytes = arg as i64;
                if bytes < 0 {
                    return Err(SimulatorError::Ecall {
                        selector,
                        message: "cannot allocate a negative amount",
                    });
                }
                let old = self.state.sbrk(bytes.unsigned_abs());
                self.state.write_reg(reg::A0, old);
            }
            10 => self.halt(0),
            11 => self.stdout.push(char::from(arg as u8)),
            17 => self.halt(arg as u32 as i32),
            34 => {
                let text = match self.settings.width {
                    RegisterWidth::W32 => format!("{:#010x}", arg as u32),
                    _ => format!("{arg:#018x}"),
                };
                self.stdout.push_str(&text);
            }
            other => warn!(selector = other, "unknown environment call, ignored"),
        }
        Ok(())
    }

    /// Prints the NUL-terminated string at `addr`.
    ///
    /// A host service, not a guest memory access: it bypasses the cache
    /// model and the memory protection checks.
    fn print_string(&mut self, addr: u64) {
        let mut bytes = Vec::new();
        for offset in 0.. {
            let byte = self.state.load_byte(addr.wrapping_add(offset));
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        self.stdout.push_str(&String::from_utf8_lossy(&bytes));
    }
}

/// Sign-extends a 32-bit value into the 64-bit register domain.
const fn sext(value: i32) -> u64 {
    value as i64 as u64
}

/// The ten-bit `fclass.s` category mask.
fn classify(value: f32) -> u32 {
    use std::num::FpCategory;

    let bits = value.to_bits();
    let negative = bits >> 31 == 1;
    match value.classify() {
        FpCategory::Infinite if negative => 1 << 0,
        FpCategory::Normal if negative => 1 << 1,
        FpCategory::Subnormal if negative => 1 << 2,
        FpCategory::Zero if negative => 1 << 3,
        FpCategory::Zero => 1 << 4,
        FpCategory::Subnormal => 1 << 5,
        FpCategory::Normal => 1 << 6,
        FpCategory::Infinite => 1 << 7,
        FpCategory::Nan => {
            // Quiet NaNs carry the top mantissa bit.
            if bits & 0x0040_0000 == 0 { 1 << 8 } else { 1 << 9 }
        }
    }
}
