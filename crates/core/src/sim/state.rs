//! Architectural state of the simulated machine.
//!
//! [`SimulatorState`] holds everything the guest program can observe: the
//! integer and floating-point register files, the program counter, the heap
//! break, the load reservation, and a sparse byte-addressable memory. The
//! engine owns one per run and mutates it through the accessors here; policy
//! checks (protected text, the heap/stack gap, alignment) live in the engine,
//! not in this module.

use std::collections::HashMap;

use crate::common::segments::{HEAP_BEGIN, STATIC_BEGIN, TEXT_BEGIN};
use crate::common::width::RegisterWidth;
use crate::linker::LinkedProgram;

/// Pattern written into every register when initialization is disabled, so a
/// read-before-write bug produces a recognizable garbage value instead of a
/// plausible zero.
pub const UNSET_PATTERN: u64 = 0xDEAD_BEEF_DEAD_BEEF;

/// Upper half of a NaN-boxed single-precision value.
const NAN_BOX: u64 = 0xFFFF_FFFF_0000_0000;

/// Register files, program counter, and memory of one guest machine.
#[derive(Debug, Clone)]
pub struct SimulatorState {
    width: RegisterWidth,
    regs: [u64; 32],
    fprs: [u64; 32],
    pc: u64,
    memory: HashMap<u64, u8>,
    heap_end: u64,
    reservation: Option<u64>,
}

impl SimulatorState {
    /// Builds the initial state for one run of `program`.
    ///
    /// The text image is written at [`TEXT_BEGIN`], the data image at
    /// [`STATIC_BEGIN`], and the program counter starts at the program's
    /// entry point. When `set_regs` is false every register starts at
    /// [`UNSET_PATTERN`] instead of zero; `x0` is always zero.
    pub fn new(program: &LinkedProgram, width: RegisterWidth, set_regs: bool) -> Self {
        let mut state = Self {
            width,
            regs: [0; 32],
            fprs: [0; 32],
            pc: program.entry,
            memory: HashMap::new(),
            heap_end: HEAP_BEGIN,
            reservation: None,
        };
        if !set_regs {
            let garbage = state.truncate(UNSET_PATTERN);
            state.regs = [garbage; 32];
            state.regs[0] = 0;
            state.fprs = [UNSET_PATTERN; 32];
        }
        for (slot, mcode) in program.text.iter().enumerate() {
            state.store(TEXT_BEGIN + slot as u64 * 4, 4, u64::from(mcode.word()));
        }
        for (offset, byte) in program.data.iter().enumerate() {
            state.store_byte(STATIC_BEGIN + offset as u64, *byte);
        }
        state
    }

    /// The configured register width.
    pub const fn width(&self) -> RegisterWidth {
        self.width
    }

    /// Truncates `value` to the machine's register width, zero-extending the
    /// result back to 64 bits.
    pub const fn truncate(&self, value: u64) -> u64 {
        match self.width {
            RegisterWidth::W32 => value as u32 as u64,
            _ => value,
        }
    }

    // ── Registers ─────────────────────────────────────────────

    /// Reads integer register `index`. `x0` is always zero.
    pub const fn read_reg(&self, index: u32) -> u64 {
        self.regs[index as usize % 32]
    }

    /// Writes integer register `index`, truncated to the machine width.
    /// Writes to `x0` are discarded.
    pub const fn write_reg(&mut self, index: u32, value: u64) {
        let index = index as usize % 32;
        if index != 0 {
            self.regs[index] = self.truncate(value);
        }
    }

    /// The full integer register file.
    pub const fn registers(&self) -> &[u64; 32] {
        &self.regs
    }

    /// Reads the single-precision bits of float register `index`.
    pub const fn read_fpr(&self, index: u32) -> u32 {
        self.fprs[index as usize % 32] as u32
    }

    /// Writes float register `index` with NaN-boxed single-precision bits.
    pub const fn write_fpr(&mut self, index: u32, bits: u32) {
        self.fprs[index as usize % 32] = NAN_BOX | bits as u64;
    }

    /// The full floating-point register file, raw 64-bit patterns.
    pub const fn float_registers(&self) -> &[u64; 32] {
        &self.fprs
    }

    // ── Program counter ───────────────────────────────────────

    /// The current program counter.
    pub const fn pc(&self) -> u64 {
        self.pc
    }

    /// Sets the program counter, truncated to the machine width.
    pub const fn set_pc(&mut self, pc: u64) {
        self.pc = self.truncate(pc);
    }

    // ── Memory ────────────────────────────────────────────────

    /// Reads one byte. Unwritten memory reads as zero.
    pub fn load_byte(&self, addr: u64) -> u8 {
        self.memory.get(&addr).copied().unwrap_or(0)
    }

    /// Writes one byte. Zero writes erase the entry so the map stays the
    /// exact set of nonzero bytes.
    pub fn store_byte(&mut self, addr: u64, value: u8) {
        if value == 0 {
            self.memory.remove(&addr);
        } else {
            self.memory.insert(addr, value);
        }
    }

    /// Reads `size` bytes little-endian, zero-extended into a `u64`.
    pub fn load(&self, addr: u64, size: u32) -> u64 {
        let mut value = 0u64;
        for offset in (0..u64::from(size)).rev() {
            value = (value << 8) | u64::from(self.load_byte(addr.wrapping_add(offset)));
        }
        value
    }

    /// Writes the low `size` bytes of `value` little-endian.
    pub fn store(&mut self, addr: u64, size: u32, value: u64) {
        for offset in 0..u64::from(size) {
            self.store_byte(addr.wrapping_add(offset), (value >> (offset * 8)) as u8);
        }
    }

    /// The set of nonzero bytes currently in memory.
    pub const fn memory(&self) -> &HashMap<u64, u8> {
        &self.memory
    }

    // ── Heap and reservation ──────────────────────────────────

    /// The current heap break.
    pub const fn heap_end(&self) -> u64 {
        self.heap_end
    }

    /// Grows the heap by `bytes` and returns the previous break.
    pub const fn sbrk(&mut self, bytes: u64) -> u64 {
        let old = self.heap_end;
        self.heap_end += bytes;
        old
    }

    /// Places a load reservation on `addr`, replacing any previous one.
    pub const fn set_reservation(&mut self, addr: u64) {
        self.reservation = Some(addr);
    }

    /// Consumes the reservation, reporting whether it covered `addr`.
    ///
    /// A store-conditional always clears the reservation, pass or fail.
    pub const fn take_reservation(&mut self, addr: u64) -> bool {
        let held = match self.reservation {
            Some(reserved) => reserved == addr,
            None => false,
        };
        self.reservation = None;
        held
    }
}
