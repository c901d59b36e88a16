//! Memory segment layout of the simulated machine.
//!
//! The guest address space uses a fixed, flat layout: machine code at the
//! bottom, static data and the heap in the middle, and the stack growing down
//! from just under 2 GiB. The region between the heap break and the stack
//! pointer is unallocated; accesses there are rejected unless explicitly
//! permitted by the simulator settings.

/// Base address of the text segment (first instruction).
pub const TEXT_BEGIN: u64 = 0x0000_0000;

/// Base address of the static data segment.
pub const STATIC_BEGIN: u64 = 0x1000_0000;

/// Initial heap break. `sbrk` grows the heap upward from here.
pub const HEAP_BEGIN: u64 = 0x1000_8000;

/// Initial stack pointer. The stack grows downward from here.
pub const STACK_BEGIN: u64 = 0x7fff_fff0;

/// Initial global pointer, anchored at the top of the static segment.
pub const GLOBAL_POINTER: u64 = HEAP_BEGIN;
