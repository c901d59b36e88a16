//! Instruction set unit tests.

/// Decoding and bit-field extraction across every encoding format.
pub mod decode_properties;

/// Assembly-to-text round trips through the disassembler.
pub mod disasm_round_trip;
