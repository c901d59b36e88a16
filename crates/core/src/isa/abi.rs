//! Register naming: the ABI mnemonics and their numeric forms.

/// ABI names of the integer registers, indexed by register number.
pub const INT_REGISTER_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// ABI names of the floating-point registers, indexed by register number.
pub const FLOAT_REGISTER_NAMES: [&str; 32] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7", "fs0", "fs1", "fa0", "fa1", "fa2",
    "fa3", "fa4", "fa5", "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9",
    "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

/// Register numbers the machine itself needs by role.
pub mod reg {
    /// Hard-wired zero.
    pub const ZERO: u32 = 0;
    /// Return address.
    pub const RA: u32 = 1;
    /// Stack pointer.
    pub const SP: u32 = 2;
    /// Global pointer.
    pub const GP: u32 = 3;
    /// First argument and result.
    pub const A0: u32 = 10;
    /// Second argument.
    pub const A1: u32 = 11;
}

/// Parses an integer register from `x<N>`, an ABI name, or `fp`.
pub fn parse_int_register(name: &str) -> Option<u32> {
    if name == "fp" {
        return Some(8);
    }
    if let Some(rest) = name.strip_prefix('x') {
        if let Ok(n) = rest.parse::<u32>() {
            return (n < 32).then_some(n);
        }
    }
    INT_REGISTER_NAMES
        .iter()
        .position(|&candidate| candidate == name)
        .map(|i| i as u32)
}

/// Parses a floating-point register from `f<N>` or an ABI name.
pub fn parse_float_register(name: &str) -> Option<u32> {
    if let Some(rest) = name.strip_prefix('f') {
        if let Ok(n) = rest.parse::<u32>() {
            return (n < 32).then_some(n);
        }
    }
    FLOAT_REGISTER_NAMES
        .iter()
        .position(|&candidate| candidate == name)
        .map(|i| i as u32)
}

/// ABI name of an integer register number.
pub fn int_register_name(index: u32) -> &'static str {
    INT_REGISTER_NAMES[(index as usize) % 32]
}

/// ABI name of a floating-point register number.
pub fn float_register_name(index: u32) -> &'static str {
    FLOAT_REGISTER_NAMES[(index as usize) % 32]
}
