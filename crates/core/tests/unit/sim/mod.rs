//! Whole-machine behavior, driven through assembled source.

/// Core dumps and coverage recording.
pub mod artifacts;
/// Settings-driven protection and lifecycle policies.
pub mod policies;
/// Straight-line, branching, calling, and environment-call programs.
pub mod programs;
/// 64-bit semantics and width dispatch failures.
pub mod width64;
