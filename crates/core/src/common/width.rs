//! Guest register width selection.
//!
//! The simulated machine is parameterized over its register width at runtime.
//! All four standard RISC-V widths are representable so that width handling is
//! a checked code path rather than a compile-time assumption; the execution
//! engine currently carries implementations for 32 and 64 bits only, and
//! refuses the others with [`SimulatorError::UnsupportedWidth`].
//!
//! [`SimulatorError::UnsupportedWidth`]: super::error::SimulatorError::UnsupportedWidth

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the guest machine's integer registers, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RegisterWidth {
    /// 16-bit machine (RV16). Representable but not implemented.
    W16,
    /// 32-bit machine (RV32).
    W32,
    /// 64-bit machine (RV64).
    W64,
    /// 128-bit machine (RV128). Representable but not implemented.
    W128,
}

impl RegisterWidth {
    /// Width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
            Self::W128 => 128,
        }
    }

    /// Width in bytes.
    pub const fn bytes(self) -> u32 {
        self.bits() / 8
    }

    /// Whether the execution engine carries implementations for this width.
    pub const fn is_executable(self) -> bool {
        matches!(self, Self::W32 | Self::W64)
    }
}

impl Default for RegisterWidth {
    fn default() -> Self {
        Self::W32
    }
}

impl fmt::Display for RegisterWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// A register width that is not one of 16, 32, 64, or 128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid register width {0} (expected 16, 32, 64, or 128)")]
pub struct InvalidWidth(pub u32);

impl TryFrom<u32> for RegisterWidth {
    type Error = InvalidWidth;

    fn try_from(bits: u32) -> Result<Self, InvalidWidth> {
        match bits {
            16 => Ok(Self::W16),
            32 => Ok(Self::W32),
            64 => Ok(Self::W64),
            128 => Ok(Self::W128),
            other => Err(InvalidWidth(other)),
        }
    }
}

impl From<RegisterWidth> for u32 {
    fn from(width: RegisterWidth) -> u32 {
        width.bits()
    }
}
