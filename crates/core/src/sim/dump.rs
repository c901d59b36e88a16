//! Core dumps: the complete architectural state as a serde document.
//!
//! A [`CoreDump`] captures everything needed to inspect a machine after the
//! fact: registers, program counter, cycle count, exit code, and every
//! nonzero byte of memory. Dumps serialize to JSON and deserialize back
//! without loss, so they work both as a debugging artifact and as a fixture
//! for comparing two runs.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::engine::Simulator;

/// A point-in-time snapshot of one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDump {
    /// Register width in bits.
    pub width: u32,
    /// Program counter at capture time.
    pub pc: u64,
    /// Retired instruction count.
    pub cycles: u64,
    /// Guest exit code, when the program has halted.
    pub exit_code: Option<i32>,
    /// Integer registers `x0`..`x31`.
    pub registers: Vec<u64>,
    /// Float registers `f0`..`f31`, raw 64-bit patterns.
    pub float_registers: Vec<u64>,
    /// Every nonzero byte of memory, keyed by address.
    pub memory: BTreeMap<u64, u8>,
}

impl CoreDump {
    /// Snapshots the simulator's architectural state.
    pub fn capture(sim: &Simulator) -> Self {
        let state = sim.state();
        Self {
            width: state.width().bits(),
            pc: state.pc(),
            cycles: sim.cycles(),
            exit_code: sim.exit_code(),
            registers: state.registers().to_vec(),
            float_registers: state.float_registers().to_vec(),
            memory: state.memory().iter().map(|(&addr, &byte)| (addr, byte)).collect(),
        }
    }

    /// Writes the dump as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails on file creation or serialization problems.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Reads a dump written by [`write_json`](Self::write_json).
    ///
    /// # Errors
    ///
    /// Fails on file access or parse problems.
    pub fn read_json(path: &Path) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
