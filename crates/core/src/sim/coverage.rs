//! Per-instruction execution counts.
//!
//! When recording is enabled the engine notes every executed program counter.
//! The counts render either as plain text, one `<pc> <file>:<line> <count>`
//! line per executed instruction, or as a JSON object keyed by program
//! counter. Source locations come from the debug info the assembler attached
//! to each instruction.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use serde::Serialize;

use crate::common::segments::TEXT_BEGIN;
use crate::linker::LinkedProgram;

/// Execution counts by program counter.
#[derive(Debug, Clone, Default)]
pub struct Coverage {
    counts: HashMap<u64, u64>,
}

/// One rendered JSON entry.
#[derive(Debug, Serialize)]
struct JsonEntry {
    location: String,
    count: u64,
}

impl Coverage {
    pub(crate) fn note(&mut self, pc: u64) {
        *self.counts.entry(pc).or_insert(0) += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }

    /// The raw counts.
    pub const fn counts(&self) -> &HashMap<u64, u64> {
        &self.counts
    }

    /// Renders one line per executed instruction, sorted by address.
    pub fn render_text(&self, program: &LinkedProgram) -> String {
        let mut out = String::new();
        for (pc, count) in self.sorted() {
            let location = location(program, pc);
            let _ = writeln!(out, "{pc:#010x} {location} {count}");
        }
        out
    }

    /// Renders a JSON object keyed by program counter.
    ///
    /// # Errors
    ///
    /// Propagates serialization failures from `serde_json`.
    pub fn render_json(&self, program: &LinkedProgram) -> serde_json::Result<String> {
        let entries: BTreeMap<String, JsonEntry> = self
            .sorted()
            .into_iter()
            .map(|(pc, count)| {
                let entry = JsonEntry {
                    location: location(program, pc),
                    count,
                };
                (format!("{pc:#010x}"), entry)
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }

    fn sorted(&self) -> Vec<(u64, u64)> {
        let mut pairs: Vec<_> = self.counts.iter().map(|(&pc, &n)| (pc, n)).collect();
        pairs.sort_unstable();
        pairs
    }
}

/// `file:line` of the instruction at `pc`, or `?` off the text segment.
fn location(program: &LinkedProgram, pc: u64) -> String {
    let slot = usize::try_from((pc - TEXT_BEGIN) / 4).ok();
    slot.and_then(|index| program.debug.get(index))
        .map_or_else(|| "?".to_owned(), |info| format!("{}:{}", info.file, info.line))
}
