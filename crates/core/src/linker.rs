//! The linker: relocatable [`Program`]s in, one executable image out.
//!
//! Linking places segments and resolves symbols in two passes:
//! 1. **Placement:** text segments are laid end to end from [`TEXT_BEGIN`]
//!    and data segments from [`STATIC_BEGIN`], each data segment padded to a
//!    word boundary, and every `.globl` symbol lands in one shared table.
//! 2. **Patching:** every relocation is resolved, the defining file's own
//!    symbols first and the global table second, and the resolved address is
//!    written back into the instruction's immediate field.
//!
//! Branches and jumps become pc-relative offsets and are range-checked here;
//! `la` pairs take the absolute address split across `lui`/`addi`.

use std::collections::HashMap;

use tracing::debug;

use crate::asm::{DebugInfo, Program, RelocKind, Segment, Symbol};
use crate::common::error::LinkError;
use crate::common::segments::{STATIC_BEGIN, TEXT_BEGIN};
use crate::isa::MachineCode;

/// An executable image: all input programs merged, every address resolved.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    /// All instructions in placement order, with relocations applied.
    /// Loaded at [`TEXT_BEGIN`].
    pub text: Vec<MachineCode>,
    /// The merged data image, loaded at [`STATIC_BEGIN`].
    pub data: Vec<u8>,
    /// Address of the first instruction to execute.
    pub entry: u64,
    /// Every global symbol, by absolute address.
    pub symbols: HashMap<String, u64>,
    /// Source positions, parallel to `text`.
    pub debug: Vec<DebugInfo>,
}

/// Where one program's segments landed in the merged image.
#[derive(Debug, Clone, Copy)]
struct Placement {
    text_base: u64,
    data_base: u64,
}

impl Placement {
    fn resolve(self, symbol: &Symbol) -> u64 {
        match symbol.segment {
            Segment::Text => self.text_base + symbol.offset,
            Segment::Data => self.data_base + symbol.offset,
        }
    }
}

/// Links assembled programs into one executable image.
///
/// Programs are placed in the order given. Execution starts at the global
/// `main` if any program defines one, otherwise at the first instruction of
/// the first program.
///
/// # Errors
///
/// Fails when two programs export the same global symbol, when a referenced
/// symbol is defined nowhere, or when a branch or jump target is out of reach
/// of the instruction's immediate field.
pub fn link(programs: &[Program]) -> Result<LinkedProgram, LinkError> {
    let mut placements = Vec::with_capacity(programs.len());
    let mut text: Vec<MachineCode> = Vec::new();
    let mut data: Vec<u8> = Vec::new();
    let mut debug_info = Vec::new();

    for program in programs {
        while data.len() % 4 != 0 {
            data.push(0);
        }
        placements.push(Placement {
            text_base: TEXT_BEGIN + text.len() as u64 * 4,
            data_base: STATIC_BEGIN + data.len() as u64,
        });
        text.extend(program.insts.iter().copied());
        data.extend_from_slice(&program.data);
        debug_info.extend(program.debug.iter().cloned());
    }

    let mut globals: HashMap<String, u64> = HashMap::new();
    for (program, placement) in programs.iter().zip(&placements) {
        for (name, symbol) in &program.symbols {
            if !symbol.global {
                continue;
            }
            if globals.insert(name.clone(), placement.resolve(symbol)).is_some() {
                return Err(LinkError::DuplicateSymbol(name.clone()));
            }
        }
    }

    for (program, placement) in programs.iter().zip(&placements) {
        for reloc in &program.relocations {
            let target = program
                .symbols
                .get(&reloc.label)
                .map(|symbol| placement.resolve(symbol))
                .or_else(|| globals.get(&reloc.label).copied())
                .ok_or_else(|| LinkError::UndefinedSymbol(reloc.label.clone()))?;
            let pc = placement.text_base + reloc.inst_index as u64 * 4;
            let slot = ((pc - TEXT_BEGIN) / 4) as usize;
            patch(&mut text[slot], reloc.kind, &reloc.label, pc, target)?;
        }
    }

    let entry = globals.get("main").copied().unwrap_or(TEXT_BEGIN);
    debug!(
        insts = text.len(),
        data_bytes = data.len(),
        globals = globals.len(),
        entry,
        "linked"
    );
    Ok(LinkedProgram {
        text,
        data,
        entry,
        symbols: globals,
        debug: debug_info,
    })
}

/// Writes one resolved target into the instruction at `pc`.
fn patch(
    mcode: &mut MachineCode,
    kind: RelocKind,
    label: &str,
    pc: u64,
    target: u64,
) -> Result<(), LinkError> {
    let out_of_range = |offset: i64| LinkError::TargetOutOfRange {
        label: label.to_owned(),
        addr: pc,
        offset,
    };
    match kind {
        RelocKind::Jal => {
            let offset = target as i64 - pc as i64;
            if !(-0x10_0000..=0xF_FFFF).contains(&offset) {
                return Err(out_of_range(offset));
            }
            mcode.set_imm_j(offset as i32);
        }
        RelocKind::Branch => {
            let offset = target as i64 - pc as i64;
            if !(-0x1000..=0xFFF).contains(&offset) {
                return Err(out_of_range(offset));
            }
            mcode.set_imm_b(offset as i32);
        }
        // The `lui` half rounds up when bit 11 of the address is set, so the
        // sign-extended `addi` half lands back on the exact address.
        RelocKind::Hi20 => {
            let upper = (target as i32).wrapping_add(0x800) >> 12;
            mcode.set_imm_u(upper);
        }
        RelocKind::Lo12I => {
            let lower = ((target as i32) << 20) >> 20;
            mcode.set_imm_i(lower);
        }
    }
    Ok(())
}
