//! The instruction registry: one table of every known instruction, indexed
//! by mnemonic for the assembler and by major opcode for decode.
//!
//! The table is built once, on first use, and verified at build time: no two
//! entries may claim overlapping encodings, so any decodable word maps to at
//! most one instruction. Holding that invariant here keeps both the
//! assembler and the decoder free of precedence rules.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use super::fields::InstructionField;
use super::instruction::Instruction;
use super::mcode::MachineCode;
use super::{base, ext_a, ext_f, ext_m};

static REGISTRY: LazyLock<InstructionRegistry> = LazyLock::new(InstructionRegistry::build);

/// The full instruction table with its lookup indexes.
#[derive(Debug)]
pub struct InstructionRegistry {
    instructions: Vec<Instruction>,
    by_name: HashMap<&'static str, usize>,
    by_opcode: HashMap<u32, Vec<usize>>,
}

impl InstructionRegistry {
    /// The process-wide registry.
    ///
    /// # Panics
    ///
    /// First access panics if the built-in table is malformed: a duplicated
    /// mnemonic or two instructions with non-disjoint encodings.
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    fn build() -> Self {
        let mut instructions = base::instructions();
        instructions.extend(ext_m::instructions());
        instructions.extend(ext_a::instructions());
        instructions.extend(ext_f::instructions());
        verify_disjoint(&instructions);

        let mut by_name = HashMap::with_capacity(instructions.len());
        let mut by_opcode: HashMap<u32, Vec<usize>> = HashMap::new();
        for (index, inst) in instructions.iter().enumerate() {
            assert!(
                by_name.insert(inst.name, index).is_none(),
                "mnemonic {} registered twice",
                inst.name
            );
            let opcode = inst.format.fill().get(InstructionField::Opcode);
            by_opcode.entry(opcode).or_default().push(index);
        }

        debug!(count = instructions.len(), "instruction registry built");
        Self { instructions, by_name, by_opcode }
    }

    /// Looks up an instruction by mnemonic.
    pub fn lookup(&self, name: &str) -> Option<&Instruction> {
        self.by_name.get(name).map(|&i| &self.instructions[i])
    }

    /// Finds the unique instruction matching a machine word, if any.
    pub fn decode(&self, mcode: MachineCode) -> Option<&Instruction> {
        let opcode = mcode.get(InstructionField::Opcode);
        self.by_opcode
            .get(&opcode)?
            .iter()
            .map(|&i| &self.instructions[i])
            .find(|inst| inst.format.matches(mcode))
    }

    /// Iterates over every registered instruction.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Number of registered instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the registry is empty. It never is after construction.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Asserts that no two instructions can match the same machine word.
fn verify_disjoint(instructions: &[Instruction]) {
    for (i, a) in instructions.iter().enumerate() {
        for b in &instructions[i + 1..] {
            assert!(
                !a.format.overlaps(&b.format),
                "encodings of {} and {} overlap",
                a.name,
                b.name
            );
        }
    }
}
