//! The two-pass assembler driver.

use std::collections::HashMap;
use std::mem;

use tracing::debug;

use super::lexer::{self, LineKind};
use super::parser;
use super::{DebugInfo, Program, RelocKind, Relocation, Segment, Symbol};
use crate::common::error::{AssemblerError, AssemblerReport};
use crate::isa::{InstructionField, InstructionRegistry, MachineCode, OperandPattern};

/// Assembles one source file into a relocatable [`Program`].
///
/// `name` is the file name used in symbols, debug info, and errors. All
/// problems in the file are collected and returned together.
///
/// # Errors
///
/// Returns every diagnostic found in the file, each carrying its line
/// number.
pub fn assemble(name: &str, source: &str) -> Result<Program, AssemblerReport> {
    Assembler::new(name).run(source)
}

/// One slot of the text segment after pass one. Every slot is four bytes.
#[derive(Debug)]
enum TextEntry {
    /// An instruction to encode in pass two.
    Inst {
        mnemonic: String,
        operands: Vec<String>,
        line: usize,
        source: String,
        reloc: Option<(RelocKind, String)>,
    },
    /// A raw word emitted by `.word` inside the text segment.
    Word { value: u32, line: usize, source: String },
}

/// A base instruction produced by pseudo expansion (or passed through).
struct ExpandedInst {
    mnemonic: String,
    operands: Vec<String>,
    reloc: Option<(RelocKind, String)>,
}

fn plain(mnemonic: &str, operands: Vec<String>) -> ExpandedInst {
    ExpandedInst {
        mnemonic: mnemonic.to_owned(),
        operands,
        reloc: None,
    }
}

/// Checks an operand list against the expected count.
fn args<'a, const N: usize>(
    operands: &'a [String],
    mnemonic: &str,
) -> Result<&'a [String; N], String> {
    operands
        .try_into()
        .map_err(|_| format!("'{mnemonic}' expects {N} operands, got {}", operands.len()))
}

/// Normalizes the alternate `.rl.aq` atomic suffix spelling.
fn canonical(mnemonic: &str) -> String {
    mnemonic
        .strip_suffix(".rl.aq")
        .map_or_else(|| mnemonic.to_owned(), |base| format!("{base}.aq.rl"))
}

struct Assembler {
    file: String,
    segment: Segment,
    entries: Vec<TextEntry>,
    data: Vec<u8>,
    symbols: HashMap<String, Symbol>,
    globals: HashMap<String, usize>,
    equs: HashMap<String, i64>,
    errors: Vec<AssemblerError>,
}

impl Assembler {
    fn new(name: &str) -> Self {
        Self {
            file: name.to_owned(),
            segment: Segment::Text,
            entries: Vec::new(),
            data: Vec::new(),
            symbols: HashMap::new(),
            globals: HashMap::new(),
            equs: HashMap::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self, source: &str) -> Result<Program, AssemblerReport> {
        // Pass one: bind labels, expand pseudos, collect data bytes.
        for line in lexer::lex(source) {
            self.define_labels(line.number, &line.labels);
            match line.kind {
                LineKind::Blank => {}
                LineKind::Directive { name, args } => self.directive(line.number, &name, &args),
                LineKind::Instruction { mnemonic, operands } => {
                    self.instruction(line.number, &line.source, &mnemonic, operands);
                }
            }
        }
        self.apply_globals();
        self.encode_all()
    }

    fn error(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(AssemblerError::new(self.file.clone(), line, message));
    }

    fn define_labels(&mut self, line: usize, labels: &[String]) {
        for label in labels {
            if !parser::valid_label(label) {
                self.error(line, format!("invalid label name '{label}'"));
                continue;
            }
            let symbol = Symbol {
                segment: self.segment,
                offset: match self.segment {
                    Segment::Text => self.entries.len() as u64 * 4,
                    Segment::Data => self.data.len() as u64,
                },
                global: false,
            };
            if self.symbols.insert(label.clone(), symbol).is_some() {
                self.error(line, format!("label '{label}' defined twice"));
            }
        }
    }

    // ── Directives ────────────────────────────────────────────

    fn directive(&mut self, line: usize, name: &str, directive_args: &[String]) {
        let result = match name {
            ".text" => {
                self.segment = Segment::Text;
                Ok(())
            }
            ".data" => {
                self.segment = Segment::Data;
                Ok(())
            }
            ".globl" | ".global" => self.globl(line, directive_args),
            ".word" => self.emit_words(line, directive_args),
            ".byte" => self.emit_ints(directive_args, 1, ".byte"),
            ".half" => self.emit_ints(directive_args, 2, ".half"),
            ".asciiz" | ".string" => self.emit_string(name, directive_args),
            ".space" | ".zero" => self.emit_space(name, directive_args),
            ".align" => self.align(directive_args),
            ".equ" => self.equ(directive_args),
            other => Err(format!("unknown directive '{other}'")),
        };
        if let Err(message) = result {
            self.error(line, message);
        }
    }

    fn globl(&mut self, line: usize, names: &[String]) -> Result<(), String> {
        if names.is_empty() {
            return Err("'.globl' expects at least one label".to_owned());
        }
        for name in names {
            if !parser::valid_label(name) {
                return Err(format!("invalid label name '{name}'"));
            }
            let _prev = self.globals.insert(name.clone(), line);
        }
        Ok(())
    }

    fn require_data(&self, directive: &str) -> Result<(), String> {
        if self.segment == Segment::Data {
            Ok(())
        } else {
            Err(format!("'{directive}' is only allowed in the data segment"))
        }
    }

    fn emit_words(&mut self, line: usize, values: &[String]) -> Result<(), String> {
        for text in values {
            let value = parser::parse_immediate(text, &self.equs)?;
            let word = parser::check_bits(value, 32, "word")? as u32;
            match self.segment {
                Segment::Text => self.entries.push(TextEntry::Word {
                    value: word,
                    line,
                    source: format!(".word {text}"),
                }),
                Segment::Data => self.data.extend_from_slice(&word.to_le_bytes()),
            }
        }
        Ok(())
    }

    fn emit_ints(&mut self, values: &[String], size: usize, directive: &str) -> Result<(), String> {
        self.require_data(directive)?;
        for text in values {
            let value = parser::parse_immediate(text, &self.equs)?;
            let checked = parser::check_bits(value, 8 * size as u32, directive)?;
            self.data.extend_from_slice(&checked.to_le_bytes()[..size]);
        }
        Ok(())
    }

    fn emit_string(&mut self, directive: &str, string_args: &[String]) -> Result<(), String> {
        self.require_data(directive)?;
        let [literal] = args::<1>(string_args, directive)?;
        self.data.extend_from_slice(&parser::parse_string_literal(literal)?);
        self.data.push(0);
        Ok(())
    }

    fn emit_space(&mut self, directive: &str, space_args: &[String]) -> Result<(), String> {
        self.require_data(directive)?;
        let [count] = args::<1>(space_args, directive)?;
        let count = parser::parse_immediate(count, &self.equs)?;
        if !(0..=0x100_0000).contains(&count) {
            return Err(format!("'{directive}' count {count} out of range"));
        }
        self.data.resize(self.data.len() + count as usize, 0);
        Ok(())
    }

    fn align(&mut self, align_args: &[String]) -> Result<(), String> {
        self.require_data(".align")?;
        let [power] = args::<1>(align_args, ".align")?;
        let power = parser::parse_immediate(power, &self.equs)?;
        if !(0..=12).contains(&power) {
            return Err(format!("'.align' power {power} out of range [0, 12]"));
        }
        let alignment = 1usize << power;
        let padded = self.data.len().div_ceil(alignment) * alignment;
        self.data.resize(padded, 0);
        Ok(())
    }

    fn equ(&mut self, equ_args: &[String]) -> Result<(), String> {
        let [name, value] = args::<2>(equ_args, ".equ")?;
        if !parser::valid_label(name) {
            return Err(format!("invalid name '{name}'"));
        }
        let value = parser::parse_immediate(value, &self.equs)?;
        let _prev = self.equs.insert(name.clone(), value);
        Ok(())
    }

    fn apply_globals(&mut self) {
        let requested: Vec<(String, usize)> = self.globals.drain().collect();
        for (name, line) in requested {
            match self.symbols.get_mut(&name) {
                Some(symbol) => symbol.global = true,
                None => self.error(line, format!("'.globl' of undefined label '{name}'")),
            }
        }
    }

    // ── Instructions and pseudo expansion ─────────────────────

    fn instruction(&mut self, line: usize, source: &str, mnemonic: &str, operands: Vec<String>) {
        if self.segment != Segment::Text {
            self.error(line, "instructions are only allowed in the text segment");
            return;
        }
        let mnemonic = canonical(mnemonic);
        match self.expand(&mnemonic, &operands) {
            Ok(expansion) => {
                for inst in expansion {
                    self.entries.push(TextEntry::Inst {
                        mnemonic: inst.mnemonic,
                        operands: inst.operands,
                        line,
                        source: source.to_owned(),
                        reloc: inst.reloc,
                    });
                }
            }
            Err(message) => self.error(line, message),
        }
    }

    /// Expands a pseudo instruction, or passes a base instruction through.
    fn expand(&self, mnemonic: &str, ops: &[String]) -> Result<Vec<ExpandedInst>, String> {
        Ok(match mnemonic {
            "nop" => {
                let _none = args::<0>(ops, mnemonic)?;
                vec![plain("addi", vec!["x0".into(), "x0".into(), "0".into()])]
            }
            "mv" => {
                let [rd, rs] = args::<2>(ops, mnemonic)?;
                vec![plain("addi", vec![rd.clone(), rs.clone(), "0".into()])]
            }
            "not" => {
                let [rd, rs] = args::<2>(ops, mnemonic)?;
                vec![plain("xori", vec![rd.clone(), rs.clone(), "-1".into()])]
            }
            "neg" => {
                let [rd, rs] = args::<2>(ops, mnemonic)?;
                vec![plain("sub", vec![rd.clone(), "x0".into(), rs.clone()])]
            }
            "seqz" => {
                let [rd, rs] = args::<2>(ops, mnemonic)?;
                vec![plain("sltiu", vec![rd.clone(), rs.clone(), "1".into()])]
            }
            "snez" => {
                let [rd, rs] = args::<2>(ops, mnemonic)?;
                vec![plain("sltu", vec![rd.clone(), "x0".into(), rs.clone()])]
            }
            "beqz" => {
                let [rs, target] = args::<2>(ops, mnemonic)?;
                vec![plain("beq", vec![rs.clone(), "x0".into(), target.clone()])]
            }
            "bnez" => {
                let [rs, target] = args::<2>(ops, mnemonic)?;
                vec![plain("bne", vec![rs.clone(), "x0".into(), target.clone()])]
            }
            "blez" => {
                let [rs, target] = args::<2>(ops, mnemonic)?;
                vec![plain("bge", vec!["x0".into(), rs.clone(), target.clone()])]
            }
            "bgez" => {
                let [rs, target] = args::<2>(ops, mnemonic)?;
                vec![plain("bge", vec![rs.clone(), "x0".into(), target.clone()])]
            }
            "bltz" => {
                let [rs, target] = args::<2>(ops, mnemonic)?;
                vec![plain("blt", vec![rs.clone(), "x0".into(), target.clone()])]
            }
            "bgtz" => {
                let [rs, target] = args::<2>(ops, mnemonic)?;
                vec![plain("blt", vec!["x0".into(), rs.clone(), target.clone()])]
            }
            "bgt" => {
                let [a, b, target] = args::<3>(ops, mnemonic)?;
                vec![plain("blt", vec![b.clone(), a.clone(), target.clone()])]
            }
            "ble" => {
                let [a, b, target] = args::<3>(ops, mnemonic)?;
                vec![plain("bge", vec![b.clone(), a.clone(), target.clone()])]
            }
            "bgtu" => {
                let [a, b, target] = args::<3>(ops, mnemonic)?;
                vec![plain("bltu", vec![b.clone(), a.clone(), target.clone()])]
            }
            "bleu" => {
                let [a, b, target] = args::<3>(ops, mnemonic)?;
                vec![plain("bgeu", vec![b.clone(), a.clone(), target.clone()])]
            }
            "j" => {
                let [target] = args::<1>(ops, mnemonic)?;
                vec![plain("jal", vec!["x0".into(), target.clone()])]
            }
            "jr" => {
                let [rs] = args::<1>(ops, mnemonic)?;
                vec![plain("jalr", vec!["x0".into(), rs.clone(), "0".into()])]
            }
            "ret" => {
                let _none = args::<0>(ops, mnemonic)?;
                vec![plain("jalr", vec!["x0".into(), "ra".into(), "0".into()])]
            }
            "call" => {
                let [target] = args::<1>(ops, mnemonic)?;
                vec![plain("jal", vec!["ra".into(), target.clone()])]
            }
            "li" => self.expand_li(ops)?,
            "la" => {
                let [rd, label] = args::<2>(ops, mnemonic)?;
                if !parser::valid_label(label) {
                    return Err(format!("'la' expects a label, got '{label}'"));
                }
                vec![
                    ExpandedInst {
                        mnemonic: "lui".to_owned(),
                        operands: vec![rd.clone(), "0".into()],
                        reloc: Some((RelocKind::Hi20, label.clone())),
                    },
                    ExpandedInst {
                        mnemonic: "addi".to_owned(),
                        operands: vec![rd.clone(), rd.clone(), "0".into()],
                        reloc: Some((RelocKind::Lo12I, label.clone())),
                    },
                ]
            }
            _ => vec![ExpandedInst {
                mnemonic: mnemonic.to_owned(),
                operands: ops.to_vec(),
                reloc: None,
            }],
        })
    }

    /// `li` is one `addi` when the value fits twelve signed bits, otherwise
    /// a `lui`/`addi` pair over the 32-bit range.
    fn expand_li(&self, ops: &[String]) -> Result<Vec<ExpandedInst>, String> {
        let [rd, imm_text] = args::<2>(ops, "li")?;
        let value = parser::parse_immediate(imm_text, &self.equs)?;
        if (-2048..=2047).contains(&value) {
            return Ok(vec![plain(
                "addi",
                vec![rd.clone(), "x0".into(), value.to_string()],
            )]);
        }
        if parser::check_bits(value, 32, "'li' immediate").is_err() {
            return Err(format!("'li' immediate {value} does not fit in 32 bits"));
        }
        let value = value as i32;
        let lo = value.wrapping_shl(20) >> 20;
        let hi = value.wrapping_sub(lo) >> 12;
        Ok(vec![
            plain("lui", vec![rd.clone(), hi.to_string()]),
            plain("addi", vec![rd.clone(), rd.clone(), lo.to_string()]),
        ])
    }

    // ── Pass two: encoding ────────────────────────────────────

    fn encode_all(mut self) -> Result<Program, AssemblerReport> {
        let registry = InstructionRegistry::global();
        let entries = mem::take(&mut self.entries);
        let mut insts = Vec::with_capacity(entries.len());
        let mut debug_info = Vec::with_capacity(entries.len());
        let mut relocations = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let (line, source) = match entry {
                TextEntry::Inst { line, source, .. } | TextEntry::Word { line, source, .. } => {
                    (*line, source.clone())
                }
            };
            match entry {
                TextEntry::Word { value, .. } => insts.push(MachineCode::new(*value)),
                TextEntry::Inst {
                    mnemonic,
                    operands,
                    reloc,
                    ..
                } => match self.encode(registry, mnemonic, operands, reloc.as_ref()) {
                    Ok((mcode, pending)) => {
                        insts.push(mcode);
                        if let Some((kind, label)) = pending {
                            relocations.push(Relocation {
                                kind,
                                inst_index: index,
                                label,
                                line,
                            });
                        }
                    }
                    Err(message) => {
                        self.error(line, message);
                        insts.push(MachineCode::new(0));
                    }
                },
            }
            debug_info.push(DebugInfo {
                file: self.file.clone(),
                line,
                source,
            });
        }

        if self.errors.is_empty() {
            debug!(
                file = %self.file,
                insts = insts.len(),
                data_bytes = self.data.len(),
                symbols = self.symbols.len(),
                "assembled"
            );
            Ok(Program {
                name: self.file,
                insts,
                debug: debug_info,
                data: self.data,
                symbols: self.symbols,
                relocations,
            })
        } else {
            // Pass-two errors land after pass-one ones; present them in
            // source order regardless.
            self.errors.sort_by_key(|error| error.line);
            Err(AssemblerReport { errors: self.errors })
        }
    }

    /// Encodes one base instruction. Returns the machine word plus a pending
    /// relocation when an operand is a label the linker must resolve.
    fn encode(
        &self,
        registry: &InstructionRegistry,
        mnemonic: &str,
        operands: &[String],
        reloc: Option<&(RelocKind, String)>,
    ) -> Result<(MachineCode, Option<(RelocKind, String)>), String> {
        let inst = registry
            .lookup(mnemonic)
            .ok_or_else(|| format!("unknown instruction '{mnemonic}'"))?;
        let mut mcode = inst.format.fill();
        let mut pending = None;

        match inst.pattern {
            OperandPattern::RdRs1Rs2 => {
                let [rd, rs1, rs2] = args::<3>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                mcode.set(InstructionField::Rs1, parser::parse_int_register(rs1)?);
                mcode.set(InstructionField::Rs2, parser::parse_int_register(rs2)?);
            }
            OperandPattern::RdRs1Imm => {
                let [rd, rs1, imm] = args::<3>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                mcode.set(InstructionField::Rs1, parser::parse_int_register(rs1)?);
                if let Some((kind, label)) = reloc {
                    pending = Some((*kind, label.clone()));
                } else {
                    let value = parser::parse_immediate(imm, &self.equs)?;
                    mcode.set_imm_i(parser::check_bits(value, 12, "immediate")?);
                }
            }
            OperandPattern::RdRs1Shamt => {
                let [rd, rs1, shamt] = args::<3>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                mcode.set(InstructionField::Rs1, parser::parse_int_register(rs1)?);
                let value = parser::parse_immediate(shamt, &self.equs)?;
                if !(0..=63).contains(&value) {
                    return Err(format!("shift amount {value} out of range [0, 63]"));
                }
                mcode.set(InstructionField::Shamt, value as u32);
            }
            OperandPattern::RdImm20 => {
                let [rd, imm] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                if let Some((kind, label)) = reloc {
                    pending = Some((*kind, label.clone()));
                } else {
                    let value = parser::parse_immediate(imm, &self.equs)?;
                    if !(-0x8_0000..=0xF_FFFF).contains(&value) {
                        return Err(format!("upper immediate {value} out of range"));
                    }
                    mcode.set_imm_u(value as i32);
                }
            }
            OperandPattern::RdMem => {
                let [rd, mem] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                let (offset, rs1) = parser::parse_mem_operand(mem, &self.equs)?;
                mcode.set(InstructionField::Rs1, rs1);
                mcode.set_imm_i(parser::check_bits(offset, 12, "offset")?);
            }
            OperandPattern::Rs2Mem => {
                let [rs2, mem] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rs2, parser::parse_int_register(rs2)?);
                let (offset, rs1) = parser::parse_mem_operand(mem, &self.equs)?;
                mcode.set(InstructionField::Rs1, rs1);
                mcode.set_imm_s(parser::check_bits(offset, 12, "offset")?);
            }
            OperandPattern::Rs1Rs2Label => {
                let [rs1, rs2, target] = args::<3>(operands, mnemonic)?;
                mcode.set(InstructionField::Rs1, parser::parse_int_register(rs1)?);
                mcode.set(InstructionField::Rs2, parser::parse_int_register(rs2)?);
                if let Ok(value) = parser::parse_immediate(target, &self.equs) {
                    mcode.set_imm_b(parser::check_offset(value, 13, "branch offset")?);
                } else if parser::valid_label(target) {
                    pending = Some((RelocKind::Branch, target.clone()));
                } else {
                    return Err(format!("expected a label or offset, got '{target}'"));
                }
            }
            OperandPattern::RdLabel => {
                let (rd, target) = match operands {
                    [target] => ("ra", target),
                    [rd, target] => (rd.as_str(), target),
                    _ => {
                        return Err(format!(
                            "'{mnemonic}' expects 1 or 2 operands, got {}",
                            operands.len()
                        ));
                    }
                };
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                if let Ok(value) = parser::parse_immediate(target, &self.equs) {
                    mcode.set_imm_j(parser::check_offset(value, 21, "jump offset")?);
                } else if parser::valid_label(target) {
                    pending = Some((RelocKind::Jal, target.clone()));
                } else {
                    return Err(format!("expected a label or offset, got '{target}'"));
                }
            }
            OperandPattern::Jalr => {
                let (rd, rs1, imm) = match operands {
                    [rs1] => ("ra".to_owned(), rs1.clone(), "0".to_owned()),
                    [rd, rs1] => (rd.clone(), rs1.clone(), "0".to_owned()),
                    [rd, rs1, imm] => (rd.clone(), rs1.clone(), imm.clone()),
                    _ => {
                        return Err(format!(
                            "'{mnemonic}' expects 1 to 3 operands, got {}",
                            operands.len()
                        ));
                    }
                };
                mcode.set(InstructionField::Rd, parser::parse_int_register(&rd)?);
                mcode.set(InstructionField::Rs1, parser::parse_int_register(&rs1)?);
                let value = parser::parse_immediate(&imm, &self.equs)?;
                mcode.set_imm_i(parser::check_bits(value, 12, "immediate")?);
            }
            OperandPattern::Bare => {
                if !operands.is_empty() {
                    return Err(format!("'{mnemonic}' takes no operands"));
                }
            }
            OperandPattern::AmoRegMem => {
                let [rd, rs2, mem] = args::<3>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                mcode.set(InstructionField::Rs2, parser::parse_int_register(rs2)?);
                mcode.set(InstructionField::Rs1, parser::parse_paren_register(mem)?);
            }
            OperandPattern::AmoLoad => {
                let [rd, mem] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                mcode.set(InstructionField::Rs1, parser::parse_paren_register(mem)?);
            }
            OperandPattern::FrdFrs1Frs2 => {
                let [frd, frs1, frs2] = args::<3>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_float_register(frd)?);
                mcode.set(InstructionField::Rs1, parser::parse_float_register(frs1)?);
                mcode.set(InstructionField::Rs2, parser::parse_float_register(frs2)?);
            }
            OperandPattern::FrdFrs1 => {
                let [frd, frs1] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_float_register(frd)?);
                mcode.set(InstructionField::Rs1, parser::parse_float_register(frs1)?);
            }
            OperandPattern::FrdFrs1Frs2Frs3 => {
                let [frd, frs1, frs2, frs3] = args::<4>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_float_register(frd)?);
                mcode.set(InstructionField::Rs1, parser::parse_float_register(frs1)?);
                mcode.set(InstructionField::Rs2, parser::parse_float_register(frs2)?);
                mcode.set(InstructionField::Rs3, parser::parse_float_register(frs3)?);
            }
            OperandPattern::RdFrs1Frs2 => {
                let [rd, frs1, frs2] = args::<3>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                mcode.set(InstructionField::Rs1, parser::parse_float_register(frs1)?);
                mcode.set(InstructionField::Rs2, parser::parse_float_register(frs2)?);
            }
            OperandPattern::RdFrs1 => {
                let [rd, frs1] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_int_register(rd)?);
                mcode.set(InstructionField::Rs1, parser::parse_float_register(frs1)?);
            }
            OperandPattern::FrdRs1 => {
                let [frd, rs1] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_float_register(frd)?);
                mcode.set(InstructionField::Rs1, parser::parse_int_register(rs1)?);
            }
            OperandPattern::FrdMem => {
                let [frd, mem] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rd, parser::parse_float_register(frd)?);
                let (offset, rs1) = parser::parse_mem_operand(mem, &self.equs)?;
                mcode.set(InstructionField::Rs1, rs1);
                mcode.set_imm_i(parser::check_bits(offset, 12, "offset")?);
            }
            OperandPattern::Frs2Mem => {
                let [frs2, mem] = args::<2>(operands, mnemonic)?;
                mcode.set(InstructionField::Rs2, parser::parse_float_register(frs2)?);
                let (offset, rs1) = parser::parse_mem_operand(mem, &self.equs)?;
                mcode.set(InstructionField::Rs1, rs1);
                mcode.set_imm_s(parser::check_bits(offset, 12, "offset")?);
            }
        }

        Ok((mcode, pending))
    }
}
