//! Line lexer: comment stripping, label extraction, and token splitting.
//!
//! Operands split on commas and whitespace, so `lw x1, 0(x2)` and
//! `lw x1 0(x2)` lex identically. Double-quoted strings are kept whole,
//! including separators and escaped quotes inside them.

use std::mem;

/// One lexed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    /// One-based line number.
    pub number: usize,
    /// Labels defined at the start of the line, in order.
    pub labels: Vec<String>,
    /// What the rest of the line holds.
    pub kind: LineKind,
    /// The raw line, trimmed, for debug info.
    pub source: String,
}

/// Classified content of a line after labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Nothing but labels, whitespace, or a comment.
    Blank,
    /// An assembler directive and its arguments.
    Directive { name: String, args: Vec<String> },
    /// An instruction mnemonic and its operand tokens.
    Instruction { mnemonic: String, operands: Vec<String> },
}

/// Lexes a whole source file.
pub(crate) fn lex(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .map(|(index, raw)| lex_line(index + 1, raw))
        .collect()
}

fn lex_line(number: usize, raw: &str) -> Line {
    let stripped = strip_comment(raw);
    let mut tokens = split_tokens(&stripped);

    let mut labels = Vec::new();
    while let Some(first) = tokens.first_mut() {
        let Some(colon) = first.find(':') else { break };
        // A quoted token is never a label.
        if first.starts_with('"') {
            break;
        }
        labels.push(first[..colon].to_owned());
        let rest = first[colon + 1..].to_owned();
        if rest.is_empty() {
            let _label_token = tokens.remove(0);
        } else {
            *first = rest;
        }
    }

    let kind = match tokens.split_first() {
        None => LineKind::Blank,
        Some((head, rest)) if head.starts_with('.') => LineKind::Directive {
            name: head.clone(),
            args: rest.to_vec(),
        },
        Some((head, rest)) => LineKind::Instruction {
            mnemonic: head.clone(),
            operands: rest.to_vec(),
        },
    };

    Line {
        number,
        labels,
        kind,
        source: raw.trim().to_owned(),
    }
}

/// Drops everything from the first `#` outside a string literal.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in line.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '#' => break,
            '"' => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Splits on commas and whitespace, keeping string literals intact.
fn split_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in input.chars() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                current.push(c);
            }
            ',' | ' ' | '\t' => {
                if !current.is_empty() {
                    tokens.push(mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
