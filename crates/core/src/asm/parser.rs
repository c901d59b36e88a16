//! Operand parsing: immediates, registers, memory operands, and string
//! literals.
//!
//! Errors are plain strings; the assembler wraps them with file and line
//! context before reporting.

use std::collections::HashMap;

use crate::isa::abi;

/// Parses an integer literal (decimal, `0x` hex, `0b` binary, optional
/// sign) or a name defined by `.equ`.
pub(crate) fn parse_immediate(text: &str, equs: &HashMap<String, i64>) -> Result<i64, String> {
    if let Some(&value) = equs.get(text) {
        return Ok(value);
    }
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2)
    } else {
        body.parse::<u64>()
    };
    let value = magnitude.map_err(|_| format!("invalid immediate '{text}'"))? as i64;
    Ok(if negative { value.wrapping_neg() } else { value })
}

/// Parses an integer register operand.
pub(crate) fn parse_int_register(text: &str) -> Result<u32, String> {
    abi::parse_int_register(text).ok_or_else(|| format!("unknown register '{text}'"))
}

/// Parses a floating-point register operand.
pub(crate) fn parse_float_register(text: &str) -> Result<u32, String> {
    abi::parse_float_register(text).ok_or_else(|| format!("unknown register '{text}'"))
}

/// Parses a memory operand: `offset(register)` or bare `(register)`.
pub(crate) fn parse_mem_operand(
    text: &str,
    equs: &HashMap<String, i64>,
) -> Result<(i64, u32), String> {
    let malformed = || format!("expected offset(register), got '{text}'");
    let open = text.find('(').ok_or_else(malformed)?;
    if !text.ends_with(')') {
        return Err(malformed());
    }
    let offset_text = &text[..open];
    let reg_text = &text[open + 1..text.len() - 1];
    let offset = if offset_text.is_empty() {
        0
    } else {
        parse_immediate(offset_text, equs)?
    };
    Ok((offset, parse_int_register(reg_text)?))
}

/// Parses a bare `(register)` operand (atomics).
pub(crate) fn parse_paren_register(text: &str) -> Result<u32, String> {
    text.strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| format!("expected (register), got '{text}'"))
        .and_then(parse_int_register)
}

/// Decodes a double-quoted string literal into bytes, honoring the usual
/// escapes. UTF-8 characters pass through encoded.
pub(crate) fn parse_string_literal(text: &str) -> Result<Vec<u8>, String> {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| format!("expected a quoted string, got '{text}'"))?;
    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let escape = chars.next().ok_or_else(|| "trailing backslash in string".to_owned())?;
        bytes.push(match escape {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            '0' => 0,
            '\\' => b'\\',
            '"' => b'"',
            '\'' => b'\'',
            other => return Err(format!("unknown escape '\\{other}'")),
        });
    }
    Ok(bytes)
}

/// Whether `name` is a well-formed label identifier.
pub(crate) fn valid_label(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
}

/// Range-checks a value that must fit in `bits` as either a signed or an
/// unsigned quantity, the usual assembler leniency for bit-pattern
/// immediates like `andi x1, x2, 0xfff`.
pub(crate) fn check_bits(value: i64, bits: u32, what: &str) -> Result<i32, String> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << bits) - 1;
    if (min..=max).contains(&value) {
        Ok(value as i32)
    } else {
        Err(format!("{what} {value} out of range [{min}, {max}]"))
    }
}

/// Range-checks an even pc-relative offset reaching `bits` bits of span.
pub(crate) fn check_offset(value: i64, bits: u32, what: &str) -> Result<i32, String> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if value % 2 != 0 {
        Err(format!("{what} {value} is not even"))
    } else if (min..=max).contains(&value) {
        Ok(value as i32)
    } else {
        Err(format!("{what} {value} out of range [{min}, {max}]"))
    }
}
