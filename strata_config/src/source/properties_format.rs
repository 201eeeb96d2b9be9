//! Reader for the `.properties` text format.
//!
//! Supports `#`/`!` comment lines, `=`, `:` or whitespace separators,
//! backslash line continuations and the `\t`, `\n`, `\r`, `\f` and `\uXXXX`
//! escapes. Any other escaped character stands for itself.

use std::borrow::Cow;

use crate::format::DecodeError;

/// Decode property-file bytes: UTF-8 when valid, ISO-8859-1 otherwise.
pub(crate) fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
    }
}

/// Parse `text` into key/value pairs in document order.
///
/// Duplicate keys are all returned; callers collapse them so the last one
/// wins.
pub(crate) fn parse_properties(text: &str) -> Result<Vec<(String, String)>, DecodeError> {
    let mut entries = Vec::new();
    let mut lines = physical_lines(text).into_iter().enumerate();
    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let first = raw.trim_start_matches(is_blank);
        if first.is_empty() || first.starts_with(['#', '!']) {
            continue;
        }
        let mut logical = first.to_owned();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }
        let (key, value) = split_entry(&logical);
        entries.push((unescape(key, line_no)?, unescape(value, line_no)?));
    }
    Ok(entries)
}

/// Split on `\r\n`, `\n` or a lone `\r`.
fn physical_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some(end) = rest.find(['\r', '\n']) else {
            lines.push(rest);
            break;
        };
        lines.push(rest.get(..end).unwrap_or_default());
        let tail = rest.get(end..).unwrap_or_default();
        let terminator = if tail.starts_with("\r\n") { 2 } else { 1 };
        rest = tail.get(terminator..).unwrap_or_default();
    }
    lines
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    !trailing.is_multiple_of(2)
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut value_start = line.len();
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            blank if is_blank(blank) => {
                key_end = i;
                let after = line.get(i..).unwrap_or("").trim_start_matches(is_blank);
                let offset = line.len() - after.len();
                value_start = if after.starts_with(['=', ':']) {
                    offset + 1
                } else {
                    offset
                };
                break;
            }
            _ => {}
        }
    }
    let key = line.get(..key_end).unwrap_or(line);
    let value = line
        .get(value_start..)
        .unwrap_or("")
        .trim_start_matches(is_blank);
    (key, value)
}

fn unescape(raw: &str, line: usize) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => out.push(unicode_escape(&mut chars, line)?),
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Decode the digits after `\u`, pairing UTF-16 surrogates.
fn unicode_escape(chars: &mut std::str::Chars<'_>, line: usize) -> Result<char, DecodeError> {
    let high = hex4(chars, line)?;
    let code = if (0xD800..=0xDBFF).contains(&high) {
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(malformed(line, "unpaired UTF-16 surrogate in \\u escape"));
        }
        let low = hex4(chars, line)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(malformed(line, "invalid low surrogate in \\u escape"));
        }
        0x1_0000 + ((high - 0xD800) << 10) + (low - 0xDC00)
    } else {
        high
    };
    char::from_u32(code).ok_or_else(|| malformed(line, "\\u escape is not a valid character"))
}

fn hex4(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u32, DecodeError> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.chars().count() != 4 {
        return Err(malformed(line, "truncated \\uXXXX escape"));
    }
    u32::from_str_radix(&digits, 16)
        .map_err(|_| malformed(line, format!("malformed \\uXXXX escape '\\u{digits}'")))
}

fn malformed(line: usize, message: impl Into<String>) -> DecodeError {
    DecodeError::new(message).on_line(line)
}
