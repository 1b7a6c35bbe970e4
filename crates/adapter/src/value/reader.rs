//! Tokenizing helpers shared by the value codecs.
//!
//! Header grammars are lists of elements separated by `,` or `;`, where separators inside a
//! quoted string do not count. All separators are ASCII, so splitting on their byte offsets
//! always lands on `char` boundaries.

use crate::ensure;
use crate::protocol::CodecError;

/// Splits `value` on every `separator` found outside a quoted string.
///
/// Elements are trimmed and empty ones dropped, so `"a, ,b,"` yields `["a", "b"]`.
pub(crate) fn split_unquoted<'a>(value: &'a str, separators: &[u8]) -> Vec<&'a str> {
    let bytes = value.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if quoted => escaped = true,
            b'"' => quoted = !quoted,
            b if !quoted && separators.contains(&b) => {
                push_trimmed(&mut parts, &value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_trimmed(&mut parts, &value[start..]);
    parts
}

fn push_trimmed<'a>(parts: &mut Vec<&'a str>, part: &'a str) {
    let part = part.trim();
    if !part.is_empty() {
        parts.push(part);
    }
}

/// Splits a comma separated list.
pub(crate) fn split_list(value: &str) -> Vec<&str> {
    split_unquoted(value, b",")
}

/// Splits a `;` separated parameter list.
pub(crate) fn split_params(value: &str) -> Vec<&str> {
    split_unquoted(value, b";")
}

/// Splits `name=value` on the first `=`, trimming both sides.
pub(crate) fn split_pair(pair: &str) -> (&str, Option<&str>) {
    match pair.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (pair.trim(), None),
    }
}

/// Checks whether `value` is a non-empty RFC 7230 token.
pub(crate) fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
        })
}

/// Wraps `value` in double quotes, escaping `"` and `\`.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Writes `value` as a token when possible, as a quoted string otherwise.
pub(crate) fn token_or_quoted(value: &str) -> String {
    if is_token(value) { value.to_string() } else { quote(value) }
}

/// Reads a quoted string at the start of `input`, returning its unescaped content and the rest.
pub(crate) fn read_quoted(input: &str) -> Result<(String, &str), CodecError> {
    let input = input.trim_start();
    ensure!(input.starts_with('"'), CodecError::invalid_token(format!("expected quoted string in {input:?}")));

    let mut content = String::new();
    let mut escaped = false;
    for (i, c) in input.char_indices().skip(1) {
        if escaped {
            content.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((content, &input[i + 1..]));
        } else {
            content.push(c);
        }
    }
    Err(CodecError::invalid_token(format!("unterminated quoted string in {input:?}")))
}

/// Removes surrounding quotes and escapes if present, returns the trimmed value otherwise.
pub(crate) fn unquote(value: &str) -> Result<String, CodecError> {
    let value = value.trim();
    if !value.starts_with('"') {
        return Ok(value.to_string());
    }
    let (content, rest) = read_quoted(value)?;
    ensure!(rest.trim().is_empty(), CodecError::invalid_token(format!("trailing characters after quoted string in {value:?}")));
    Ok(content)
}

/// Parses a list of `name=value` parameters separated by commas, unquoting the values.
pub(crate) fn parse_parameter_list(value: &str) -> Result<Vec<(String, String)>, CodecError> {
    split_list(value)
        .into_iter()
        .map(|pair| {
            let (name, value) = split_pair(pair);
            let value = value.map(unquote).transpose()?.unwrap_or_default();
            Ok((name.to_string(), value))
        })
        .collect()
}
