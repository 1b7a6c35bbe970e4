//! `Range` and `Content-Range` in the `bytes` unit.

use crate::ensure;
use crate::protocol::{ByteRange, CodecError};
use crate::value::reader::split_list;

const BYTES_UNIT: &str = "bytes";

/// One range spec without its unit: `0-499`, `500-` or `-200`.
fn format_range(range: &ByteRange) -> String {
    match range {
        ByteRange::Span { first, last } => format!("{first}-{last}"),
        ByteRange::From(first) => format!("{first}-"),
        ByteRange::Suffix(length) => format!("-{length}"),
    }
}

/// Formats a `Range` header, `None` when there are no ranges.
pub fn format_ranges(ranges: &[ByteRange]) -> Option<String> {
    if ranges.is_empty() {
        return None;
    }
    Some(format!("{BYTES_UNIT}={}", ranges.iter().map(format_range).collect::<Vec<_>>().join(",")))
}

/// Parses a `Range` header such as `bytes=0-499,-200`.
///
/// # Errors
///
/// Returns [`CodecError::InvalidRange`] for units other than `bytes`, empty range sets and
/// spans whose first byte lies after the last.
pub fn parse_ranges(value: &str) -> Result<Vec<ByteRange>, CodecError> {
    let (unit, specs) = value.trim().split_once('=').ok_or_else(|| CodecError::invalid_range(value))?;
    ensure!(unit.trim().eq_ignore_ascii_case(BYTES_UNIT), CodecError::invalid_range(format!("unsupported unit {unit:?}")));
    let ranges = split_list(specs).into_iter().map(parse_range).collect::<Result<Vec<_>, _>>()?;
    ensure!(!ranges.is_empty(), CodecError::invalid_range(value));
    Ok(ranges)
}

fn parse_range(spec: &str) -> Result<ByteRange, CodecError> {
    let (first, last) = spec.split_once('-').ok_or_else(|| CodecError::invalid_range(spec))?;
    let number = |s: &str| s.trim().parse::<u64>().map_err(|_| CodecError::invalid_range(spec));

    match (first.trim(), last.trim()) {
        ("", "") => Err(CodecError::invalid_range(spec)),
        ("", length) => Ok(ByteRange::Suffix(number(length)?)),
        (first, "") => Ok(ByteRange::From(number(first)?)),
        (first, last) => {
            let (first, last) = (number(first)?, number(last)?);
            ensure!(first <= last, CodecError::invalid_range(spec));
            Ok(ByteRange::Span { first, last })
        }
    }
}

/// Formats `Content-Range` for a range of an entity of `size` bytes.
///
/// Open ended ranges can only be written when the size is known.
pub fn format_content_range(range: &ByteRange, size: Option<u64>) -> Result<String, CodecError> {
    let (first, last) = match (range, size) {
        (ByteRange::Span { first, last }, None) => (*first, *last),
        (range, Some(size)) => {
            range.resolve(size).ok_or_else(|| CodecError::invalid_range(format!("{range:?} outside of {size} bytes")))?
        }
        (range, None) => return Err(CodecError::invalid_range(format!("{range:?} needs the entity size"))),
    };
    let total = size.map_or_else(|| "*".to_string(), |size| size.to_string());
    Ok(format!("{BYTES_UNIT} {first}-{last}/{total}"))
}

/// Parses `Content-Range`, returning the range and the total size when given.
pub fn parse_content_range(value: &str) -> Result<(ByteRange, Option<u64>), CodecError> {
    let (unit, rest) = value.trim().split_once(' ').ok_or_else(|| CodecError::invalid_range(value))?;
    ensure!(unit.eq_ignore_ascii_case(BYTES_UNIT), CodecError::invalid_range(format!("unsupported unit {unit:?}")));

    let (span, total) = rest.trim().split_once('/').ok_or_else(|| CodecError::invalid_range(value))?;
    let total = match total.trim() {
        "*" => None,
        total => Some(total.parse::<u64>().map_err(|_| CodecError::invalid_range(value))?),
    };
    let range = parse_range(span)?;
    ensure!(matches!(range, ByteRange::Span { .. }), CodecError::invalid_range(value));
    if let (ByteRange::Span { last, .. }, Some(total)) = (range, total) {
        ensure!(last < total, CodecError::invalid_range(value));
    }
    Ok((range, total))
}
