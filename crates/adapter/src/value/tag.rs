//! Entity tags for `If-Match`, `If-None-Match`, `If-Range` and `ETag`.

use crate::ensure;
use crate::protocol::{CodecError, Tag};
use crate::value::reader::split_list;

/// Formats one tag: `"opaque"`, `W/"opaque"` or `*`.
pub fn format_tag(tag: &Tag) -> String {
    if tag.is_all() {
        return "*".to_string();
    }
    let prefix = if tag.is_weak() { "W/" } else { "" };
    format!("{prefix}\"{}\"", tag.opaque())
}

/// Joins tags with `", "`, `None` when there are none so the header is left out.
pub fn format_tags(tags: &[Tag]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    Some(tags.iter().map(format_tag).collect::<Vec<_>>().join(", "))
}

/// Parses one entity tag.
///
/// Accepts `*`, strong `"opaque"` and weak `W/"opaque"` tags (the `W/` prefix in any case).
///
/// # Errors
///
/// Returns [`CodecError::InvalidTag`] when the opaque part is not quoted or contains a quote.
pub fn parse_tag(value: &str) -> Result<Tag, CodecError> {
    let value = value.trim();
    if value == "*" {
        return Ok(Tag::all());
    }

    let (weak, quoted) = match value.strip_prefix("W/").or_else(|| value.strip_prefix("w/")) {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    ensure!(quoted.len() >= 2 && quoted.starts_with('"') && quoted.ends_with('"'), CodecError::invalid_tag(value));

    let opaque = &quoted[1..quoted.len() - 1];
    ensure!(!opaque.contains('"'), CodecError::invalid_tag(value));
    Ok(if weak { Tag::weak(opaque) } else { Tag::strong(opaque) })
}

/// Parses a comma separated tag list, as found in `If-Match` and `If-None-Match`.
pub fn parse_tags(value: &str) -> Result<Vec<Tag>, CodecError> {
    split_list(value).into_iter().map(parse_tag).collect()
}
