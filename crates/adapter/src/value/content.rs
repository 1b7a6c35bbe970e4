//! Entity metadata headers: `Content-Type`, `Content-Encoding`, `Content-Language`,
//! `Content-Length` and `Content-MD5`.

use std::fmt::Display;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mime::Mime;

use crate::ensure;
use crate::protocol::{CharacterSet, CodecError, Digest};
use crate::value::reader::split_list;

/// Formats `Content-Type`, adding the character set as a `charset` parameter when the
/// media type does not carry one already.
pub fn format_content_type(media_type: &Mime, character_set: Option<&CharacterSet>) -> String {
    match character_set {
        Some(charset) if media_type.get_param(mime::CHARSET).is_none() => format!("{media_type}; charset={charset}"),
        _ => media_type.to_string(),
    }
}

/// Parses `Content-Type` into the media type and its `charset` parameter, if any.
///
/// The media type keeps all its parameters, `charset` included.
pub fn parse_content_type(value: &str) -> Result<(Mime, Option<CharacterSet>), CodecError> {
    let media_type = value.trim().parse::<Mime>().map_err(|e| CodecError::invalid_media_type(format!("{value} ({e})")))?;
    let charset = media_type.get_param(mime::CHARSET).map(|charset| CharacterSet::new(charset.as_str()));
    Ok((media_type, charset))
}

/// Joins metadata names with `", "`, `None` when empty.
pub fn format_tokens<T: Display>(tokens: &[T]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    Some(tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))
}

/// Parses a comma separated list of metadata names, e.g. `gzip, br` or `en, fr-CH`.
pub fn parse_tokens<T: FromStr<Err = CodecError>>(value: &str) -> Result<Vec<T>, CodecError> {
    split_list(value).into_iter().map(str::parse).collect()
}

/// Parses `Content-Length` as a non-negative byte count.
pub fn parse_content_length(value: &str) -> Result<u64, CodecError> {
    value.trim().parse::<u64>().map_err(|_| CodecError::invalid_number(value))
}

/// Formats `Content-MD5`, `None` for digests of other algorithms.
pub fn format_md5(digest: &Digest) -> Option<String> {
    digest.is_md5().then(|| STANDARD.encode(&digest.value))
}

/// Parses `Content-MD5`: the base64 form of a 16 byte digest.
///
/// # Errors
///
/// Returns [`CodecError::InvalidBase64`] when the value does not decode, or decodes to
/// anything but 16 bytes.
pub fn parse_md5(value: &str) -> Result<Digest, CodecError> {
    let bytes = STANDARD.decode(value.trim()).map_err(CodecError::invalid_base64)?;
    ensure!(bytes.len() == 16, CodecError::invalid_base64(format!("md5 digest of {} bytes", bytes.len())));
    Ok(Digest::md5(bytes))
}
