//! `Accept`, `Accept-Charset`, `Accept-Encoding` and `Accept-Language` lists.
//!
//! Members are written in order and only carry a `;q=` suffix when their weight differs
//! from [`DEFAULT_QUALITY`]. Parsing keeps the input order, nothing is re-sorted by weight.

use crate::ensure;
use crate::protocol::{CodecError, DEFAULT_QUALITY, Preference, PreferenceValue};
use crate::value::reader::{split_list, split_pair, split_params};

/// Formats a preference list such as `text/html, application/json;q=0.8`.
///
/// Members keep their order. A `;q=` suffix is written only when the weight differs from
/// [`DEFAULT_QUALITY`], with at most three decimals.
///
/// # Errors
///
/// Returns [`CodecError::InvalidQuality`] if any weight lies outside `0.0..=1.0`.
pub fn format_preferences<M: PreferenceValue>(preferences: &[Preference<M>]) -> Result<String, CodecError> {
    let mut out = String::new();
    for (i, preference) in preferences.iter().enumerate() {
        ensure!(is_valid_quality(preference.quality), CodecError::invalid_quality(preference.quality));
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&preference.metadata.format_value());
        if (preference.quality - DEFAULT_QUALITY).abs() > f32::EPSILON {
            out.push_str(";q=");
            out.push_str(&format_quality(preference.quality));
        }
    }
    Ok(out)
}

/// Parses a preference list in input order.
///
/// Parameters other than `q` stay attached to the member, so `text/html;level=1;q=0.5`
/// yields the media type `text/html;level=1` weighted `0.5`.
///
/// # Errors
///
/// Fails on the first member whose value or weight cannot be parsed.
pub fn parse_preferences<M: PreferenceValue>(value: &str) -> Result<Vec<Preference<M>>, CodecError> {
    split_list(value).into_iter().map(parse_preference).collect()
}

fn parse_preference<M: PreferenceValue>(element: &str) -> Result<Preference<M>, CodecError> {
    let mut quality = DEFAULT_QUALITY;
    let mut metadata = Vec::new();

    for (i, param) in split_params(element).into_iter().enumerate() {
        match split_pair(param) {
            (name, Some(weight)) if i > 0 && name.eq_ignore_ascii_case("q") => {
                quality = parse_quality(weight)?;
            }
            _ => metadata.push(param),
        }
    }

    Ok(Preference { metadata: M::parse_value(&metadata.join(";"))?, quality })
}

/// Parses a `q` weight, rejecting anything outside `0.0..=1.0`.
fn parse_quality(value: &str) -> Result<f32, CodecError> {
    let quality = value.parse::<f32>().map_err(|_| CodecError::invalid_quality(value))?;
    ensure!(is_valid_quality(quality), CodecError::invalid_quality(value));
    Ok(quality)
}

fn is_valid_quality(quality: f32) -> bool {
    (0.0..=1.0).contains(&quality)
}

/// Writes a weight with at most three decimals and no trailing zeros.
fn format_quality(quality: f32) -> String {
    let formatted = format!("{quality:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
