//! HTTP dates.
//!
//! Dates are written in the fixed-width IMF-fixdate form (RFC 1123), e.g.
//! `Sun, 06 Nov 1994 08:49:37 GMT`. Parsing accepts exactly three forms:
//!
//! - IMF-fixdate: `Sun, 06 Nov 1994 08:49:37 GMT`
//! - RFC 850: `Sunday, 06-Nov-94 08:49:37 GMT`
//! - ANSI C `asctime()`: `Sun Nov  6 08:49:37 1994`
//!
//! `Retry-After` additionally accepts delta-seconds, resolved against the moment of parsing.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::ensure;
use crate::protocol::CodecError;

/// First second of year 10000, which no HTTP date can express.
const MAX_HTTP_DATE_SECS: u64 = 253_402_300_800;

/// Formats `date` as IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// # Errors
///
/// Returns [`CodecError::InvalidDate`] for dates before the Unix epoch or after year 9999,
/// which the fixed-width form cannot express.
pub fn format_date(date: SystemTime) -> Result<String, CodecError> {
    let secs = date.duration_since(UNIX_EPOCH).map_err(|_| CodecError::invalid_date("date before 1970"))?.as_secs();
    ensure!(secs < MAX_HTTP_DATE_SECS, CodecError::invalid_date("date after year 9999"));
    Ok(httpdate::fmt_http_date(date))
}

/// Parses an HTTP date in any of the three accepted forms.
///
/// Surrounding whitespace is ignored. Delta-seconds are not accepted here, see
/// [`parse_retry_after`].
pub fn parse_date(value: &str) -> Result<SystemTime, CodecError> {
    httpdate::parse_http_date(value.trim()).map_err(|_| CodecError::invalid_date(value))
}

/// Parses a `Retry-After` value: an absolute date first, then a number of seconds after `now`.
pub fn parse_retry_after(value: &str, now: SystemTime) -> Result<SystemTime, CodecError> {
    if let Ok(date) = parse_date(value) {
        return Ok(date);
    }
    let secs = value.trim().parse::<u64>().map_err(|_| CodecError::invalid_date(value))?;
    now.checked_add(Duration::from_secs(secs)).ok_or_else(|| CodecError::invalid_date(value))
}

/// Parses delta-seconds, as used by `Age` and `max-age`.
pub fn parse_seconds(value: &str) -> Result<u64, CodecError> {
    value.trim().parse::<u64>().map_err(|_| CodecError::invalid_number(value))
}
