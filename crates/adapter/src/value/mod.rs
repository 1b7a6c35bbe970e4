//! Header value codecs.
//!
//! Each header family has a formatter and a parser, pure functions with no shared state:
//!
//! - [`preference`]: quality weighted `Accept*` lists
//! - [`tag`]: entity tags and tag lists
//! - [`date`]: HTTP dates, `Retry-After` and delta-seconds
//! - [`cookie`]: `Cookie`, `Set-Cookie` and `Set-Cookie2`
//! - [`cache_control`]: `Cache-Control` directives
//! - [`warning`]: `Warning` entries
//! - [`vary`]: `Vary` tokens to dimensions
//! - [`method`]: `Allow` method lists
//! - [`range`]: `Range` and `Content-Range`
//! - [`content`]: `Content-Type`, encodings, languages, length and `Content-MD5`
//! - [`challenge`]: challenges, generic credentials and `Authentication-Info`
//!
//! Parsers return a [`CodecError`](crate::protocol::CodecError) for malformed input instead of
//! panicking; the caller decides whether that is worth a warning.

pub mod cache_control;
pub mod challenge;
pub mod content;
pub mod cookie;
pub mod date;
pub mod method;
pub mod preference;
pub mod range;
pub mod tag;
pub mod vary;
pub mod warning;

pub(crate) mod reader;
