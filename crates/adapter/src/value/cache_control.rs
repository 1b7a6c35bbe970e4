//! `Cache-Control` directives.

use crate::protocol::{CacheDirective, CodecError};
use crate::value::date::parse_seconds;
use crate::value::reader::{quote, split_list, split_pair, token_or_quoted, unquote};

/// Formats directives as one comma separated list; the same input always yields the same text.
pub fn format_cache_directives(directives: &[CacheDirective]) -> Option<String> {
    if directives.is_empty() {
        return None;
    }
    Some(directives.iter().map(format_cache_directive).collect::<Vec<_>>().join(", "))
}

fn format_cache_directive(directive: &CacheDirective) -> String {
    let name = directive.name();
    match directive {
        CacheDirective::NoCache(Some(fields)) | CacheDirective::Private(Some(fields)) => {
            format!("{name}={}", quote(fields))
        }
        CacheDirective::MaxAge(secs)
        | CacheDirective::MaxStale(Some(secs))
        | CacheDirective::MinFresh(secs)
        | CacheDirective::SharedMaxAge(secs) => format!("{name}={secs}"),
        CacheDirective::Extension(_, Some(value)) => format!("{name}={}", token_or_quoted(value)),
        _ => name.to_string(),
    }
}

/// Parses every directive of one `Cache-Control` header.
///
/// Directive names are matched ignoring ASCII case, quoted values are unquoted and unknown
/// directives are kept as [`CacheDirective::Extension`].
///
/// # Errors
///
/// Fails when a directive that takes seconds, such as `max-age`, has none or a malformed one.
pub fn parse_cache_directives(value: &str) -> Result<Vec<CacheDirective>, CodecError> {
    split_list(value).into_iter().map(parse_cache_directive).collect()
}

fn parse_cache_directive(element: &str) -> Result<CacheDirective, CodecError> {
    let (name, raw) = split_pair(element);
    let value = raw.map(unquote).transpose()?;
    let seconds = |value: Option<String>| -> Result<u64, CodecError> {
        value.as_deref().map_or_else(|| Err(CodecError::invalid_number(format!("{name} without value"))), parse_seconds)
    };

    let directive = match name.to_ascii_lowercase().as_str() {
        "no-cache" => CacheDirective::NoCache(value),
        "no-store" => CacheDirective::NoStore,
        "max-age" => CacheDirective::MaxAge(seconds(value)?),
        "max-stale" => CacheDirective::MaxStale(value.as_deref().map(parse_seconds).transpose()?),
        "min-fresh" => CacheDirective::MinFresh(seconds(value)?),
        "no-transform" => CacheDirective::NoTransform,
        "only-if-cached" => CacheDirective::OnlyIfCached,
        "public" => CacheDirective::Public,
        "private" => CacheDirective::Private(value),
        "must-revalidate" => CacheDirective::MustRevalidate,
        "proxy-revalidate" => CacheDirective::ProxyRevalidate,
        "s-maxage" => CacheDirective::SharedMaxAge(seconds(value)?),
        _ => CacheDirective::Extension(name.to_string(), value),
    };
    Ok(directive)
}
