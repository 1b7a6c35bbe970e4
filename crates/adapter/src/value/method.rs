//! `Allow` method lists.

use http::Method;

use crate::protocol::CodecError;
use crate::value::reader::split_list;

/// Parses an `Allow` list. Extension methods are accepted as long as they are tokens.
pub fn parse_methods(value: &str) -> Result<Vec<Method>, CodecError> {
    split_list(value)
        .into_iter()
        .map(|token| Method::from_bytes(token.as_bytes()).map_err(|_| CodecError::invalid_token(format!("method {token:?}"))))
        .collect()
}

/// Formats methods sorted by name, `None` when there are none.
pub fn format_methods<'a>(methods: impl IntoIterator<Item = &'a Method>) -> Option<String> {
    let mut names: Vec<&str> = methods.into_iter().map(Method::as_str).collect();
    if names.is_empty() {
        return None;
    }
    names.sort_unstable();
    Some(names.join(", "))
}
