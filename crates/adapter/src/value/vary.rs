//! `Vary` tokens mapped to [`Dimension`]s.

use std::collections::BTreeSet;

use crate::header::names;
use crate::protocol::Dimension;
use crate::value::reader::split_list;

/// Maps a `Vary` header to dimensions.
///
/// Unknown header names are ignored; the literal `*` maps to [`Dimension::Unspecified`].
pub fn parse_dimensions(value: &str) -> BTreeSet<Dimension> {
    split_list(value).into_iter().filter_map(dimension_of).collect()
}

fn dimension_of(token: &str) -> Option<Dimension> {
    const TABLE: &[(&str, Dimension)] = &[
        (names::ACCEPT, Dimension::MediaType),
        (names::ACCEPT_CHARSET, Dimension::CharacterSet),
        (names::ACCEPT_ENCODING, Dimension::Encoding),
        (names::ACCEPT_LANGUAGE, Dimension::Language),
        (names::AUTHORIZATION, Dimension::Authorization),
        (names::USER_AGENT, Dimension::ClientAgent),
        ("*", Dimension::Unspecified),
    ];
    TABLE.iter().find(|(name, _)| name.eq_ignore_ascii_case(token)).map(|(_, dimension)| *dimension)
}

/// Formats dimensions as header names; [`Dimension::Unspecified`] alone yields `*`.
pub fn format_dimensions(dimensions: &BTreeSet<Dimension>) -> Option<String> {
    if dimensions.contains(&Dimension::Unspecified) {
        return Some("*".to_string());
    }
    if dimensions.is_empty() {
        return None;
    }
    let header_names: Vec<&str> = dimensions
        .iter()
        .map(|dimension| match dimension {
            Dimension::MediaType => names::ACCEPT,
            Dimension::CharacterSet => names::ACCEPT_CHARSET,
            Dimension::Encoding => names::ACCEPT_ENCODING,
            Dimension::Language => names::ACCEPT_LANGUAGE,
            Dimension::Authorization => names::AUTHORIZATION,
            Dimension::ClientAgent | Dimension::Unspecified => names::USER_AGENT,
        })
        .collect();
    Some(header_names.join(", "))
}
