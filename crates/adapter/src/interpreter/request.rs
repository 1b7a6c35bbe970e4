//! Reads a composed header series back into a [`Request`], the server half of the codec.

use std::collections::HashMap;

use http::{Method, Uri};
use once_cell::sync::Lazy;

use crate::header::HeaderSeries;
use crate::header::names::{
    ACCEPT, ACCEPT_CHARSET, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION, CACHE_CONTROL, CONTENT_ENCODING,
    CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_MD5, CONTENT_RANGE, CONTENT_TYPE, COOKIE, DATE, FROM, HOST, IF_MATCH,
    IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, IF_UNMODIFIED_SINCE, PROXY_AUTHORIZATION, RANGE, REFERER, USER_AGENT,
    WARNING,
};
use crate::protocol::{CodecError, Entity, Request};
use crate::security::Authenticators;
use crate::sink::{CodecWarning, WarningSink};
use crate::value::cache_control::parse_cache_directives;
use crate::value::content::{parse_content_length, parse_content_type, parse_md5, parse_tokens};
use crate::value::cookie::parse_cookies;
use crate::value::date::parse_date;
use crate::value::preference::parse_preferences;
use crate::value::range::{parse_content_range, parse_ranges};
use crate::value::tag::{parse_tag, parse_tags};
use crate::value::warning::parse_warnings;

type RequestHandler = fn(&str, &mut Request) -> Result<(), CodecError>;

static REQUEST_HANDLERS: Lazy<HashMap<String, RequestHandler>> = Lazy::new(|| {
    let handlers: [(&str, RequestHandler); 26] = [
        (HOST, |_, _| Ok(())),
        (DATE, |value, request| {
            request.date = Some(parse_date(value)?);
            Ok(())
        }),
        (USER_AGENT, |value, request| {
            request.client_info.agent = Some(value.trim().to_string());
            Ok(())
        }),
        (FROM, |value, request| {
            request.client_info.from = Some(value.trim().to_string());
            Ok(())
        }),
        (IF_MATCH, |value, request| {
            request.conditions.match_tags.extend(parse_tags(value)?);
            Ok(())
        }),
        (IF_MODIFIED_SINCE, |value, request| {
            request.conditions.modified_since = Some(parse_date(value)?);
            Ok(())
        }),
        (IF_NONE_MATCH, |value, request| {
            request.conditions.none_match_tags.extend(parse_tags(value)?);
            Ok(())
        }),
        (IF_RANGE, if_range),
        (IF_UNMODIFIED_SINCE, |value, request| {
            request.conditions.unmodified_since = Some(parse_date(value)?);
            Ok(())
        }),
        (COOKIE, |value, request| {
            request.cookies.extend(parse_cookies(value)?);
            Ok(())
        }),
        (REFERER, |value, request| {
            request.referrer = Some(value.trim().parse::<Uri>().map_err(|_| CodecError::invalid_reference(value))?);
            Ok(())
        }),
        (ACCEPT, |value, request| {
            request.client_info.accepted_media_types.extend(parse_preferences(value)?);
            Ok(())
        }),
        (ACCEPT_CHARSET, |value, request| {
            request.client_info.accepted_character_sets.extend(parse_preferences(value)?);
            Ok(())
        }),
        (ACCEPT_ENCODING, |value, request| {
            request.client_info.accepted_encodings.extend(parse_preferences(value)?);
            Ok(())
        }),
        (ACCEPT_LANGUAGE, |value, request| {
            request.client_info.accepted_languages.extend(parse_preferences(value)?);
            Ok(())
        }),
        (RANGE, |value, request| {
            request.ranges.extend(parse_ranges(value)?);
            Ok(())
        }),
        (CONTENT_TYPE, |value, request| {
            let (media_type, character_set) = parse_content_type(value)?;
            let entity = entity(request);
            entity.media_type = Some(media_type);
            entity.character_set = character_set;
            Ok(())
        }),
        (CONTENT_ENCODING, |value, request| {
            let encodings = parse_tokens(value)?;
            entity(request).encodings.extend(encodings);
            Ok(())
        }),
        (CONTENT_LANGUAGE, |value, request| {
            let languages = parse_tokens(value)?;
            entity(request).languages.extend(languages);
            Ok(())
        }),
        (CONTENT_LENGTH, |value, request| {
            entity(request).size = Some(parse_content_length(value)?);
            Ok(())
        }),
        (CONTENT_RANGE, |value, request| {
            let (range, size) = parse_content_range(value)?;
            let entity = entity(request);
            entity.range = Some(range);
            entity.size = entity.size.or(size);
            Ok(())
        }),
        (CONTENT_MD5, |value, request| {
            entity(request).digest = Some(parse_md5(value)?);
            Ok(())
        }),
        (WARNING, |value, request| {
            request.warnings.extend(parse_warnings(value)?);
            Ok(())
        }),
        (CACHE_CONTROL, |value, request| {
            request.cache_directives.extend(parse_cache_directives(value)?);
            Ok(())
        }),
        (AUTHORIZATION, |value, request| {
            request.challenge_response = Some(AUTHENTICATORS.parse_credentials(value)?);
            Ok(())
        }),
        (PROXY_AUTHORIZATION, |value, request| {
            request.proxy_challenge_response = Some(AUTHENTICATORS.parse_credentials(value)?);
            Ok(())
        }),
    ];
    handlers.into_iter().map(|(name, handler)| (name.to_ascii_lowercase(), handler)).collect()
});

static AUTHENTICATORS: Lazy<Authenticators> = Lazy::new(Authenticators::default);

fn entity(request: &mut Request) -> &mut Entity {
    request.entity.get_or_insert_with(Entity::new)
}

/// `If-Range` holds either an entity tag or a date.
fn if_range(value: &str, request: &mut Request) -> Result<(), CodecError> {
    let value = value.trim();
    if value.starts_with('"') || value.starts_with("W/") {
        request.conditions.range_tag = Some(parse_tag(value)?);
    } else {
        request.conditions.range_date = Some(parse_date(value)?);
    }
    Ok(())
}

/// Reads `headers` of a request for `method` on `target`.
///
/// As with responses, a header that fails to parse is reported to `sink` and skipped, and
/// unknown headers end up in [`Request::extension_headers`]. The entity, when metadata is
/// present, carries no body.
pub fn interpret_request(method: Method, target: Uri, headers: &HeaderSeries, sink: &mut dyn WarningSink) -> Request {
    let mut request = Request::new(method, target);
    for header in headers {
        match REQUEST_HANDLERS.get(&header.name().to_ascii_lowercase()) {
            Some(handler) => {
                if let Err(cause) = handler(header.value(), &mut request) {
                    sink.warn(CodecWarning::parse(header.name(), header.value(), cause));
                }
            }
            None => request.extension_headers.add(header.name(), header.value()),
        }
    }
    request
}
