//! Response header interpretation.
//!
//! [`Interpreter::interpret`] walks an incoming [`HeaderSeries`] once and dispatches every
//! header, by name ignoring ASCII case, to a [`HeaderHandler`] looked up in a table. A handler
//! failure is reported to the [`WarningSink`] and the field it would have set stays at its
//! default; the remaining headers are still interpreted. Headers without a handler are kept
//! verbatim in [`Response::extension_headers`].
//!
//! New header families are supported by [registering](Interpreter::register) a handler, the
//! dispatch itself never changes.

mod request;

pub use request::interpret_request;

use std::collections::HashMap;
use std::time::SystemTime;

use http::Uri;
use once_cell::sync::Lazy;
use tracing::trace;

use crate::header::HeaderSeries;
use crate::header::names::{
    AGE, ALLOW, AUTHENTICATION_INFO, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_MD5,
    CONTENT_RANGE, CONTENT_TYPE, DATE, ETAG, EXPIRES, LAST_MODIFIED, LOCATION, PROXY_AUTHENTICATE, RETRY_AFTER, SERVER,
    SET_COOKIE, SET_COOKIE2, VARY, WARNING, WWW_AUTHENTICATE,
};
use crate::protocol::{ChallengeRequest, CodecError, Entity, Response, StatusLine};
use crate::sink::{CodecWarning, WarningSink};
use crate::value::cache_control::parse_cache_directives;
use crate::value::challenge::{parse_authentication_info, parse_challenge_request};
use crate::value::content::{parse_content_length, parse_content_type, parse_md5, parse_tokens};
use crate::value::cookie::parse_cookie_setting;
use crate::value::date::{parse_date, parse_retry_after, parse_seconds};
use crate::value::method::parse_methods;
use crate::value::range::parse_content_range;
use crate::value::tag::parse_tag;
use crate::value::vary::parse_dimensions;
use crate::value::warning::parse_warnings;

/// Applies one header value to the response.
///
/// Handlers also receive the whole series, for families whose meaning depends on other
/// headers of the same message.
pub type HeaderHandler = fn(value: &str, headers: &HeaderSeries, response: &mut Response) -> Result<(), CodecError>;

static DEFAULT_HANDLERS: Lazy<HashMap<String, HeaderHandler>> = Lazy::new(|| {
    let handlers: [(&str, HeaderHandler); 23] = [
        (LOCATION, location),
        (AGE, age),
        (DATE, date),
        (RETRY_AFTER, retry_after),
        (SET_COOKIE, set_cookie),
        (SET_COOKIE2, set_cookie),
        (WWW_AUTHENTICATE, www_authenticate),
        (PROXY_AUTHENTICATE, proxy_authenticate),
        (AUTHENTICATION_INFO, authentication_info),
        (SERVER, server),
        (ALLOW, allow),
        (VARY, vary),
        (WARNING, warning),
        (CACHE_CONTROL, cache_control),
        (CONTENT_TYPE, content_type),
        (CONTENT_ENCODING, content_encoding),
        (CONTENT_LANGUAGE, content_language),
        (CONTENT_LENGTH, content_length),
        (CONTENT_RANGE, content_range),
        (CONTENT_MD5, content_md5),
        (ETAG, etag),
        (LAST_MODIFIED, last_modified),
        (EXPIRES, expires),
    ];
    handlers.into_iter().map(|(name, handler)| (name.to_ascii_lowercase(), handler)).collect()
});

/// Fills [`Response`]s from status lines and header series.
///
/// The handler table is only read while interpreting, so one instance can be shared by any
/// number of concurrent calls.
#[derive(Clone)]
pub struct Interpreter {
    handlers: HashMap<String, HeaderHandler>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self { handlers: DEFAULT_HANDLERS.clone() }
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Interpreter").field("handlers", &names).finish()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `name`, replacing the current handler of that name if any.
    pub fn register(&mut self, name: &str, handler: HeaderHandler) {
        self.handlers.insert(name.to_ascii_lowercase(), handler);
    }

    pub fn handles(&self, name: &str) -> bool {
        self.handler(name).is_some()
    }

    fn handler(&self, name: &str) -> Option<HeaderHandler> {
        self.handlers.get(&name.to_ascii_lowercase()).copied()
    }

    /// Builds a response from `status_line` and `headers`.
    ///
    /// Never fails: every header that cannot be understood becomes a warning.
    pub fn interpret(&self, status_line: &StatusLine, headers: &HeaderSeries, sink: &mut dyn WarningSink) -> Response {
        let mut response = Response::default();
        self.interpret_into(status_line, headers, &mut response, sink);
        response
    }

    /// Resets `response` to `status_line` and applies `headers` to it.
    ///
    /// The status is in place before any handler runs, so a caller holding `response` still
    /// sees it if a handler panics.
    pub fn interpret_into(
        &self,
        status_line: &StatusLine,
        headers: &HeaderSeries,
        response: &mut Response,
        sink: &mut dyn WarningSink,
    ) {
        *response = Response::new(status_line.status());
        self.interpret_headers(headers, response, sink);
        trace!(status = %response.status, headers = headers.len(), "interpreted response headers");
    }

    /// Applies `headers` to an existing response.
    pub fn interpret_headers(&self, headers: &HeaderSeries, response: &mut Response, sink: &mut dyn WarningSink) {
        for header in headers {
            match self.handler(header.name()) {
                Some(handler) => {
                    if let Err(cause) = handler(header.value(), headers, response) {
                        sink.warn(CodecWarning::parse(header.name(), header.value(), cause));
                    }
                }
                None => response.extension_headers.add(header.name(), header.value()),
            }
        }
    }
}

fn entity(response: &mut Response) -> &mut Entity {
    response.entity.get_or_insert_with(Entity::new)
}

fn location(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.location = Some(value.trim().parse::<Uri>().map_err(|_| CodecError::invalid_reference(value))?);
    Ok(())
}

fn age(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.age = Some(parse_seconds(value)?);
    Ok(())
}

fn date(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.date = Some(parse_date(value)?);
    Ok(())
}

fn retry_after(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.retry_after = Some(parse_retry_after(value, SystemTime::now())?);
    Ok(())
}

fn set_cookie(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.cookie_settings.push(parse_cookie_setting(value)?);
    Ok(())
}

fn www_authenticate(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.challenge_requests.push(parse_challenge_request(value)?);
    Ok(())
}

fn proxy_authenticate(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.proxy_challenge_requests.push(parse_challenge_request(value)?);
    Ok(())
}

fn authentication_info(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.authentication_info = Some(parse_authentication_info(value)?);
    Ok(())
}

fn server(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.server_info.agent = Some(value.trim().to_string());
    Ok(())
}

fn allow(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.allowed_methods.extend(parse_methods(value)?);
    Ok(())
}

fn vary(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.dimensions.extend(parse_dimensions(value));
    Ok(())
}

fn warning(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.warnings.extend(parse_warnings(value)?);
    Ok(())
}

fn cache_control(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    response.cache_directives.extend(parse_cache_directives(value)?);
    Ok(())
}

fn content_type(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    let (media_type, character_set) = parse_content_type(value)?;
    let entity = entity(response);
    entity.media_type = Some(media_type);
    entity.character_set = character_set;
    Ok(())
}

fn content_encoding(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    let encodings = parse_tokens(value)?;
    entity(response).encodings.extend(encodings);
    Ok(())
}

fn content_language(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    let languages = parse_tokens(value)?;
    entity(response).languages.extend(languages);
    Ok(())
}

fn content_length(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    entity(response).size = Some(parse_content_length(value)?);
    Ok(())
}

fn content_range(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    let (range, _total) = parse_content_range(value)?;
    entity(response).range = Some(range);
    Ok(())
}

fn content_md5(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    entity(response).digest = Some(parse_md5(value)?);
    Ok(())
}

fn etag(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    entity(response).tag = Some(parse_tag(value)?);
    Ok(())
}

fn last_modified(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    entity(response).modification_date = Some(parse_date(value)?);
    Ok(())
}

fn expires(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
    entity(response).expiration_date = Some(parse_date(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use http::{Method, Version};
    use indoc::indoc;

    use super::*;
    use crate::protocol::{
        ByteRange, CacheDirective, ChallengeScheme, Dimension, Encoding, Status, Tag, Warning,
    };

    fn series(text: &str) -> HeaderSeries {
        text.lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .collect()
    }

    fn interpret(code: u16, text: &str) -> (Response, Vec<CodecWarning>) {
        let mut warnings: Vec<CodecWarning> = Vec::new();
        let status_line = StatusLine::new(Version::HTTP_11, code, None);
        let response = Interpreter::default().interpret(&status_line, &series(text), &mut warnings);
        (response, warnings)
    }

    #[test]
    fn general_headers() {
        let (response, warnings) = interpret(
            200,
            indoc! {r#"
                Date: Sun, 06 Nov 1994 08:49:37 GMT
                Age: 12
                Location: http://example.com/new
                Server: Apache/2.4.1
                Allow: GET, HEAD
                allow: PUT
                Warning: 110 cache "Response is stale"
                Cache-Control: private, max-age=60
                Set-Cookie: session=abc; Path=/; HttpOnly
                Set-Cookie2: theme="dark"; Version=1
            "#},
        );

        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(response.status, Status::SUCCESS_OK);
        assert_eq!(response.date, Some(UNIX_EPOCH + Duration::from_secs(784_111_777)));
        assert_eq!(response.age, Some(12));
        assert_eq!(response.location, Some(Uri::from_static("http://example.com/new")));
        assert_eq!(response.server_info.agent.as_deref(), Some("Apache/2.4.1"));
        assert_eq!(response.allowed_methods, [Method::GET, Method::HEAD, Method::PUT].into_iter().collect());
        assert_eq!(response.warnings, [Warning::new(110, "cache", "Response is stale")]);
        assert_eq!(response.cache_directives, [CacheDirective::Private(None), CacheDirective::MaxAge(60)]);

        assert_eq!(response.cookie_settings.len(), 2);
        assert_eq!(response.cookie_settings[0].path.as_deref(), Some("/"));
        assert!(response.cookie_settings[0].access_restricted);
        assert_eq!(response.cookie_settings[1].value, "dark");
        assert_eq!(response.cookie_settings[1].version, 1);
        assert!(response.entity.is_none());
    }

    #[test]
    fn vary_maps_to_dimensions() {
        let (response, _) = interpret(200, "Vary: Accept, User-Agent, *\n");
        assert_eq!(
            response.dimensions,
            [Dimension::MediaType, Dimension::ClientAgent, Dimension::Unspecified].into_iter().collect()
        );

        let (response, warnings) = interpret(200, "Vary: Cookie, Accept-Language\n");
        assert_eq!(response.dimensions, [Dimension::Language].into_iter().collect());
        assert!(warnings.is_empty());
    }

    #[test]
    fn retry_after_delta_is_relative_to_now() {
        let before = SystemTime::now();
        let (response, _) = interpret(503, "Retry-After: 120\n");
        let retry_after = response.retry_after.unwrap();

        let expected = before + Duration::from_secs(120);
        let drift = retry_after.duration_since(expected).unwrap_or_else(|e| e.duration());
        assert!(drift < Duration::from_secs(1), "drift {drift:?}");
    }

    #[test]
    fn retry_after_date() {
        let (response, _) = interpret(503, "Retry-After: Wed, 21 Oct 2015 07:28:00 GMT\n");
        assert_eq!(response.retry_after, Some(UNIX_EPOCH + Duration::from_secs(1_445_412_480)));
    }

    #[test]
    fn failures_are_isolated() {
        let (response, warnings) = interpret(
            200,
            indoc! {"
                Date: yesterday
                Age: -5
                ETag: unquoted
                Server: nginx
                Content-Length: 42
            "},
        );

        assert_eq!(response.date, None);
        assert_eq!(response.age, None);
        assert_eq!(response.server_info.agent.as_deref(), Some("nginx"));
        assert_eq!(response.entity.as_ref().and_then(|entity| entity.size), Some(42));
        assert_eq!(response.entity.as_ref().and_then(|entity| entity.tag.clone()), None);

        let failed: Vec<&str> = warnings.iter().map(CodecWarning::header).collect();
        assert_eq!(failed, ["Date", "Age", "ETag"]);
        assert!(matches!(&warnings[0], CodecWarning::Parse { value, .. } if value == "yesterday"));
    }

    #[test]
    fn entity_metadata() {
        let (response, warnings) = interpret(
            206,
            indoc! {r#"
                Content-Type: text/html; charset=ISO-8859-1
                Content-Encoding: gzip
                Content-Language: en, de
                Content-Length: 500
                Content-Range: bytes 0-499/1234
                Content-MD5: MDEyMzQ1Njc4OWFiY2RlZg==
                ETag: W/"v2"
                Last-Modified: Sun, 06 Nov 1994 08:49:37 GMT
                Expires: Wed, 21 Oct 2015 07:28:00 GMT
            "#},
        );
        assert!(warnings.is_empty(), "{warnings:?}");

        let entity = response.entity.unwrap();
        assert_eq!(entity.media_type.as_ref().map(|m| m.essence_str()), Some("text/html"));
        assert_eq!(entity.character_set.map(|charset| charset.name().to_ascii_lowercase()).as_deref(), Some("iso-8859-1"));
        assert_eq!(entity.encodings, [Encoding::new("gzip")]);
        assert_eq!(entity.languages.len(), 2);
        assert_eq!(entity.size, Some(500));
        assert_eq!(entity.range, Some(ByteRange::Span { first: 0, last: 499 }));
        assert_eq!(entity.digest.map(|digest| digest.value), Some(b"0123456789abcdef".to_vec()));
        assert_eq!(entity.tag, Some(Tag::weak("v2")));
        assert_eq!(entity.modification_date, Some(UNIX_EPOCH + Duration::from_secs(784_111_777)));
        assert_eq!(entity.expiration_date, Some(UNIX_EPOCH + Duration::from_secs(1_445_412_480)));
    }

    #[test]
    fn challenges_and_authentication_info() {
        let (response, warnings) = interpret(
            401,
            indoc! {r#"
                WWW-Authenticate: Basic realm="api"
                WWW-Authenticate: Bearer error="invalid_token"
                Proxy-Authenticate: Digest realm="proxy", nonce="abc"
                Authentication-Info: nextnonce="n2", qop=auth, nc=0000000a
            "#},
        );
        assert!(warnings.is_empty(), "{warnings:?}");

        assert_eq!(response.challenge_requests.len(), 2);
        assert_eq!(response.challenge_requests[0].scheme, ChallengeScheme::basic());
        assert_eq!(response.challenge_requests[0].realm.as_deref(), Some("api"));
        assert_eq!(response.challenge_requests[1].parameter("error"), Some("invalid_token"));
        assert_eq!(response.proxy_challenge_requests[0].parameter("nonce"), Some("abc"));

        let info = response.authentication_info.unwrap();
        assert_eq!(info.next_nonce.as_deref(), Some("n2"));
        assert_eq!(info.nonce_count, Some(10));
    }

    #[test]
    fn repeated_challenges_are_parsed_independently() {
        let (response, _) = interpret(401, "WWW-Authenticate: Basic realm=\"api\"\nWWW-Authenticate: basic charset=UTF-8\n");
        assert_eq!(response.challenge_requests.len(), 2);
        assert_eq!(response.challenge_requests[0].realm.as_deref(), Some("api"));
        assert_eq!(response.challenge_requests[1].realm, None);
        assert_eq!(response.challenge_requests[1].parameter("charset"), Some("UTF-8"));
    }

    #[test]
    fn unknown_headers_are_kept_verbatim() {
        let (response, _) = interpret(200, "X-Powered-By: PHP/8.2\nx-trace: a\nX-Trace: b\n");
        let kept: Vec<String> = response.extension_headers.iter().map(ToString::to_string).collect();
        assert_eq!(kept, ["X-Powered-By: PHP/8.2", "x-trace: a", "X-Trace: b"]);
    }

    #[test]
    fn registered_handlers_take_over() {
        fn powered_by(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), CodecError> {
            response.server_info.agent = Some(value.to_string());
            Ok(())
        }

        let mut interpreter = Interpreter::new();
        assert!(!interpreter.handles("x-powered-by"));
        interpreter.register("X-Powered-By", powered_by);
        assert!(interpreter.handles("x-powered-by"));

        let status_line = StatusLine::new(Version::HTTP_11, 200, Some("OK".into()));
        let response = interpreter.interpret(&status_line, &series("X-Powered-By: PHP/8.2\n"), &mut Vec::<CodecWarning>::new());
        assert_eq!(response.server_info.agent.as_deref(), Some("PHP/8.2"));
        assert!(response.extension_headers.is_empty());
    }
}
