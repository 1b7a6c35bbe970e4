//! Wire header names, spelled the way they are emitted.

pub const ACCEPT: &str = "Accept";
pub const ACCEPT_CHARSET: &str = "Accept-Charset";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
pub const AGE: &str = "Age";
pub const ALLOW: &str = "Allow";
pub const AUTHENTICATION_INFO: &str = "Authentication-Info";
pub const AUTHORIZATION: &str = "Authorization";
pub const CACHE_CONTROL: &str = "Cache-Control";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_LANGUAGE: &str = "Content-Language";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_MD5: &str = "Content-MD5";
pub const CONTENT_RANGE: &str = "Content-Range";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const COOKIE: &str = "Cookie";
pub const DATE: &str = "Date";
pub const ETAG: &str = "ETag";
pub const EXPIRES: &str = "Expires";
pub const FROM: &str = "From";
pub const HOST: &str = "Host";
pub const IF_MATCH: &str = "If-Match";
pub const IF_MODIFIED_SINCE: &str = "If-Modified-Since";
pub const IF_NONE_MATCH: &str = "If-None-Match";
pub const IF_RANGE: &str = "If-Range";
pub const IF_UNMODIFIED_SINCE: &str = "If-Unmodified-Since";
pub const LAST_MODIFIED: &str = "Last-Modified";
pub const LOCATION: &str = "Location";
pub const PROXY_AUTHENTICATE: &str = "Proxy-Authenticate";
pub const PROXY_AUTHORIZATION: &str = "Proxy-Authorization";
pub const RANGE: &str = "Range";
pub const REFERER: &str = "Referer";
pub const RETRY_AFTER: &str = "Retry-After";
pub const SERVER: &str = "Server";
pub const SET_COOKIE: &str = "Set-Cookie";
pub const SET_COOKIE2: &str = "Set-Cookie2";
pub const USER_AGENT: &str = "User-Agent";
pub const VARY: &str = "Vary";
pub const WARNING: &str = "Warning";
pub const WWW_AUTHENTICATE: &str = "WWW-Authenticate";

/// Headers the request composer derives from typed request fields.
///
/// Caller supplied extension headers with one of these names are not forwarded.
pub const COMPOSED_REQUEST_HEADERS: &[&str] = &[
    HOST,
    DATE,
    USER_AGENT,
    FROM,
    IF_MATCH,
    IF_MODIFIED_SINCE,
    IF_NONE_MATCH,
    IF_RANGE,
    IF_UNMODIFIED_SINCE,
    COOKIE,
    REFERER,
    ACCEPT,
    ACCEPT_CHARSET,
    ACCEPT_ENCODING,
    ACCEPT_LANGUAGE,
    RANGE,
    CONTENT_TYPE,
    CONTENT_ENCODING,
    CONTENT_LANGUAGE,
    CONTENT_LENGTH,
    CONTENT_RANGE,
    CONTENT_MD5,
    WARNING,
    CACHE_CONTROL,
    AUTHORIZATION,
    PROXY_AUTHORIZATION,
];

/// Checks whether `name` is one of [`COMPOSED_REQUEST_HEADERS`], ignoring ASCII case.
pub fn is_composed_request_header(name: &str) -> bool {
    COMPOSED_REQUEST_HEADERS.iter().any(|known| known.eq_ignore_ascii_case(name))
}
