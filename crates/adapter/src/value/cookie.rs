//! `Cookie`, `Set-Cookie` and `Set-Cookie2`.
//!
//! Version 0 (Netscape) cookies are written as plain `name=value` pairs. When any cookie
//! has a version above 0 the RFC 2109 form is used: a leading `$Version`, quoted values
//! and `$Path` / `$Domain` attributes.

use std::time::{Duration, SystemTime};

use crate::ensure;
use crate::protocol::{CodecError, Cookie, CookieSetting};
use crate::value::date::{format_date, parse_date};
use crate::value::reader::{is_token, quote, split_pair, split_params, split_unquoted, token_or_quoted, unquote};

/// Formats the `Cookie` header, `None` when there are no cookies.
pub fn format_cookies(cookies: &[Cookie]) -> Result<Option<String>, CodecError> {
    if cookies.is_empty() {
        return Ok(None);
    }
    let version = cookies.iter().map(|c| c.version).max().unwrap_or_default();

    let mut parts = Vec::with_capacity(cookies.len() + 1);
    if version > 0 {
        parts.push(format!("$Version=\"{version}\""));
    }
    for cookie in cookies {
        ensure!(is_token(&cookie.name), CodecError::invalid_cookie(format!("invalid cookie name {:?}", cookie.name)));
        ensure!(!cookie.name.starts_with('$'), CodecError::invalid_cookie(format!("reserved cookie name {:?}", cookie.name)));
        if version > 0 {
            let mut part = format!("{}={}", cookie.name, quote(&cookie.value));
            if let Some(path) = &cookie.path {
                part.push_str(&format!("; $Path={}", quote(path)));
            }
            if let Some(domain) = &cookie.domain {
                part.push_str(&format!("; $Domain={}", quote(domain)));
            }
            parts.push(part);
        } else {
            parts.push(format!("{}={}", cookie.name, format_plain_value(&cookie.value)));
        }
    }
    Ok(Some(parts.join("; ")))
}

fn format_plain_value(value: &str) -> String {
    if value.is_empty() { String::new() } else { token_or_quoted(value) }
}

/// Parses a `Cookie` header, accepting both `;` and `,` as pair separators.
pub fn parse_cookies(value: &str) -> Result<Vec<Cookie>, CodecError> {
    let mut cookies: Vec<Cookie> = Vec::new();
    let mut version = 0;

    for pair in split_unquoted(value, b";,") {
        let (name, raw) = split_pair(pair);
        let raw = raw.ok_or_else(|| CodecError::invalid_cookie(format!("missing value in {pair:?}")))?;
        let cookie_value = unquote(raw)?;

        if name.eq_ignore_ascii_case("$Version") {
            version = cookie_value.parse().map_err(|_| CodecError::invalid_cookie(format!("invalid version {cookie_value:?}")))?;
        } else if name.eq_ignore_ascii_case("$Path") {
            last_cookie(&mut cookies, pair)?.path = Some(cookie_value);
        } else if name.eq_ignore_ascii_case("$Domain") {
            last_cookie(&mut cookies, pair)?.domain = Some(cookie_value);
        } else {
            ensure!(!name.is_empty(), CodecError::invalid_cookie(format!("missing name in {pair:?}")));
            cookies.push(Cookie { version, name: name.to_string(), value: cookie_value, path: None, domain: None });
        }
    }
    Ok(cookies)
}

/// The cookie a `$Path` or `$Domain` attribute belongs to.
fn last_cookie<'a>(cookies: &'a mut [Cookie], pair: &str) -> Result<&'a mut Cookie, CodecError> {
    cookies.last_mut().ok_or_else(|| CodecError::invalid_cookie(format!("attribute {pair:?} before any cookie")))
}

/// Parses one `Set-Cookie` or `Set-Cookie2` header value.
///
/// `Expires` is kept as an absolute date next to `Max-Age`; neither is derived from the other.
pub fn parse_cookie_setting(value: &str) -> Result<CookieSetting, CodecError> {
    let mut params = split_params(value).into_iter();
    let first = params.next().ok_or_else(|| CodecError::invalid_cookie("empty cookie setting"))?;
    let (name, raw) = split_pair(first);
    let raw = raw.ok_or_else(|| CodecError::invalid_cookie(format!("missing value in {first:?}")))?;
    ensure!(!name.is_empty(), CodecError::invalid_cookie(format!("missing name in {first:?}")));

    let mut setting = CookieSetting::new(name, unquote(raw)?);
    for param in params {
        let (attribute, raw) = split_pair(param);
        let attribute_value = raw.map(unquote).transpose()?;
        match (attribute.to_ascii_lowercase().as_str(), attribute_value) {
            ("secure", _) => setting.secure = true,
            ("httponly", _) => setting.access_restricted = true,
            ("path", Some(path)) => setting.path = Some(path),
            ("domain", Some(domain)) => setting.domain = Some(domain),
            ("comment", Some(comment)) => setting.comment = Some(comment),
            ("max-age", Some(max_age)) => {
                setting.max_age = Some(max_age.parse().map_err(|_| CodecError::invalid_number(&max_age))?);
            }
            ("expires", Some(expires)) => setting.expires = Some(parse_date(&expires)?),
            ("version", Some(version)) => {
                setting.version = version.parse().map_err(|_| CodecError::invalid_number(&version))?;
            }
            // unknown attributes, and known ones missing their value, are skipped
            _ => {}
        }
    }
    Ok(setting)
}

/// Formats a `Set-Cookie` header value.
pub fn format_cookie_setting(setting: &CookieSetting) -> Result<String, CodecError> {
    ensure!(is_token(&setting.name), CodecError::invalid_cookie(format!("invalid cookie name {:?}", setting.name)));

    let mut out = if setting.version > 0 {
        format!("{}={}; Version={}", setting.name, quote(&setting.value), setting.version)
    } else {
        format!("{}={}", setting.name, format_plain_value(&setting.value))
    };
    if let Some(path) = &setting.path {
        out.push_str(&format!("; Path={}", token_or_path(path)));
    }
    if let Some(domain) = &setting.domain {
        out.push_str(&format!("; Domain={domain}"));
    }
    if let Some(comment) = &setting.comment {
        out.push_str(&format!("; Comment={}", quote(comment)));
    }
    if let Some(max_age) = setting.max_age {
        out.push_str(&format!("; Max-Age={max_age}"));
    }
    if let Some(expires) = setting.expires {
        out.push_str(&format!("; Expires={}", format_date(expires)?));
    }
    if setting.secure {
        out.push_str("; Secure");
    }
    if setting.access_restricted {
        out.push_str("; HttpOnly");
    }
    Ok(out)
}

fn token_or_path(path: &str) -> String {
    if path.bytes().all(|b| b.is_ascii_graphic() && b != b';' && b != b'"') { path.to_string() } else { quote(path) }
}

/// Lifetime left to a cookie setting at `now`, `None` for session cookies.
pub fn remaining_lifetime(setting: &CookieSetting, now: SystemTime) -> Option<Duration> {
    match (setting.max_age, setting.expires) {
        (Some(max_age), _) => Some(Duration::from_secs(u64::try_from(max_age).unwrap_or_default())),
        (None, Some(expires)) => Some(expires.duration_since(now).unwrap_or_default()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn format_netscape_cookies() {
        let cookies = vec![Cookie::new("session", "abc123"), Cookie::new("theme", "dark blue")];
        assert_eq!(format_cookies(&cookies).unwrap().as_deref(), Some(r#"session=abc123; theme="dark blue""#));
        assert_eq!(format_cookies(&[]).unwrap(), None);
    }

    #[test]
    fn format_versioned_cookies() {
        let cookie = Cookie { version: 1, path: Some("/acme".into()), ..Cookie::new("Customer", "WILE_E_COYOTE") };
        assert_eq!(
            format_cookies(&[cookie]).unwrap().as_deref(),
            Some(r#"$Version="1"; Customer="WILE_E_COYOTE"; $Path="/acme""#)
        );
    }

    #[test]
    fn parse_versioned_cookies() {
        let cookies =
            parse_cookies(r#"$Version="1"; Customer="WILE_E_COYOTE"; $Path="/acme"; Part_Number="Rocket_0001"; $Path="/acme""#)
                .unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], Cookie { version: 1, path: Some("/acme".into()), ..Cookie::new("Customer", "WILE_E_COYOTE") });
        assert_eq!(cookies[1].name, "Part_Number");
        assert_eq!(cookies[1].value, "Rocket_0001");
    }

    #[test]
    fn parse_plain_cookies() {
        let cookies = parse_cookies(r#"session=abc123; theme="dark; blue""#).unwrap();
        assert_eq!(cookies, vec![Cookie::new("session", "abc123"), Cookie::new("theme", "dark; blue")]);
    }

    #[test]
    fn malformed_cookies_fail() {
        assert!(parse_cookies("novalue").is_err());
        assert!(parse_cookies("$Path=/; a=b").is_err());
        assert!(parse_cookies(r#"a="unterminated"#).is_err());
        assert!(format_cookies(&[Cookie::new("bad name", "v")]).is_err());
    }

    #[test]
    fn parse_set_cookie() {
        let setting = parse_cookie_setting(
            "id=a3fWa; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/; Domain=example.com; Max-Age=3600; Secure; HttpOnly",
        )
        .unwrap();

        assert_eq!(setting.name, "id");
        assert_eq!(setting.value, "a3fWa");
        assert_eq!(setting.path.as_deref(), Some("/"));
        assert_eq!(setting.domain.as_deref(), Some("example.com"));
        assert_eq!(setting.max_age, Some(3600));
        assert_eq!(setting.expires, Some(UNIX_EPOCH + Duration::from_secs(1_445_412_480)));
        assert!(setting.secure);
        assert!(setting.access_restricted);
    }

    #[test]
    fn parse_set_cookie2() {
        let setting = parse_cookie_setting(r#"Part_Number="Rocket_0001"; Version="1"; Path="/acme""#).unwrap();
        assert_eq!(setting.version, 1);
        assert_eq!(setting.value, "Rocket_0001");
        assert_eq!(setting.path.as_deref(), Some("/acme"));
    }

    #[test]
    fn malformed_set_cookie_fails() {
        assert!(parse_cookie_setting("").is_err());
        assert!(parse_cookie_setting("=value").is_err());
        assert!(parse_cookie_setting("id=1; Max-Age=soon").is_err());
        assert!(parse_cookie_setting("id=1; Expires=never").is_err());
    }

    #[test]
    fn set_cookie_round_trip() {
        let setting = CookieSetting {
            path: Some("/".into()),
            max_age: Some(60),
            secure: true,
            access_restricted: true,
            ..CookieSetting::new("id", "a3fWa")
        };
        let formatted = format_cookie_setting(&setting).unwrap();
        assert_eq!(formatted, "id=a3fWa; Path=/; Max-Age=60; Secure; HttpOnly");
        assert_eq!(parse_cookie_setting(&formatted).unwrap(), setting);
    }

    #[test]
    fn lifetime() {
        let now = UNIX_EPOCH + Duration::from_secs(1000);
        let session = CookieSetting::new("a", "b");
        assert_eq!(remaining_lifetime(&session, now), None);

        let expired = CookieSetting { max_age: Some(0), ..CookieSetting::new("a", "b") };
        assert_eq!(remaining_lifetime(&expired, now), Some(Duration::ZERO));

        let dated = CookieSetting { expires: Some(now + Duration::from_secs(30)), ..CookieSetting::new("a", "b") };
        assert_eq!(remaining_lifetime(&dated, now), Some(Duration::from_secs(30)));
    }
}
