//! Credential formatting per challenge scheme.
//!
//! An [`Authenticator`] turns a [`ChallengeResponse`] into the value of an `Authorization` or
//! `Proxy-Authorization` header. It runs after every other request header has been composed and
//! receives them as a read-only [`HeaderSeries`], so schemes that sign over the request can see
//! everything they sign.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::header::HeaderSeries;
use crate::protocol::{ChallengeResponse, ChallengeScheme, CodecError, Request};
use crate::value::challenge::{format_generic_credentials, parse_generic_credentials};

/// Formats and reads credentials of one challenge scheme.
pub trait Authenticator: Send + Sync {
    fn scheme(&self) -> ChallengeScheme;

    fn format_credentials(
        &self,
        credentials: &ChallengeResponse,
        request: &Request,
        headers: &HeaderSeries,
    ) -> Result<String, CodecError>;

    /// Reads credentials of this scheme back from a header value.
    fn parse_credentials(&self, value: &str) -> Result<ChallengeResponse, CodecError> {
        parse_generic_credentials(value)
    }
}

/// `Basic`: base64 of `identifier:secret`.
#[derive(Debug, Default, Copy, Clone)]
pub struct BasicAuthenticator;

impl Authenticator for BasicAuthenticator {
    fn scheme(&self) -> ChallengeScheme {
        ChallengeScheme::basic()
    }

    fn format_credentials(&self, credentials: &ChallengeResponse, _request: &Request, _headers: &HeaderSeries) -> Result<String, CodecError> {
        let identifier =
            credentials.identifier.as_deref().ok_or_else(|| CodecError::invalid_challenge("basic credentials without identifier"))?;
        if identifier.contains(':') {
            return Err(CodecError::invalid_challenge("basic identifier must not contain ':'"));
        }
        let secret = credentials.secret.as_deref().unwrap_or_default();
        Ok(format!("{} {}", credentials.scheme, STANDARD.encode(format!("{identifier}:{secret}"))))
    }

    fn parse_credentials(&self, value: &str) -> Result<ChallengeResponse, CodecError> {
        let generic = parse_generic_credentials(value)?;
        let encoded = generic.raw.ok_or_else(|| CodecError::invalid_challenge("basic credentials without token"))?;
        let decoded = STANDARD.decode(&encoded).map_err(CodecError::invalid_base64)?;
        let decoded = String::from_utf8(decoded).map_err(CodecError::invalid_base64)?;
        let (identifier, secret) =
            decoded.split_once(':').ok_or_else(|| CodecError::invalid_challenge("basic credentials without ':'"))?;

        let mut credentials = ChallengeResponse::basic(identifier, secret);
        credentials.scheme = generic.scheme;
        Ok(credentials)
    }
}

/// `Bearer`: the token is written verbatim.
#[derive(Debug, Default, Copy, Clone)]
pub struct BearerAuthenticator;

impl Authenticator for BearerAuthenticator {
    fn scheme(&self) -> ChallengeScheme {
        ChallengeScheme::bearer()
    }

    fn format_credentials(&self, credentials: &ChallengeResponse, _request: &Request, _headers: &HeaderSeries) -> Result<String, CodecError> {
        let token = credentials.raw.as_deref().or(credentials.secret.as_deref());
        let token = token.ok_or_else(|| CodecError::invalid_challenge("bearer credentials without token"))?;
        Ok(format!("{} {token}", credentials.scheme))
    }
}

/// Authenticators looked up by scheme name, ignoring ASCII case.
///
/// Schemes without a registered authenticator use the generic `scheme param=value` form.
#[derive(Clone)]
pub struct Authenticators {
    authenticators: Vec<Arc<dyn Authenticator>>,
}

impl Authenticators {
    /// An empty registry: every scheme uses the generic form.
    pub fn empty() -> Self {
        Self { authenticators: Vec::new() }
    }

    /// Registers `authenticator`, replacing any previous one for the same scheme.
    pub fn register(&mut self, authenticator: impl Authenticator + 'static) {
        let scheme = authenticator.scheme();
        self.authenticators.retain(|existing| existing.scheme() != scheme);
        self.authenticators.push(Arc::new(authenticator));
    }

    pub fn find(&self, scheme: &ChallengeScheme) -> Option<&dyn Authenticator> {
        self.authenticators.iter().find(|a| a.scheme() == *scheme).map(AsRef::as_ref)
    }

    pub fn format_credentials(
        &self,
        credentials: &ChallengeResponse,
        request: &Request,
        headers: &HeaderSeries,
    ) -> Result<String, CodecError> {
        match self.find(&credentials.scheme) {
            Some(authenticator) => authenticator.format_credentials(credentials, request, headers),
            None => Ok(format_generic_credentials(credentials)),
        }
    }

    pub fn parse_credentials(&self, value: &str) -> Result<ChallengeResponse, CodecError> {
        let scheme = parse_generic_credentials(value)?.scheme;
        match self.find(&scheme) {
            Some(authenticator) => authenticator.parse_credentials(value),
            None => parse_generic_credentials(value),
        }
    }
}

impl Default for Authenticators {
    /// Registry with [`BasicAuthenticator`] and [`BearerAuthenticator`].
    fn default() -> Self {
        let mut authenticators = Self::empty();
        authenticators.register(BasicAuthenticator);
        authenticators.register(BearerAuthenticator);
        authenticators
    }
}

impl std::fmt::Debug for Authenticators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.authenticators.iter().map(|a| a.scheme())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Uri;

    fn request() -> Request {
        Request::get(Uri::from_static("http://example.com/"))
    }

    #[test]
    fn basic_round_trip() {
        let authenticators = Authenticators::default();
        let credentials = ChallengeResponse::basic("Aladdin", "open sesame");

        let formatted = authenticators.format_credentials(&credentials, &request(), &HeaderSeries::new()).unwrap();
        assert_eq!(formatted, "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
        assert_eq!(authenticators.parse_credentials(&formatted).unwrap(), credentials);
    }

    #[test]
    fn basic_requires_identifier() {
        let credentials = ChallengeResponse::new(ChallengeScheme::basic());
        assert!(BasicAuthenticator.format_credentials(&credentials, &request(), &HeaderSeries::new()).is_err());
        assert!(BasicAuthenticator.parse_credentials("Basic !!!").is_err());
    }

    #[test]
    fn bearer() {
        let formatted =
            Authenticators::default().format_credentials(&ChallengeResponse::bearer("mF_9.B5f-4.1JqM"), &request(), &HeaderSeries::new());
        assert_eq!(formatted.unwrap(), "Bearer mF_9.B5f-4.1JqM");
    }

    #[test]
    fn unknown_scheme_uses_generic_form() {
        let mut credentials = ChallengeResponse::new(ChallengeScheme::new("Custom"));
        credentials.raw = Some("opaque".into());
        let formatted = Authenticators::empty().format_credentials(&credentials, &request(), &HeaderSeries::new()).unwrap();
        assert_eq!(formatted, "Custom opaque");
    }

    struct HeaderCounting;

    impl Authenticator for HeaderCounting {
        fn scheme(&self) -> ChallengeScheme {
            ChallengeScheme::new("Counting")
        }

        fn format_credentials(&self, credentials: &ChallengeResponse, _request: &Request, headers: &HeaderSeries) -> Result<String, CodecError> {
            Ok(format!("{} headers={}", credentials.scheme, headers.len()))
        }
    }

    #[test]
    fn registration_replaces_same_scheme() {
        let mut authenticators = Authenticators::empty();
        authenticators.register(HeaderCounting);
        authenticators.register(HeaderCounting);
        assert_eq!(format!("{authenticators:?}"), r#"[ChallengeScheme("Counting")]"#);

        let headers: HeaderSeries = [("Host", "example.com"), ("Date", "x")].into_iter().collect();
        let credentials = ChallengeResponse::new(ChallengeScheme::new("counting"));
        assert_eq!(authenticators.format_credentials(&credentials, &request(), &headers).unwrap(), "counting headers=2");
    }
}
