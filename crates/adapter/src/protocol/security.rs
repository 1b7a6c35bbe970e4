//! Authentication negotiation: challenges, credentials and authentication info.

use std::fmt;

/// A named parameter of a challenge or credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Authentication scheme, compared ignoring ASCII case.
#[derive(Debug, Clone, Eq)]
pub struct ChallengeScheme(String);

impl ChallengeScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn basic() -> Self {
        Self::new("Basic")
    }

    pub fn bearer() -> Self {
        Self::new("Bearer")
    }

    pub fn digest() -> Self {
        Self::new("Digest")
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ChallengeScheme {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for ChallengeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A challenge issued by a server or proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub scheme: ChallengeScheme,
    pub realm: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl ChallengeRequest {
    pub fn new(scheme: ChallengeScheme) -> Self {
        Self { scheme, realm: None, parameters: Vec::new() }
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.iter().find(|p| p.name.eq_ignore_ascii_case(name)).map(|p| p.value.as_str())
    }
}

/// Credentials answering a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeResponse {
    pub scheme: ChallengeScheme,
    pub identifier: Option<String>,
    pub secret: Option<String>,
    pub parameters: Vec<Parameter>,
    /// Pre-formatted credentials, written verbatim after the scheme name.
    pub raw: Option<String>,
}

impl ChallengeResponse {
    pub fn new(scheme: ChallengeScheme) -> Self {
        Self { scheme, identifier: None, secret: None, parameters: Vec::new(), raw: None }
    }

    pub fn basic(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { identifier: Some(identifier.into()), secret: Some(secret.into()), ..Self::new(ChallengeScheme::basic()) }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self { raw: Some(token.into()), ..Self::new(ChallengeScheme::bearer()) }
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.iter().find(|p| p.name.eq_ignore_ascii_case(name)).map(|p| p.value.as_str())
    }
}

/// Content of an `Authentication-Info` header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationInfo {
    pub next_nonce: Option<String>,
    pub quality: Option<String>,
    pub response_digest: Option<String>,
    pub client_nonce: Option<String>,
    pub nonce_count: Option<u32>,
}
