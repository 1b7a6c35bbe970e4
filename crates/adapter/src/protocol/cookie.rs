use std::time::SystemTime;

/// A cookie sent back by the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cookie {
    pub version: u32,
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), ..Self::default() }
    }
}

/// A cookie the server asks the client to store, from `Set-Cookie` or `Set-Cookie2`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CookieSetting {
    pub version: u32,
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub comment: Option<String>,
    /// Lifetime in seconds; `0` discards the cookie.
    pub max_age: Option<i64>,
    pub expires: Option<SystemTime>,
    pub secure: bool,
    /// Set by the `HttpOnly` attribute.
    pub access_restricted: bool,
}

impl CookieSetting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), ..Self::default() }
    }
}
