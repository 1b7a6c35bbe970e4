//! The structured response model the interpreter populates.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::time::SystemTime;

use http::{Method, Uri};

use crate::header::HeaderSeries;
use crate::protocol::{
    AuthenticationInfo, CacheDirective, ChallengeRequest, CookieSetting, Entity, Status, Warning,
};

/// What a response's content may vary by, from the `Vary` header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    MediaType,
    CharacterSet,
    Encoding,
    Language,
    Authorization,
    ClientAgent,
    Unspecified,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::MediaType => "media-type",
            Dimension::CharacterSet => "character-set",
            Dimension::Encoding => "encoding",
            Dimension::Language => "language",
            Dimension::Authorization => "authorization",
            Dimension::ClientAgent => "client-agent",
            Dimension::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

/// Where the response came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerInfo {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub agent: Option<String>,
}

#[derive(Debug, Default)]
pub struct Response {
    pub status: Status,
    pub entity: Option<Entity>,
    pub server_info: ServerInfo,
    pub date: Option<SystemTime>,
    /// Age in seconds.
    pub age: Option<u64>,
    pub retry_after: Option<SystemTime>,
    pub location: Option<Uri>,
    pub cookie_settings: Vec<CookieSetting>,
    pub challenge_requests: Vec<ChallengeRequest>,
    pub proxy_challenge_requests: Vec<ChallengeRequest>,
    pub authentication_info: Option<AuthenticationInfo>,
    pub allowed_methods: HashSet<Method>,
    pub dimensions: BTreeSet<Dimension>,
    pub warnings: Vec<Warning>,
    pub cache_directives: Vec<CacheDirective>,
    /// Headers no codec recognized, kept verbatim.
    pub extension_headers: HeaderSeries,
}

impl Response {
    pub fn new(status: Status) -> Self {
        Self { status, ..Self::default() }
    }

    /// Marks the response as failed with a connector error status.
    ///
    /// A status that already reports an error is kept as is.
    pub fn fail(&mut self, status: Status, cause: impl fmt::Display) {
        if !self.status.is_error() {
            self.status = status.with_description(cause.to_string());
        }
    }

    pub fn is_entity_available(&self) -> bool {
        self.entity.as_ref().is_some_and(Entity::is_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_keeps_existing_error() {
        let mut response = Response::new(Status::new(503, None));
        response.fail(Status::CONNECTOR_ERROR_INTERNAL, "boom");
        assert_eq!(response.status, 503);

        let mut response = Response::new(Status::SUCCESS_OK);
        response.fail(Status::CONNECTOR_ERROR_INTERNAL, "boom");
        assert_eq!(response.status, 1002);
        assert_eq!(response.status.description(), Some("boom"));
    }
}
