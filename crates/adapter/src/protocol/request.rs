//! The structured request model the composer serializes.

use std::time::SystemTime;

use http::{Method, Uri};
use mime::Mime;

use crate::header::HeaderSeries;
use crate::protocol::{
    ByteRange, CacheDirective, ChallengeResponse, CharacterSet, Cookie, Encoding, Entity, Language, Preference, Tag,
    Warning,
};

/// Conditional request constraints.
///
/// `range_tag` and `range_date` both feed `If-Range`; setting both is ambiguous and the
/// composer then writes neither.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conditions {
    pub match_tags: Vec<Tag>,
    pub none_match_tags: Vec<Tag>,
    pub modified_since: Option<SystemTime>,
    pub unmodified_since: Option<SystemTime>,
    pub range_tag: Option<Tag>,
    pub range_date: Option<SystemTime>,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Client side preferences and identification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientInfo {
    pub accepted_media_types: Vec<Preference<Mime>>,
    pub accepted_character_sets: Vec<Preference<CharacterSet>>,
    pub accepted_encodings: Vec<Preference<Encoding>>,
    pub accepted_languages: Vec<Preference<Language>>,
    pub agent: Option<String>,
    pub from: Option<String>,
}

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub target: Uri,
    pub entity: Option<Entity>,
    pub conditions: Conditions,
    pub client_info: ClientInfo,
    pub challenge_response: Option<ChallengeResponse>,
    pub proxy_challenge_response: Option<ChallengeResponse>,
    pub cookies: Vec<Cookie>,
    pub referrer: Option<Uri>,
    pub ranges: Vec<ByteRange>,
    pub warnings: Vec<Warning>,
    pub cache_directives: Vec<CacheDirective>,
    pub date: Option<SystemTime>,
    /// Additional headers written after the entity headers, in order.
    pub extension_headers: HeaderSeries,
}

impl Request {
    pub fn new(method: Method, target: Uri) -> Self {
        Self {
            method,
            target,
            entity: None,
            conditions: Conditions::default(),
            client_info: ClientInfo::default(),
            challenge_response: None,
            proxy_challenge_response: None,
            cookies: Vec::new(),
            referrer: None,
            ranges: Vec::new(),
            warnings: Vec::new(),
            cache_directives: Vec::new(),
            date: None,
            extension_headers: HeaderSeries::new(),
        }
    }

    pub fn get(target: Uri) -> Self {
        Self::new(Method::GET, target)
    }

    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn is_entity_available(&self) -> bool {
        self.entity.as_ref().is_some_and(Entity::is_available)
    }
}
