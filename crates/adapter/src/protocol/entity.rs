//! Entities: representation metadata plus their byte source.

use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use http_body::Body;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use mime::Mime;

use crate::protocol::{ByteRange, CharacterSet, Digest, Encoding, Language, Tag};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Byte source of an entity.
pub enum EntityBody {
    /// Content already held in memory.
    Full(Bytes),
    /// Content streamed from the transport.
    Streaming(UnsyncBoxBody<Bytes, BoxError>),
    /// Content that has been released and can no longer be read.
    Released,
}

impl EntityBody {
    pub fn full(bytes: impl Into<Bytes>) -> Self {
        Self::Full(bytes.into())
    }

    pub fn streaming<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self::Streaming(body.map_err(Into::into).boxed_unsync())
    }

    /// Size of the content when it is known without reading it.
    pub fn exact_size(&self) -> Option<u64> {
        match self {
            EntityBody::Full(bytes) => Some(bytes.len() as u64),
            EntityBody::Streaming(body) => body.size_hint().exact(),
            EntityBody::Released => None,
        }
    }

    /// Drops the underlying byte source.
    pub fn release(&mut self) {
        *self = EntityBody::Released;
    }

    pub fn is_released(&self) -> bool {
        matches!(self, EntityBody::Released)
    }

    /// Reads the whole content into memory.
    pub async fn into_bytes(self) -> Result<Bytes, BoxError> {
        match self {
            EntityBody::Full(bytes) => Ok(bytes),
            EntityBody::Streaming(body) => Ok(body.collect().await?.to_bytes()),
            EntityBody::Released => Err("entity content has been released".into()),
        }
    }

    /// Converts into a boxed [`Body`], suitable to hand to a body based transport.
    pub fn into_body(self) -> UnsyncBoxBody<Bytes, BoxError> {
        match self {
            EntityBody::Full(bytes) => Full::new(bytes).map_err(|never| match never {}).boxed_unsync(),
            EntityBody::Streaming(body) => body,
            EntityBody::Released => Full::new(Bytes::new()).map_err(|never| match never {}).boxed_unsync(),
        }
    }
}

impl fmt::Debug for EntityBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityBody::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            EntityBody::Streaming(body) => f.debug_tuple("Streaming").field(&body.size_hint()).finish(),
            EntityBody::Released => f.write_str("Released"),
        }
    }
}

/// A representation: metadata independent of its bytes, plus an optional byte source.
#[derive(Debug, Default)]
pub struct Entity {
    pub media_type: Option<Mime>,
    pub character_set: Option<CharacterSet>,
    pub encodings: Vec<Encoding>,
    pub languages: Vec<Language>,
    /// Size in bytes of the whole representation, when known.
    pub size: Option<u64>,
    pub range: Option<ByteRange>,
    pub digest: Option<Digest>,
    pub tag: Option<Tag>,
    pub modification_date: Option<SystemTime>,
    pub expiration_date: Option<SystemTime>,
    body: Option<EntityBody>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory entity of the given media type, sized to its content.
    pub fn full(media_type: Mime, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self { media_type: Some(media_type), size: Some(bytes.len() as u64), body: Some(EntityBody::Full(bytes)), ..Self::default() }
    }

    #[must_use]
    pub fn with_body(mut self, body: EntityBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn set_body(&mut self, body: EntityBody) {
        self.body = Some(body);
    }

    pub fn body(&self) -> Option<&EntityBody> {
        self.body.as_ref()
    }

    pub fn take_body(&mut self) -> Option<EntityBody> {
        self.body.take()
    }

    /// Releases the byte source, keeping the metadata.
    pub fn release(&mut self) {
        if let Some(body) = self.body.as_mut() {
            body.release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.body.as_ref().is_some_and(EntityBody::is_released)
    }

    /// Checks whether content can still be read from this entity.
    pub fn is_available(&self) -> bool {
        self.size != Some(0) && self.body.as_ref().is_some_and(|body| !body.is_released())
    }
}
