//! The typed HTTP model the codec translates to and from.
//!
//! - **Exchange models**: [`Request`] is what the composer reads, [`Response`] is what the
//!   interpreter fills in. Both are created fresh for each exchange by the caller.
//! - **Representation**: [`Entity`] carries metadata (media type, encodings, size, range,
//!   digest, validators) next to an [`EntityBody`] byte source.
//! - **Metadata**: [`Preference`], [`Tag`], [`Digest`], [`ByteRange`] and the token newtypes.
//! - **Header families**: cookies, challenges, cache directives and warnings.
//! - **Errors** ([`error`]): per-value [`CodecError`], wire framing [`ParseError`] and
//!   [`SendError`], transport and exchange level failures.

mod cache;
mod cookie;
mod entity;
mod error;
mod metadata;
mod request;
mod response;
mod security;
mod status;
mod warning;

pub use cache::CacheDirective;
pub use cookie::{Cookie, CookieSetting};
pub use entity::{BoxError, Entity, EntityBody};
pub use error::{AdapterError, BuildError, CodecError, ParseError, SendError, TransportError};
pub use metadata::{
    ALGORITHM_MD5, ByteRange, CharacterSet, DEFAULT_QUALITY, Digest, Encoding, Language, Preference, PreferenceValue, Tag,
};
pub use request::{ClientInfo, Conditions, Request};
pub use response::{Dimension, Response, ServerInfo};
pub use security::{AuthenticationInfo, ChallengeRequest, ChallengeResponse, ChallengeScheme, Parameter};
pub use status::{Status, StatusClass, StatusLine};
pub use warning::Warning;
