//! Representation metadata shared by requests, responses and their entities.

use std::fmt;
use std::str::FromStr;

use mime::Mime;

use crate::protocol::CodecError;

/// Quality weight used when none is given.
pub const DEFAULT_QUALITY: f32 = 1.0;

/// A metadata value that can appear in a preference list.
pub trait PreferenceValue: Sized {
    fn parse_value(value: &str) -> Result<Self, CodecError>;

    fn format_value(&self) -> String;
}

/// A metadata value weighted with a quality in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Preference<M> {
    pub metadata: M,
    pub quality: f32,
}

impl<M> Preference<M> {
    pub fn new(metadata: M) -> Self {
        Self { metadata, quality: DEFAULT_QUALITY }
    }

    pub fn weighted(metadata: M, quality: f32) -> Self {
        Self { metadata, quality }
    }
}

impl<M> From<M> for Preference<M> {
    fn from(metadata: M) -> Self {
        Self::new(metadata)
    }
}

impl PreferenceValue for Mime {
    fn parse_value(value: &str) -> Result<Self, CodecError> {
        value.parse::<Mime>().map_err(|e| CodecError::invalid_media_type(format!("{value} ({e})")))
    }

    fn format_value(&self) -> String {
        self.to_string()
    }
}

macro_rules! token_metadata {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn name(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CodecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() || s.bytes().any(|b| b.is_ascii_whitespace() || matches!(b, b',' | b';' | b'"')) {
                    return Err(CodecError::invalid_token(format!("{} name {s:?}", stringify!($name))));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl PreferenceValue for $name {
            fn parse_value(value: &str) -> Result<Self, CodecError> {
                value.parse()
            }

            fn format_value(&self) -> String {
                self.0.clone()
            }
        }
    };
}

token_metadata!(
    /// Character set of a representation, such as `utf-8`.
    CharacterSet
);
token_metadata!(
    /// Content coding, such as `gzip`.
    Encoding
);
token_metadata!(
    /// Language tag, such as `en-US`.
    Language
);

impl CharacterSet {
    pub fn utf8() -> Self {
        Self::new("UTF-8")
    }
}

/// Entity tag used by conditional requests.
///
/// The opaque value `*` stands for "any entity" and is written without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    opaque: String,
    weak: bool,
}

impl Tag {
    pub fn strong(opaque: impl Into<String>) -> Self {
        Self { opaque: opaque.into(), weak: false }
    }

    pub fn weak(opaque: impl Into<String>) -> Self {
        Self { opaque: opaque.into(), weak: true }
    }

    pub fn all() -> Self {
        Self::strong("*")
    }

    pub fn opaque(&self) -> &str {
        &self.opaque
    }

    pub fn is_weak(&self) -> bool {
        self.weak
    }

    pub fn is_all(&self) -> bool {
        self.opaque == "*"
    }
}

pub const ALGORITHM_MD5: &str = "MD5";

/// Digest of an entity's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub algorithm: String,
    pub value: Vec<u8>,
}

impl Digest {
    pub fn new(algorithm: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self { algorithm: algorithm.into(), value: value.into() }
    }

    pub fn md5(value: impl Into<Vec<u8>>) -> Self {
        Self::new(ALGORITHM_MD5, value)
    }

    pub fn is_md5(&self) -> bool {
        self.algorithm.eq_ignore_ascii_case(ALGORITHM_MD5)
    }
}

/// A byte range, in the `bytes` unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ByteRange {
    /// `first-last`, both inclusive.
    Span { first: u64, last: u64 },
    /// `first-`, up to the end.
    From(u64),
    /// `-length`, the last `length` bytes.
    Suffix(u64),
}

impl ByteRange {
    /// Resolves the range against a known total size, returning inclusive `(first, last)`.
    pub fn resolve(&self, size: u64) -> Option<(u64, u64)> {
        let (first, last) = match *self {
            ByteRange::Span { first, last } => (first, last.min(size.checked_sub(1)?)),
            ByteRange::From(first) => (first, size.checked_sub(1)?),
            ByteRange::Suffix(length) => (size.saturating_sub(length), size.checked_sub(1)?),
        };
        (first <= last).then_some((first, last))
    }
}
