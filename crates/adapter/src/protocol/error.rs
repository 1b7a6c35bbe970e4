use std::io;
use thiserror::Error;

/// Failure to parse or format a single header value.
///
/// Never fatal to an exchange: the composer and interpreter report it to a
/// [`WarningSink`](crate::sink::WarningSink) and move on to the next header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid date: {value}")]
    InvalidDate { value: String },

    #[error("invalid number: {value}")]
    InvalidNumber { value: String },

    #[error("invalid quality weight: {value}")]
    InvalidQuality { value: String },

    #[error("invalid entity tag: {value}")]
    InvalidTag { value: String },

    #[error("invalid media type: {value}")]
    InvalidMediaType { value: String },

    #[error("invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("invalid cookie: {reason}")]
    InvalidCookie { reason: String },

    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("invalid challenge: {reason}")]
    InvalidChallenge { reason: String },

    #[error("invalid base64 value: {reason}")]
    InvalidBase64 { reason: String },

    #[error("invalid reference: {value}")]
    InvalidReference { value: String },

    #[error("unsupported authentication scheme: {scheme}")]
    UnsupportedScheme { scheme: String },
}

impl CodecError {
    pub fn invalid_date<S: ToString>(value: S) -> Self {
        Self::InvalidDate { value: value.to_string() }
    }

    pub fn invalid_number<S: ToString>(value: S) -> Self {
        Self::InvalidNumber { value: value.to_string() }
    }

    pub fn invalid_quality<S: ToString>(value: S) -> Self {
        Self::InvalidQuality { value: value.to_string() }
    }

    pub fn invalid_tag<S: ToString>(value: S) -> Self {
        Self::InvalidTag { value: value.to_string() }
    }

    pub fn invalid_media_type<S: ToString>(value: S) -> Self {
        Self::InvalidMediaType { value: value.to_string() }
    }

    pub fn invalid_token<S: ToString>(reason: S) -> Self {
        Self::InvalidToken { reason: reason.to_string() }
    }

    pub fn invalid_cookie<S: ToString>(reason: S) -> Self {
        Self::InvalidCookie { reason: reason.to_string() }
    }

    pub fn invalid_range<S: ToString>(reason: S) -> Self {
        Self::InvalidRange { reason: reason.to_string() }
    }

    pub fn invalid_challenge<S: ToString>(reason: S) -> Self {
        Self::InvalidChallenge { reason: reason.to_string() }
    }

    pub fn invalid_base64<S: ToString>(reason: S) -> Self {
        Self::InvalidBase64 { reason: reason.to_string() }
    }

    pub fn invalid_reference<S: ToString>(value: S) -> Self {
        Self::InvalidReference { value: value.to_string() }
    }

    pub fn unsupported_scheme<S: ToString>(scheme: S) -> Self {
        Self::UnsupportedScheme { scheme: scheme.to_string() }
    }
}

/// Errors raised while framing a response head off the wire.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid status code: {0:?}")]
    InvalidStatus(Option<u16>),

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised while writing a request head to the wire.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Failure reported by the transport collaborator.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {reason}")]
    Connection { reason: String },

    #[error("exchange timed out")]
    Timeout,

    #[error("protocol error: {source}")]
    Protocol {
        #[from]
        source: ParseError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("transport error: {reason}")]
    Other { reason: String },
}

impl TransportError {
    pub fn connection<S: ToString>(reason: S) -> Self {
        Self::Connection { reason: reason.to_string() }
    }

    pub fn other<S: ToString>(reason: S) -> Self {
        Self::Other { reason: reason.to_string() }
    }
}

/// Failure of one exchange as a whole.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },

    #[error("invalid status line: {reason}")]
    InvalidStatus { reason: String },

    #[error("entity error: {reason}")]
    Entity { reason: String },
}

impl AdapterError {
    pub fn invalid_status<S: ToString>(reason: S) -> Self {
        Self::InvalidStatus { reason: reason.to_string() }
    }

    pub fn entity<S: ToString>(reason: S) -> Self {
        Self::Entity { reason: reason.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("transport must be set")]
    MissingTransport,
}
