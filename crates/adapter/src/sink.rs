//! Non-fatal diagnostics raised while composing or interpreting headers.
//!
//! The composer and interpreter never log through hidden global state: each call receives a
//! [`WarningSink`]. Use [`TracingSink`] to forward warnings to `tracing`, or collect them into a
//! `Vec<CodecWarning>` to inspect them.

use std::fmt;

use tracing::warn;

use crate::protocol::CodecError;

/// A header that could not be handled, or was deliberately left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecWarning {
    /// An incoming header value could not be parsed; its field is left unset.
    Parse { header: String, value: String, cause: CodecError },
    /// An outgoing header could not be formatted and was omitted.
    Format { header: String, cause: CodecError },
    /// Two valid inputs contradict each other; the ambiguous header was omitted.
    Policy { header: String, reason: String },
    /// A caller supplied extension header clashes with a composed one and was dropped.
    Ignored { header: String },
}

impl CodecWarning {
    pub fn parse<S: ToString>(header: &str, value: S, cause: CodecError) -> Self {
        Self::Parse { header: header.to_string(), value: value.to_string(), cause }
    }

    pub fn format(header: &str, cause: CodecError) -> Self {
        Self::Format { header: header.to_string(), cause }
    }

    pub fn policy<S: ToString>(header: &str, reason: S) -> Self {
        Self::Policy { header: header.to_string(), reason: reason.to_string() }
    }

    pub fn ignored(header: &str) -> Self {
        Self::Ignored { header: header.to_string() }
    }

    /// Name of the header the warning is about.
    pub fn header(&self) -> &str {
        match self {
            CodecWarning::Parse { header, .. }
            | CodecWarning::Format { header, .. }
            | CodecWarning::Policy { header, .. }
            | CodecWarning::Ignored { header } => header,
        }
    }
}

impl fmt::Display for CodecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecWarning::Parse { header, value, cause } => {
                write!(f, "error during {header} header parsing, value {value:?}: {cause}")
            }
            CodecWarning::Format { header, cause } => write!(f, "unable to format the {header} header: {cause}"),
            CodecWarning::Policy { header, reason } => write!(f, "unable to format the {header} header: {reason}"),
            CodecWarning::Ignored { header } => {
                write!(f, "extension header {header} is managed by the composer and was ignored")
            }
        }
    }
}

/// Receiver of [`CodecWarning`]s.
pub trait WarningSink {
    fn warn(&mut self, warning: CodecWarning);
}

impl WarningSink for Vec<CodecWarning> {
    fn warn(&mut self, warning: CodecWarning) {
        self.push(warning);
    }
}

/// Forwards every warning to `tracing` at the `WARN` level.
#[derive(Debug, Default, Copy, Clone)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: CodecWarning) {
        warn!(header = warning.header(), "{}", warning);
    }
}

/// Discards every warning.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoopSink;

impl WarningSink for NoopSink {
    fn warn(&mut self, _warning: CodecWarning) {}
}
