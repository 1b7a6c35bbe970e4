//! Response status with its semantic classification.

use std::fmt;

use http::{StatusCode, Version};

/// Semantic class of a [`Status`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    /// Raised locally when the exchange could not complete, codes `1000..=1002`.
    ConnectorError,
    Unknown,
}

/// Status of a response: numeric code, reason phrase and an optional description.
///
/// Besides the HTTP codes, the connector error codes `1000` (connection), `1001`
/// (communication) and `1002` (internal) describe exchanges that failed locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: u16,
    reason: Option<String>,
    description: Option<String>,
}

impl Status {
    pub const CONTINUE: Status = Status::from_code(100);
    pub const SUCCESS_OK: Status = Status::from_code(200);
    pub const SUCCESS_NO_CONTENT: Status = Status::from_code(204);
    pub const SUCCESS_RESET_CONTENT: Status = Status::from_code(205);
    pub const REDIRECTION_NOT_MODIFIED: Status = Status::from_code(304);
    pub const CLIENT_ERROR_BAD_REQUEST: Status = Status::from_code(400);
    pub const SERVER_ERROR_INTERNAL: Status = Status::from_code(500);
    pub const CONNECTOR_ERROR_CONNECTION: Status = Status::from_code(1000);
    pub const CONNECTOR_ERROR_COMMUNICATION: Status = Status::from_code(1001);
    pub const CONNECTOR_ERROR_INTERNAL: Status = Status::from_code(1002);

    const fn from_code(code: u16) -> Self {
        Self { code, reason: None, description: None }
    }

    pub fn new(code: u16, reason: Option<String>) -> Self {
        Self { code, reason, description: None }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Returns the reason phrase received on the wire, or the canonical one.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref().or_else(|| canonical_reason(self.code))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn class(&self) -> StatusClass {
        match self.code {
            100..=199 => StatusClass::Informational,
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirection,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            1000..=1002 => StatusClass::ConnectorError,
            _ => StatusClass::Unknown,
        }
    }

    pub fn is_informational(&self) -> bool {
        self.class() == StatusClass::Informational
    }

    pub fn is_success(&self) -> bool {
        self.class() == StatusClass::Success
    }

    pub fn is_redirection(&self) -> bool {
        self.class() == StatusClass::Redirection
    }

    pub fn is_connector_error(&self) -> bool {
        self.class() == StatusClass::ConnectorError
    }

    pub fn is_error(&self) -> bool {
        matches!(self.class(), StatusClass::ClientError | StatusClass::ServerError | StatusClass::ConnectorError)
    }

    /// Converts into an [`http::StatusCode`], `None` for connector errors.
    pub fn as_http(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.code).ok()
    }
}

/// Two statuses are the same status when their codes match, whatever their phrases.
impl PartialEq<u16> for Status {
    fn eq(&self, other: &u16) -> bool {
        self.code == *other
    }
}

impl From<StatusCode> for Status {
    fn from(code: StatusCode) -> Self {
        Self::from_code(code.as_u16())
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::SUCCESS_OK
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} {reason}", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

/// First line of a response as received: version, numeric code and reason phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: Version,
    pub code: u16,
    pub reason: Option<String>,
}

impl StatusLine {
    pub fn new(version: Version, code: u16, reason: Option<String>) -> Self {
        Self { version, code, reason }
    }

    pub fn status(&self) -> Status {
        Status::new(self.code, self.reason.clone())
    }
}

fn canonical_reason(code: u16) -> Option<&'static str> {
    match code {
        1000 => Some("Connection Error"),
        1001 => Some("Communication Error"),
        1002 => Some("Internal Connector Error"),
        code => StatusCode::from_u16(code).ok().and_then(|c| c.canonical_reason()),
    }
}
