//! The boundary to whatever moves bytes: sockets, a connection pool, an in-memory fake.

use async_trait::async_trait;
use http::{Method, Uri};

use crate::header::HeaderSeries;
use crate::protocol::{EntityBody, StatusLine, TransportError};

/// What the adapter hands to the transport: a composed head and the request entity.
#[derive(Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub target: Uri,
    pub headers: HeaderSeries,
    pub entity: Option<EntityBody>,
}

/// What the transport hands back.
#[derive(Debug)]
pub struct TransportResponse {
    pub status_line: StatusLine,
    pub headers: HeaderSeries,
    pub entity: Option<EntityBody>,
    pub server_address: Option<String>,
    pub server_port: Option<u16>,
}

impl TransportResponse {
    pub fn new(status_line: StatusLine, headers: HeaderSeries) -> Self {
        Self { status_line, headers, entity: None, server_address: None, server_port: None }
    }

    #[must_use]
    pub fn with_entity(mut self, entity: EntityBody) -> Self {
        self.entity = Some(entity);
        self
    }
}

/// Sends one request and returns the response head plus its entity.
///
/// Timeouts and cancellation are the transport's business; it reports them as
/// [`TransportError::Timeout`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
