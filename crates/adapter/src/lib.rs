//! A typed HTTP header codec with a client call adapter.
//!
//! This crate translates between a structured request/response model and the ordered header
//! series seen on the wire. Composing goes from a [`protocol::Request`] to a
//! [`header::HeaderSeries`]; interpreting goes from a status line and a header series back to a
//! [`protocol::Response`]. Malformed or unknown headers never abort an exchange: they are
//! reported to an explicit warning sink and skipped, or kept verbatim.
//!
//! # Example
//!
//! ```
//! use http::{Uri, Version};
//! use micro_http_adapter::composer::Composer;
//! use micro_http_adapter::header::HeaderSeries;
//! use micro_http_adapter::interpreter::Interpreter;
//! use micro_http_adapter::protocol::{Preference, Request, StatusLine};
//! use micro_http_adapter::sink::CodecWarning;
//!
//! let mut request = Request::get(Uri::from_static("http://example.com/"));
//! request.client_info.accepted_media_types =
//!     vec![Preference::new(mime::TEXT_HTML), Preference::weighted(mime::APPLICATION_JSON, 0.8)];
//!
//! let mut warnings: Vec<CodecWarning> = Vec::new();
//! let headers = Composer::default().compose(&mut request, &mut warnings);
//! assert_eq!(headers.first_value("Accept"), Some("text/html, application/json;q=0.8"));
//!
//! let mut received = HeaderSeries::new();
//! received.add("Vary", "Accept, User-Agent, *");
//! received.add("Age", "not a number");
//!
//! let status_line = StatusLine::new(Version::HTTP_11, 200, Some("OK".to_string()));
//! let response = Interpreter::default().interpret(&status_line, &received, &mut warnings);
//! assert_eq!(response.dimensions.len(), 3);
//! assert_eq!(response.age, None);
//! assert_eq!(warnings.len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`header`]: the ordered, case-insensitive [`HeaderSeries`](header::HeaderSeries) and the
//!   wire header names
//! - [`protocol`]: the typed model (request, response, entity, status, metadata) and errors
//! - [`value`]: formatter/parser pairs, one per header family
//! - [`security`]: credential formatting per challenge scheme
//! - [`composer`]: request model to header series, credentials strictly last
//! - [`interpreter`]: header series to response model through a handler table
//! - [`codec`]: request head encoder and response head decoder for `tokio_util` framing
//! - [`client`]: the call adapter driving a [`Transport`](client::Transport)
//! - [`sink`]: the warning sink passed into composing and interpreting
//!
//! # Concurrency
//!
//! [`Composer`](composer::Composer) and [`Interpreter`](interpreter::Interpreter) hold only
//! configuration and are shared freely across threads; every call works on data owned by that
//! call. Only [`ClientAdapter::send_blocking`](client::ClientAdapter::send_blocking) blocks.
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 heads only
//! - No TLS or connection management, that is the transport's job
//! - Maximum response head size: 8KB
//! - Maximum number of response headers: 64

pub mod client;
pub mod codec;
pub mod composer;
pub mod header;
pub mod interpreter;
pub mod protocol;
pub mod security;
pub mod sink;
pub mod value;

mod utils;
pub(crate) use utils::ensure;
