//! The call adapter: one exchange from typed request to typed response.
//!
//! [`ClientAdapter`] composes the request head, hands it to a [`Transport`], interprets the
//! status line and headers it gets back, attaches the entity and applies the entity lifecycle
//! rules. Results are delivered in three ways:
//!
//! - [`ClientAdapter::send`]: an async call resolving to the response
//! - [`ClientAdapter::send_blocking`]: blocks the calling thread
//! - [`ClientAdapter::dispatch`] and [`ClientAdapter::dispatch_with`]: spawned on the tokio
//!   runtime, delivered once through a single-shot channel or a completion handler
//!
//! Failures never escape as errors: they become a connector error [`Status`](crate::protocol::Status)
//! on the response.

mod adapter;
mod lifecycle;
mod transport;

pub use adapter::{ClientAdapter, ClientAdapterBuilder};
pub use lifecycle::apply_entity_lifecycle;
pub use transport::{Transport, TransportRequest, TransportResponse};
