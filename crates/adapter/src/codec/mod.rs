//! Wire framing of message heads.
//!
//! - [`RequestHeadEncoder`] writes a request line followed by a composed
//!   [`HeaderSeries`](crate::header::HeaderSeries), keeping its order.
//! - [`ResponseHeadDecoder`] reads a status line and the response headers into a
//!   [`StatusLine`](crate::protocol::StatusLine) and a header series ready for the
//!   [`Interpreter`](crate::interpreter::Interpreter).
//!
//! Both plug into `tokio_util::codec` framed readers and writers; entity bodies are left to
//! the transport.

mod head_decoder;
mod head_encoder;

pub use head_decoder::ResponseHeadDecoder;
pub use head_encoder::{RequestHead, RequestHeadEncoder};
