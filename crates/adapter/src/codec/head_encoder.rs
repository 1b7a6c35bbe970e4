//! Request head encoder: request line plus the composed header series.
//!
//! Headers are written exactly in series order with their names as given, so whatever the
//! composer decided about ordering (credentials last) survives on the wire.

use std::io;
use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};
use http::{Method, Uri, Version};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::header::HeaderSeries;
use crate::protocol::SendError;
use crate::value::reader::is_token;

/// Initial buffer size allocated for head serialization
const INIT_HEAD_SIZE: usize = 1024;

/// Everything written before the request entity.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
    pub headers: HeaderSeries,
}

impl RequestHead {
    pub fn new(method: Method, target: Uri, headers: HeaderSeries) -> Self {
        Self { method, target, version: Version::HTTP_11, headers }
    }

    /// The request target in origin form, `/` when the path is empty.
    pub fn origin_form(&self) -> &str {
        match self.target.path_and_query() {
            Some(path_and_query) if !path_and_query.as_str().is_empty() => path_and_query.as_str(),
            _ => "/",
        }
    }
}

/// Encoder for request heads implementing the [`Encoder`] trait.
#[derive(Debug, Default, Copy, Clone)]
pub struct RequestHeadEncoder;

impl Encoder<RequestHead> for RequestHeadEncoder {
    type Error = SendError;

    fn encode(&mut self, head: RequestHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let version = match head.version {
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(io::Error::from(ErrorKind::Unsupported).into());
            }
        };

        dst.reserve(INIT_HEAD_SIZE);
        write!(FastWrite(dst), "{} {} {version}\r\n", head.method, head.origin_form())?;

        for header in &head.headers {
            if !is_token(header.name()) {
                return Err(SendError::invalid_header(format!("invalid header name {:?}", header.name())));
            }
            if header.value().bytes().any(|b| b == b'\r' || b == b'\n') {
                return Err(SendError::invalid_header(format!("line break in value of {}", header.name())));
            }
            dst.put_slice(header.name().as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(header.value().as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writer appending to a [`BytesMut`] that has already reserved room.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
