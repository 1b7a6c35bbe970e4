//! Response head decoder: status line and header series from raw bytes.
//!
//! Parsing is done by `httparse`. Header names keep the case they arrived with and repeated
//! headers stay separate entries, in arrival order.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum head size: 8KB
//! - Only HTTP/1.0 and HTTP/1.1

use bytes::{Buf, BytesMut};
use http::Version;
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::header::HeaderSeries;
use crate::protocol::{ParseError, StatusLine};

/// Maximum number of headers allowed in a response
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire head
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Decoder for response heads implementing the [`Decoder`] trait.
///
/// On success the head is removed from the buffer; whatever follows belongs to the entity.
#[derive(Debug, Default, Copy, Clone)]
pub struct ResponseHeadDecoder;

impl Decoder for ResponseHeadDecoder {
    type Item = (StatusLine, HeaderSeries);
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // shortest head is "HTTP/1.1 200\n\n"
        if src.len() < 14 {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut res = httparse::Response::new(&mut headers);

        let parsed_result = res.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        });

        match parsed_result? {
            Status::Complete(head_size) => {
                trace!(head_size, "parsed response head");
                ensure!(head_size <= MAX_HEADER_BYTES, ParseError::too_large_header(head_size, MAX_HEADER_BYTES));

                let version = match res.version {
                    Some(0) => Version::HTTP_10,
                    Some(1) => Version::HTTP_11,
                    _ => return Err(ParseError::InvalidVersion(res.version)),
                };
                let code = res.code.ok_or(ParseError::InvalidStatus(None))?;
                ensure!((100..=999).contains(&code), ParseError::InvalidStatus(Some(code)));
                let reason = res.reason.filter(|reason| !reason.is_empty()).map(str::to_string);

                let mut series = HeaderSeries::with_capacity(res.headers.len());
                for header in res.headers.iter() {
                    let value = std::str::from_utf8(header.value)
                        .map_err(|_| ParseError::invalid_header(format!("value of {} is not utf-8", header.name)))?;
                    series.add(header.name, value);
                }

                let status_line = StatusLine::new(version, code, reason);
                src.advance(head_size);
                Ok(Some((status_line, series)))
            }
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn leaves_entity_in_buffer() {
        let str = indoc! {r##"
        HTTP/1.1 200 OK
        Content-Length: 3
        Content-Type: text/plain

        123"##};

        let mut bytes = BytesMut::from(str);
        let (status_line, headers) = ResponseHeadDecoder.decode(&mut bytes).unwrap().unwrap();

        assert_eq!(status_line, StatusLine::new(Version::HTTP_11, 200, Some("OK".into())));
        assert_eq!(headers.len(), 2);
        assert_eq!(&bytes[..], &b"123"[..]);
    }

    #[test]
    fn keeps_order_and_case() {
        let str = indoc! {r##"
        HTTP/1.0 401 Unauthorized
        WWW-Authenticate: Basic realm="a"
        x-custom: 1
        www-authenticate: Bearer
        Date: Sun, 06 Nov 1994 08:49:37 GMT

        "##};

        let mut bytes = BytesMut::from(str);
        let (status_line, headers) = ResponseHeadDecoder.decode(&mut bytes).unwrap().unwrap();

        assert_eq!(status_line.version, Version::HTTP_10);
        assert_eq!(status_line.status(), 401);
        let names: Vec<&str> = headers.iter().map(|h| h.name()).collect();
        assert_eq!(names, ["WWW-Authenticate", "x-custom", "www-authenticate", "Date"]);
        assert_eq!(headers.values("WWW-Authenticate").collect::<Vec<_>>(), [r#"Basic realm="a""#, "Bearer"]);
        assert!(bytes.is_empty());
    }

    #[test]
    fn missing_reason() {
        let mut bytes = BytesMut::from("HTTP/1.1 204 \r\n\r\n");
        let (status_line, _) = ResponseHeadDecoder.decode(&mut bytes).unwrap().unwrap();
        assert_eq!(status_line.reason, None);
        assert_eq!(status_line.status().reason(), Some("No Content"));
    }

    #[test]
    fn partial_head_waits() {
        let mut bytes = BytesMut::from("HTTP/1.1 200 OK\r\nContent-Le");
        assert!(ResponseHeadDecoder.decode(&mut bytes).unwrap().is_none());
        assert_eq!(bytes.len(), 27);
    }

    #[test]
    fn oversized_head_is_rejected() {
        let mut head = String::from("HTTP/1.1 200 OK\r\n");
        let filler = format!("X-Filler: {}\r\n", "0".repeat(256));
        while head.len() <= MAX_HEADER_BYTES {
            head.push_str(&filler);
        }
        let mut bytes = BytesMut::from(head.as_str());
        assert!(matches!(ResponseHeadDecoder.decode(&mut bytes), Err(ParseError::TooLargeHeader { .. })));
    }

    #[test]
    fn too_many_headers() {
        let mut head = String::from("HTTP/1.1 200 OK\r\n");
        for i in 0..=MAX_HEADER_NUM {
            head.push_str(&format!("X-{i}: v\r\n"));
        }
        head.push_str("\r\n");
        let mut bytes = BytesMut::from(head.as_str());
        assert!(matches!(ResponseHeadDecoder.decode(&mut bytes), Err(ParseError::TooManyHeaders { .. })));
    }

    #[test]
    fn garbage_is_invalid() {
        let mut bytes = BytesMut::from("NOT-HTTP garbage here\r\n\r\n");
        assert!(ResponseHeadDecoder.decode(&mut bytes).is_err());
    }
}
