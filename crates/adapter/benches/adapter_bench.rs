use std::hint::black_box;

use async_trait::async_trait;
use bytes::BytesMut;
use criterion::{Criterion, criterion_group, criterion_main};
use http::{Method, Uri};
use micro_http_adapter::client::{ClientAdapter, Transport, TransportRequest, TransportResponse};
use micro_http_adapter::codec::{RequestHead, RequestHeadEncoder, ResponseHeadDecoder};
use micro_http_adapter::protocol::{EntityBody, Request, TransportError};
use micro_http_adapter::sink::NoopSink;
use tokio_util::codec::{Decoder, Encoder};

const RESPONSE_HEAD: &[u8] = b"HTTP/1.1 200 OK\r\n\
    Date: Wed, 21 Oct 2015 07:28:00 GMT\r\n\
    Content-Type: text/plain; charset=utf-8\r\n\
    Content-Length: 12\r\n\
    Vary: Accept-Encoding\r\n\
    ETag: \"3a7f\"\r\n\
    \r\n";

// Round trips through the wire codecs without touching a socket
#[derive(Debug)]
struct LoopbackTransport;

#[async_trait]
impl Transport for LoopbackTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut wire = BytesMut::with_capacity(512);
        let head = RequestHead::new(request.method, request.target, request.headers);
        RequestHeadEncoder.encode(head, &mut wire).map_err(TransportError::other)?;

        let mut bytes = BytesMut::from(RESPONSE_HEAD);
        let (status_line, headers) = ResponseHeadDecoder
            .decode(&mut bytes)?
            .ok_or_else(|| TransportError::other("incomplete response head"))?;
        Ok(TransportResponse::new(status_line, headers).with_entity(EntityBody::full("Hello World!")))
    }
}

fn bench_response_head_decoder(c: &mut Criterion) {
    c.bench_function("decode_response_head", |b| {
        b.iter(|| {
            let mut bytes = BytesMut::from(RESPONSE_HEAD);
            black_box(ResponseHeadDecoder.decode(&mut bytes).unwrap());
        });
    });
}

fn bench_request_head_encoder(c: &mut Criterion) {
    let adapter = ClientAdapter::builder().transport(LoopbackTransport).build().unwrap();
    let mut request = Request::get(Uri::from_static("http://localhost/"));
    let headers = adapter.composer().compose(&mut request, &mut NoopSink);

    c.bench_function("encode_request_head", |b| {
        b.iter(|| {
            let mut bytes = BytesMut::new();
            let head = RequestHead::new(Method::GET, Uri::from_static("http://localhost/"), headers.clone());
            RequestHeadEncoder.encode(head, &mut bytes).unwrap();
            black_box(bytes);
        });
    });
}

fn bench_client_exchange(c: &mut Criterion) {
    let adapter = ClientAdapter::builder().transport(LoopbackTransport).build().unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    c.bench_function("process_simple_exchange", |b| {
        b.to_async(&runtime).iter(|| async {
            let response = adapter.send(Request::get(Uri::from_static("http://localhost/"))).await;
            black_box(response);
        });
    });
}

criterion_group!(benches, bench_response_head_decoder, bench_request_head_encoder, bench_client_exchange);
criterion_main!(benches);
