use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::channel::oneshot;
use tracing::{debug, error, warn};

use crate::client::lifecycle::apply_entity_lifecycle;
use crate::client::transport::{Transport, TransportRequest, TransportResponse};
use crate::composer::{Composer, ComposerConfig};
use crate::interpreter::{HeaderHandler, Interpreter};
use crate::protocol::{AdapterError, BuildError, Entity, EntityBody, Request, Response, Status, TransportError};
use crate::security::Authenticator;
use crate::sink::TracingSink;

/// Runs exchanges: composes the request head, hands it to the [`Transport`], interprets what
/// comes back and applies the entity lifecycle.
///
/// Cloning is cheap; clones share the transport and configuration.
#[derive(Clone)]
pub struct ClientAdapter {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    composer: Composer,
    interpreter: Interpreter,
}

pub struct ClientAdapterBuilder {
    transport: Option<Arc<dyn Transport>>,
    composer_config: ComposerConfig,
    interpreter: Interpreter,
}

impl ClientAdapterBuilder {
    fn new() -> Self {
        Self { transport: None, composer_config: ComposerConfig::default(), interpreter: Interpreter::default() }
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// `User-Agent` for requests naming none, `None` to send no default.
    pub fn user_agent(mut self, user_agent: Option<impl Into<String>>) -> Self {
        self.composer_config.user_agent = user_agent.map(Into::into);
        self
    }

    /// `Accept` for requests listing no media types, `None` to send no default.
    pub fn default_accept(mut self, accept: Option<impl Into<String>>) -> Self {
        self.composer_config.default_accept = accept.map(Into::into);
        self
    }

    pub fn authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.composer_config.authenticators.register(authenticator);
        self
    }

    pub fn header_handler(mut self, name: &str, handler: HeaderHandler) -> Self {
        self.interpreter.register(name, handler);
        self
    }

    pub fn build(self) -> Result<ClientAdapter, BuildError> {
        let transport = self.transport.ok_or(BuildError::MissingTransport)?;
        let inner = Inner { transport, composer: Composer::new(self.composer_config), interpreter: self.interpreter };
        Ok(ClientAdapter { inner: Arc::new(inner) })
    }
}

impl fmt::Debug for ClientAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAdapter")
            .field("composer", &self.inner.composer)
            .field("interpreter", &self.inner.interpreter)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ClientAdapterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAdapterBuilder")
            .field("has_transport", &self.transport.is_some())
            .field("composer_config", &self.composer_config)
            .finish_non_exhaustive()
    }
}

impl AdapterError {
    /// Connector error status reporting this failure.
    pub fn status(&self) -> Status {
        match self {
            AdapterError::Transport { source: TransportError::Connection { .. } } => Status::CONNECTOR_ERROR_CONNECTION,
            AdapterError::Transport {
                source: TransportError::Timeout | TransportError::Io { .. } | TransportError::Protocol { .. },
            } => Status::CONNECTOR_ERROR_COMMUNICATION,
            AdapterError::Transport { source: TransportError::Other { .. } }
            | AdapterError::InvalidStatus { .. }
            | AdapterError::Entity { .. } => Status::CONNECTOR_ERROR_INTERNAL,
        }
    }
}

impl ClientAdapter {
    pub fn builder() -> ClientAdapterBuilder {
        ClientAdapterBuilder::new()
    }

    pub fn composer(&self) -> &Composer {
        &self.inner.composer
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.inner.interpreter
    }

    /// Runs one exchange.
    ///
    /// Never fails: a failed exchange yields a response with a connector error status, unless
    /// the response already reported an error of its own.
    pub async fn send(&self, request: Request) -> Response {
        let mut response = Response::default();
        self.send_into(request, &mut response).await;
        response
    }

    /// Runs one exchange, building the response in place.
    async fn send_into(&self, mut request: Request, response: &mut Response) {
        if let Err(e) = self.exchange(&mut request, response).await {
            warn!(method = %request.method, target = %request.target, cause = %e, "exchange failed");
            let status = e.status();
            response.fail(status, e);
        }
    }

    /// Blocks the current thread until the exchange completes.
    ///
    /// There is no timeout here, the transport decides when to give up. Must not be called
    /// from within an async context.
    pub fn send_blocking(&self, request: Request) -> Response {
        futures::executor::block_on(self.send(request))
    }

    /// Starts the exchange on the tokio runtime and returns a receiver for its response.
    ///
    /// The receiver yields exactly one response, or `Canceled` if the runtime shut down
    /// before the exchange finished.
    pub fn dispatch(&self, request: Request) -> oneshot::Receiver<Response> {
        let (sender, receiver) = oneshot::channel();
        self.dispatch_with(request, move |response| {
            if sender.send(response).is_err() {
                debug!("response receiver dropped before completion");
            }
        });
        receiver
    }

    /// Starts the exchange on the tokio runtime and hands the response to `on_complete`.
    ///
    /// `on_complete` runs exactly once, on a runtime worker. A panic while building the response
    /// is reported as [`Status::CONNECTOR_ERROR_INTERNAL`], unless the status interpreted so far
    /// already reports an error.
    pub fn dispatch_with<F>(&self, request: Request, on_complete: F)
    where
        F: FnOnce(Response) + Send + 'static,
    {
        let adapter = self.clone();
        tokio::spawn(async move {
            let mut response = Response::default();
            let outcome = AssertUnwindSafe(adapter.send_into(request, &mut response)).catch_unwind().await;
            if outcome.is_err() {
                error!(status = %response.status, "panic while building the response");
                response.fail(Status::CONNECTOR_ERROR_INTERNAL, "panic while building the response");
            }
            on_complete(response);
        });
    }

    async fn exchange(&self, request: &mut Request, response: &mut Response) -> Result<(), AdapterError> {
        let headers = self.inner.composer.compose(request, &mut TracingSink);
        let entity = if request.is_entity_available() { request.entity.as_mut().and_then(Entity::take_body) } else { None };

        let transport_request =
            TransportRequest { method: request.method.clone(), target: request.target.clone(), headers, entity };
        let TransportResponse { status_line, headers, entity, server_address, server_port } =
            self.inner.transport.send(transport_request).await?;

        if !(100..=999).contains(&status_line.code) {
            return Err(AdapterError::invalid_status(format!("status code {} out of range", status_line.code)));
        }

        self.inner.interpreter.interpret_into(&status_line, &headers, response, &mut TracingSink);
        response.server_info.address = server_address;
        response.server_info.port = server_port;

        if let Some(body) = entity {
            response.entity.get_or_insert_with(Entity::new).set_body(body);
        }
        apply_entity_lifecycle(&request.method, response);

        // bodiless responses may declare the size of the resource they describe
        if let Some(entity) = response.entity.as_ref().filter(|entity| entity.is_available()) {
            let received = entity.body().and_then(EntityBody::exact_size);
            if let (Some(declared), Some(received)) = (entity.size, received)
                && declared != received
            {
                return Err(AdapterError::entity(format!("content length {declared} but {received} bytes received")));
            }
        }

        debug!(status = %response.status, entity = response.is_entity_available(), "exchange complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::{Method, Uri, Version};

    use super::*;
    use crate::client::transport::MockTransport;
    use crate::header::HeaderSeries;
    use crate::protocol::{EntityBody, StatusLine};

    fn reply(code: u16, headers: &[(&str, &str)]) -> TransportResponse {
        TransportResponse::new(StatusLine::new(Version::HTTP_11, code, None), headers.iter().copied().collect())
    }

    fn adapter(transport: MockTransport) -> ClientAdapter {
        ClientAdapter::builder().transport(transport).build().unwrap()
    }

    fn get() -> Request {
        Request::get(Uri::from_static("http://example.com:8080/items"))
    }

    #[test]
    fn builder_requires_transport() {
        assert!(matches!(ClientAdapter::builder().build(), Err(BuildError::MissingTransport)));
    }

    #[tokio::test]
    async fn sends_composed_headers_and_interprets_reply() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == Method::GET
                    && request.headers.first_value("Host") == Some("example.com:8080")
                    && request.headers.first_value("User-Agent") == Some("tests/1.0")
                    && request.entity.is_none()
            })
            .times(1)
            .returning(|_| {
                let mut reply = reply(200, &[("Content-Type", "text/plain"), ("Content-Length", "5"), ("Server", "fake")])
                    .with_entity(EntityBody::full("hello"));
                reply.server_address = Some("127.0.0.1".into());
                reply.server_port = Some(8080);
                Ok(reply)
            });

        let adapter = ClientAdapter::builder().transport(transport).user_agent(Some("tests/1.0")).build().unwrap();
        let mut response = adapter.send(get()).await;

        assert_eq!(response.status, Status::SUCCESS_OK);
        assert_eq!(response.server_info.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(response.server_info.port, Some(8080));
        assert_eq!(response.server_info.agent.as_deref(), Some("fake"));

        let entity = response.entity.as_mut().unwrap();
        assert_eq!(entity.media_type, Some(mime::TEXT_PLAIN));
        let bytes = entity.take_body().unwrap().into_bytes().await.unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn request_entity_is_handed_over() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.headers.first_value("Content-Length") == Some("2")
                    && request.entity.as_ref().and_then(EntityBody::exact_size) == Some(2)
            })
            .returning(|_| Ok(reply(201, &[])));

        let request = Request::new(Method::POST, Uri::from_static("http://example.com/items"))
            .with_entity(Entity::full(mime::APPLICATION_JSON, "{}"));
        let response = adapter(transport).send(request).await;
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn no_content_entity_is_released() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| Ok(reply(204, &[("Content-Length", "11")]).with_entity(EntityBody::full("placeholder"))));

        let response = adapter(transport).send(get()).await;
        assert_eq!(response.status, Status::SUCCESS_NO_CONTENT);
        assert!(response.entity.as_ref().unwrap().is_released());
        assert!(!response.is_entity_available());
    }

    #[tokio::test]
    async fn head_request_releases_entity() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| Ok(reply(200, &[]).with_entity(EntityBody::full("ignored"))));

        let request = Request::new(Method::HEAD, Uri::from_static("http://example.com/"));
        let response = adapter(transport).send(request).await;
        assert!(response.entity.unwrap().is_released());
    }

    #[tokio::test]
    async fn bodiless_replies_may_declare_a_length() {
        let cases = [(Method::HEAD, 200), (Method::GET, 304), (Method::GET, 204)];

        for (method, code) in cases {
            let mut transport = MockTransport::new();
            transport
                .expect_send()
                .returning(move |_| Ok(reply(code, &[("Content-Length", "1234")]).with_entity(EntityBody::full(""))));

            let request = Request::new(method.clone(), Uri::from_static("http://example.com/report"));
            let response = adapter(transport).send(request).await;

            assert_eq!(response.status, code, "{method} {code}");
            let entity = response.entity.as_ref().unwrap();
            assert_eq!(entity.size, Some(1234));
            assert!(entity.is_released());
        }
    }

    #[tokio::test]
    async fn transport_failures_become_connector_errors() {
        let cases: [(fn() -> TransportError, u16); 4] = [
            (|| TransportError::connection("refused"), 1000),
            (|| TransportError::Timeout, 1001),
            (|| std::io::Error::from(std::io::ErrorKind::ConnectionReset).into(), 1001),
            (|| TransportError::other("no route"), 1002),
        ];

        for (error, code) in cases {
            let mut transport = MockTransport::new();
            transport.expect_send().returning(move |_| Err(error()));

            let response = adapter(transport).send(get()).await;
            assert_eq!(response.status, code);
            assert!(response.status.is_error());
            assert!(response.status.description().is_some());
        }
    }

    #[tokio::test]
    async fn existing_error_status_is_kept() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(reply(500, &[("Content-Length", "100")]).with_entity(EntityBody::full("short"))));

        let response = adapter(transport).send(get()).await;
        assert_eq!(response.status, Status::SERVER_ERROR_INTERNAL);
    }

    #[tokio::test]
    async fn entity_mismatch_fails_successful_exchange() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(reply(200, &[("Content-Length", "100")]).with_entity(EntityBody::full("short"))));

        let response = adapter(transport).send(get()).await;
        assert_eq!(response.status, Status::CONNECTOR_ERROR_INTERNAL);
    }

    #[tokio::test]
    async fn invalid_status_code() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| Ok(reply(42, &[])));

        let response = adapter(transport).send(get()).await;
        assert_eq!(response.status, Status::CONNECTOR_ERROR_INTERNAL);
    }

    #[test]
    fn blocking_send() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| Ok(reply(304, &[("ETag", "\"v1\"")])));

        let response = adapter(transport).send_blocking(get());
        assert_eq!(response.status, Status::REDIRECTION_NOT_MODIFIED);
        assert!(response.entity.unwrap().tag.is_some());
    }

    #[tokio::test]
    async fn dispatch_delivers_once() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| Ok(reply(202, &[])));

        let response = adapter(transport).dispatch(get()).await.unwrap();
        assert_eq!(response.status, 202);
    }

    #[tokio::test]
    async fn dispatch_with_reports_failures() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| Err(TransportError::connection("refused")));

        let calls = Arc::new(Mutex::new(Vec::new()));
        let (done, finished) = oneshot::channel();
        let recorded = calls.clone();
        adapter(transport).dispatch_with(get(), move |response| {
            recorded.lock().unwrap().push(response.status.code());
            let _ = done.send(());
        });

        finished.await.unwrap();
        assert_eq!(*calls.lock().unwrap(), [1000]);
    }

    #[tokio::test]
    async fn dispatch_with_survives_panics() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| panic!("transport bug"));

        let (done, finished) = oneshot::channel();
        adapter(transport).dispatch_with(get(), move |response| {
            let _ = done.send(response.status.code());
        });
        assert_eq!(finished.await.unwrap(), 1002);
    }

    #[tokio::test]
    async fn dispatch_with_keeps_interpreted_error_status_on_panic() {
        fn explode(_: &str, _: &HeaderSeries, _: &mut Response) -> Result<(), crate::protocol::CodecError> {
            panic!("handler bug")
        }

        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| Ok(reply(503, &[("Retry-After", "120"), ("X-Boom", "1")])));

        let adapter = ClientAdapter::builder().transport(transport).header_handler("X-Boom", explode).build().unwrap();
        let (done, finished) = oneshot::channel();
        adapter.dispatch_with(get(), move |response| {
            let _ = done.send(response);
        });

        let response = finished.await.unwrap();
        assert_eq!(response.status, 503);
        assert!(response.retry_after.is_some());
    }

    #[tokio::test]
    async fn registered_header_handler_is_used() {
        fn request_id(value: &str, _: &HeaderSeries, response: &mut Response) -> Result<(), crate::protocol::CodecError> {
            response.server_info.agent = Some(format!("request {value}"));
            Ok(())
        }

        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| Ok(reply(200, &[("X-Request-Id", "7")])));

        let adapter = ClientAdapter::builder().transport(transport).header_handler("x-request-id", request_id).build().unwrap();
        let response = adapter.send(get()).await;
        assert_eq!(response.server_info.agent.as_deref(), Some("request 7"));
    }
}
