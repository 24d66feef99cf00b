//! Request summary middleware
//!
//! Logs one `finished request` record per request once its response body has
//! been fully sent, or dropped early by the server. Status and size are taken
//! from what was actually sent; duration runs from the start of the call to
//! the end of the body.

use super::{BoxFuture, TraceToken, TRACE_TOKEN};
use crate::core::{Logger, RequestSummary, ResponseMetadata};
use axum::extract::ConnectInfo;
use bytes::Buf;
use http::{HeaderMap, Request, Response};
use http_body::{Body, Frame, SizeHint};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

#[derive(Clone)]
pub struct RequestLoggingLayer {
    logger: Arc<Logger>,
}

impl RequestLoggingLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for RequestLoggingLayer {
    type Service = RequestLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggingService {
            inner,
            logger: Arc::clone(&self.logger),
        }
    }
}

#[derive(Clone)]
pub struct RequestLoggingService<S> {
    inner: S,
    logger: Arc<Logger>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLoggingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
{
    type Response = Response<LoggingBody<ResBody>>;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();

        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();
        let request_token = req
            .extensions()
            .get::<TraceToken>()
            .map(|token| token.0.clone())
            .or_else(|| header_token(req.headers()));
        let summary = RequestSummary::from_request_parts(req.method(), req.uri(), req.headers())
            .with_remote_addr(remote_addr);

        let logger = Arc::clone(&self.logger);
        let fut = self.inner.call(req);

        Box::pin(async move {
            let response = fut.await?;

            let trace_token = request_token
                .or_else(|| header_token(response.headers()))
                .unwrap_or_default();
            let mut metadata = ResponseMetadata::new();
            metadata.record_status(response.status().as_u16());

            let pending = PendingSummary {
                logger,
                trace_token,
                summary,
                metadata,
                start,
            };
            Ok(response.map(|body| LoggingBody::new(body, pending)))
        })
    }
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TRACE_TOKEN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Summary waiting for its response body to finish
struct PendingSummary {
    logger: Arc<Logger>,
    trace_token: String,
    summary: RequestSummary,
    metadata: ResponseMetadata,
    start: Instant,
}

impl PendingSummary {
    fn emit(self) {
        let summary = self
            .summary
            .with_response(self.metadata)
            .with_duration(self.start.elapsed());
        self.logger.log_request_summary(&self.trace_token, &summary);
    }
}

/// Response body that counts the bytes it yields and logs the request
/// summary exactly once when it ends.
pub struct LoggingBody<B> {
    inner: B,
    pending: Option<PendingSummary>,
}

impl<B> LoggingBody<B> {
    fn new(inner: B, pending: PendingSummary) -> Self {
        Self {
            inner,
            pending: Some(pending),
        }
    }

    fn finish(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.emit();
        }
    }
}

impl<B> Body for LoggingBody<B>
where
    B: Body + Unpin,
{
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);

        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let (Some(data), Some(pending)) = (frame.data_ref(), this.pending.as_mut()) {
                    pending.metadata.record_write(data.remaining());
                }
            }
            Poll::Ready(Some(Err(_))) | Poll::Ready(None) => this.finish(),
            Poll::Pending => {}
        }

        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for LoggingBody<B> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggerConfig, FINISHED_REQUEST_MESSAGE};
    use crate::sinks::MemorySink;
    use http::StatusCode;
    use http_body_util::{BodyExt, Full};
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    fn logger() -> (Arc<Logger>, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::with_sink(LoggerConfig::new("v1", "proj", "svc"), sink.clone())
            .expect("valid config");
        (Arc::new(logger), sink)
    }

    async fn payment_required(
        _req: Request<()>,
    ) -> Result<Response<Full<bytes::Bytes>>, Infallible> {
        Ok(Response::builder()
            .status(StatusCode::PAYMENT_REQUIRED)
            .body(Full::new(bytes::Bytes::from_static(b"foo bar")))
            .unwrap())
    }

    #[tokio::test]
    async fn test_logs_after_body_completes() {
        let (logger, sink) = logger();
        let svc = RequestLoggingLayer::new(logger).layer(service_fn(payment_required));

        let request = Request::builder()
            .uri("http://testing/")
            .header(TRACE_TOKEN, "abcdefghij")
            .header("Authorization", "Bearer secret")
            .body(())
            .unwrap();
        let response = svc.oneshot(request).await.unwrap();
        assert!(sink.is_empty());

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"foo bar");

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["message"], FINISHED_REQUEST_MESSAGE);
        assert_eq!(record["X-Trace-Token"], "abcdefghij");
        assert_eq!(record["http_method"], "GET");
        assert_eq!(record["http_host"], "testing");
        assert_eq!(record["http_status"], 402);
        assert_eq!(record["http_size"], 7);
        assert!(record["http_duration"].as_f64().unwrap() >= 0.0);
        assert!(record["http_headers"].get("Authorization").is_none());
        assert!(record["http_headers"].get("X-Trace-Token").is_none());
        assert_eq!(record["http_headers"]["Authorization-Len"][0], "13");
    }

    #[tokio::test]
    async fn test_logs_once_when_body_dropped() {
        let (logger, sink) = logger();
        let svc = RequestLoggingLayer::new(logger).layer(service_fn(payment_required));

        let response = svc.oneshot(Request::new(())).await.unwrap();
        drop(response);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["http_status"], 402);
        assert_eq!(records[0]["http_size"], 0);
        assert_eq!(records[0]["X-Trace-Token"], "");
    }

    #[tokio::test]
    async fn test_token_falls_back_to_response_header() {
        let (logger, sink) = logger();
        let svc = RequestLoggingLayer::new(logger).layer(service_fn(|_req: Request<()>| async {
            let response = Response::builder()
                .header(TRACE_TOKEN, "fromresponse")
                .body(Full::new(bytes::Bytes::new()))
                .unwrap();
            Ok::<_, Infallible>(response)
        }));

        let response = svc.oneshot(Request::new(())).await.unwrap();
        response.into_body().collect().await.unwrap();

        assert_eq!(sink.records()[0]["X-Trace-Token"], "fromresponse");
        assert_eq!(sink.records()[0]["http_status"], 200);
    }
}
