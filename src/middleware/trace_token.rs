//! Trace token middleware
//!
//! A request arriving with an `X-Trace-Token` of at least
//! [`MIN_TRACE_TOKEN_LEN`] characters keeps it. Anything shorter is replaced
//! by a fresh alphabetic token. Either way the token is echoed on the
//! response and exposed to handlers as a [`TraceToken`] extension.

use super::{BoxFuture, TRACE_TOKEN};
use crate::random::rand_alphabetic_string;
use http::{HeaderMap, HeaderValue, Request, Response};
use std::fmt;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Shorter incoming tokens are discarded
pub const MIN_TRACE_TOKEN_LEN: usize = 6;

/// Length of generated tokens
pub const GENERATED_TRACE_TOKEN_LEN: usize = 16;

/// The effective trace token of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceToken(pub String);

impl TraceToken {
    pub fn generate() -> Self {
        Self(rand_alphabetic_string(GENERATED_TRACE_TOKEN_LEN))
    }

    /// Token carried by `headers`, when long enough to keep
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(TRACE_TOKEN)
            .and_then(|value| value.to_str().ok())
            .filter(|token| token.len() >= MIN_TRACE_TOKEN_LEN)
            .map(|token| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TraceTokenLayer;

impl<S> Layer<S> for TraceTokenLayer {
    type Service = TraceTokenService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceTokenService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct TraceTokenService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TraceTokenService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let (token, value) = match TraceToken::from_headers(req.headers())
            .and_then(|token| HeaderValue::from_str(token.as_str()).ok().map(|v| (token, v)))
        {
            Some(found) => found,
            None => {
                let token = TraceToken::generate();
                // Generated tokens are plain ASCII letters
                let value = HeaderValue::from_str(token.as_str())
                    .unwrap_or_else(|_| HeaderValue::from_static(""));
                (token, value)
            }
        };

        req.headers_mut().insert(TRACE_TOKEN, value.clone());
        req.extensions_mut().insert(token);

        let fut = self.inner.call(req);
        Box::pin(async move {
            let mut response = fut.await?;
            response.headers_mut().insert(TRACE_TOKEN, value);
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    async fn echo_token(req: Request<()>) -> Result<Response<String>, Infallible> {
        let header = req
            .headers()
            .get(TRACE_TOKEN)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let extension = req
            .extensions()
            .get::<TraceToken>()
            .map(|t| t.0.clone())
            .unwrap_or_default();
        assert_eq!(header, extension);
        Ok(Response::new(header))
    }

    async fn call_with(token: Option<&str>) -> Response<String> {
        let mut builder = Request::builder().uri("http://test");
        if let Some(token) = token {
            builder = builder.header(TRACE_TOKEN, token);
        }
        TraceTokenLayer
            .layer(service_fn(echo_token))
            .oneshot(builder.body(()).unwrap())
            .await
            .unwrap()
    }

    fn response_token(response: &Response<String>) -> String {
        response
            .headers()
            .get(TRACE_TOKEN)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_generates_missing_token() {
        let response = call_with(None).await;

        let token = response_token(&response);
        assert_eq!(token.len(), GENERATED_TRACE_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphabetic()));
        assert_eq!(response.body(), &token);
    }

    #[tokio::test]
    async fn test_replaces_short_token() {
        let response = call_with(Some("ab")).await;

        let token = response_token(&response);
        assert_eq!(token.len(), GENERATED_TRACE_TOKEN_LEN);
        assert_ne!(token, "ab");
        assert_eq!(response.body(), &token);
    }

    #[tokio::test]
    async fn test_keeps_long_enough_token() {
        let response = call_with(Some("abcdefghij")).await;

        assert_eq!(response_token(&response), "abcdefghij");
        assert_eq!(response.body(), "abcdefghij");
    }

    #[tokio::test]
    async fn test_boundary_length_is_kept() {
        let response = call_with(Some("abcdef")).await;
        assert_eq!(response_token(&response), "abcdef");
    }
}
