//! Default response headers
//!
//! Marks responses as JSON and allows cross-origin calls. Headers the handler
//! already set are left alone.

use super::BoxFuture;
use http::{header, HeaderName, HeaderValue, Request, Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const DEFAULT_HEADERS: [(HeaderName, &str); 4] = [
    (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET,POST,PUT,DELETE"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Authorization"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeadersLayer;

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeadersService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct DefaultHeadersService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DefaultHeadersService<S>
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

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let fut = self.inner.call(req);
        Box::pin(async move {
            let mut response = fut.await?;
            let headers = response.headers_mut();
            for (name, value) in DEFAULT_HEADERS {
                if !headers.contains_key(&name) {
                    headers.insert(name, HeaderValue::from_static(value));
                }
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    #[tokio::test]
    async fn test_sets_defaults() {
        let svc = DefaultHeadersLayer
            .layer(service_fn(|_req: Request<()>| async {
                Ok::<_, Infallible>(Response::new(()))
            }));
        let response = svc.oneshot(Request::new(())).await.unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET,POST,PUT,DELETE"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Authorization");
    }

    #[tokio::test]
    async fn test_handler_headers_win() {
        let svc = DefaultHeadersLayer.layer(service_fn(|_req: Request<()>| async {
            let response = Response::builder()
                .header(header::CONTENT_TYPE, "text/plain")
                .body(())
                .unwrap();
            Ok::<_, Infallible>(response)
        }));
        let response = svc.oneshot(Request::new(())).await.unwrap();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
