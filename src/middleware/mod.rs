//! Tower middleware for HTTP services
//!
//! - [`TraceTokenLayer`]: ensures every request carries an `X-Trace-Token`
//! - [`DefaultHeadersLayer`]: JSON content type and permissive CORS headers
//! - [`RequestLoggingLayer`]: one `finished request` record per response
//!
//! Apply the trace token layer outside the logging layer so the summary sees
//! the token:
//!
//! ```no_run
//! use rust_service_logger::prelude::*;
//! use std::sync::Arc;
//! use tower::ServiceBuilder;
//!
//! let logger = configure(LoggerConfig::new("v1", "proj", "svc"));
//! let layers = ServiceBuilder::new()
//!     .layer(TraceTokenLayer)
//!     .layer(RequestLoggingLayer::new(Arc::clone(&logger)))
//!     .layer(DefaultHeadersLayer);
//! # let _ = layers;
//! ```

pub mod default_headers;
pub mod request_logging;
pub mod trace_token;

pub use default_headers::{DefaultHeadersLayer, DefaultHeadersService, JSON_CONTENT_TYPE};
pub use request_logging::{LoggingBody, RequestLoggingLayer, RequestLoggingService};
pub use trace_token::{
    TraceToken, TraceTokenLayer, TraceTokenService, GENERATED_TRACE_TOKEN_LEN,
    MIN_TRACE_TOKEN_LEN,
};

use http::HeaderName;
use std::future::Future;
use std::pin::Pin;

/// `X-Trace-Token` as a typed header name
pub const TRACE_TOKEN: HeaderName = HeaderName::from_static("x-trace-token");

/// Future type shared by the services in this module
pub type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;
