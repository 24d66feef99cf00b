//! # Rust Service Logger
//!
//! Structured request logging, HTTP middleware and random-string helpers for
//! backend services.
//!
//! ## Features
//!
//! - **Structured Logs**: one JSON object per line with fixed service fields
//! - **Trace Tokens**: every record carries the request's `X-Trace-Token`
//! - **Source Links**: the `caller` field links to the logging line in source control
//! - **Header Redaction**: credentials are hashed before they reach a log
//! - **Middleware**: tower layers for trace tokens, default headers and request summaries
//!
//! ```
//! use rust_service_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::with_sink(
//!     LoggerConfig::new("v1.4.0", "billing", "invoices")
//!         .with_scm_link_template("https://github.com/acme/billing"),
//!     sink.clone(),
//! )
//! .unwrap();
//!
//! logger.info("aBcDeFgHiJkLmNoP", "invoice created");
//! assert_eq!(sink.records()[0]["message"], "invoice created");
//! ```

pub mod core;
pub mod macros;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod random;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        configure, FieldValue, FlushGuard, LogContext, LogLevel, Logger, LoggerConfig,
        LoggerError, RequestSummary, ResponseMetadata, Result, Sink, SinkTarget,
        TRACE_TOKEN_HEADER,
    };
    #[cfg(feature = "middleware")]
    pub use crate::middleware::{
        DefaultHeadersLayer, RequestLoggingLayer, TraceToken, TraceTokenLayer,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink};
}

pub use crate::core::{
    authorization_hash, authorization_hash_bytes, configure, global, header_fields, install,
    redact, redact_header_map, shutdown, try_configure, FieldValue, FlushGuard, HeaderFields, LogContext, LogLevel,
    LogRecord, Logger, LoggerConfig, LoggerError, LoggerMetrics, MetadataWriter, RequestSummary,
    ResponseMetadata, Result, Sink, SinkTarget, SourceLinkResolver, StaticFields,
    AUTHORIZATION_HASH_HEADER, AUTHORIZATION_HEADER, AUTHORIZATION_LEN_HEADER,
    DEFAULT_ENVIRONMENT, DEFAULT_REF, ENVIRONMENT_KEY, FINISHED_REQUEST_MESSAGE,
    TRACE_TOKEN_HEADER,
};
pub use random::{rand_alphabetic_string, rand_hex_string};
pub use sinks::{ConsoleSink, FileSink, MemorySink};
