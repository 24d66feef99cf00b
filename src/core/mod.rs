//! Core logger types and traits

pub mod config;
pub mod error;
pub mod global;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod redact;
pub mod request_summary;
pub mod response_metadata;
pub mod sink;
pub mod source_link;

pub use config::{LoggerConfig, SinkTarget, DEFAULT_ENVIRONMENT, ENVIRONMENT_KEY};
pub use error::{LoggerError, Result};
pub use global::{configure, global, install, shutdown, try_configure};
pub use log_context::{FieldValue, LogContext};
pub use log_level::LogLevel;
pub use log_record::{LogRecord, StaticFields};
pub use logger::{FlushGuard, Logger};
pub use metrics::LoggerMetrics;
pub use redact::{
    authorization_hash, authorization_hash_bytes, header_fields, redact, redact_header_map,
    HeaderFields, AUTHORIZATION_HASH_HEADER, AUTHORIZATION_HEADER, AUTHORIZATION_LEN_HEADER,
    TRACE_TOKEN_HEADER,
};
pub use request_summary::{RequestSummary, FINISHED_REQUEST_MESSAGE};
pub use response_metadata::{MetadataWriter, ResponseMetadata};
pub use sink::Sink;
pub use source_link::{SourceLinkResolver, DEFAULT_REF};
