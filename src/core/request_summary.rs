//! Summary of one completed HTTP request

use super::log_context::LogContext;
use super::redact::{redact_header_map, HeaderFields};
use super::response_metadata::ResponseMetadata;
use http::{header, HeaderMap, Method, Uri};
use std::time::Duration;
use url::form_urlencoded;

/// Message of every request summary record
pub const FINISHED_REQUEST_MESSAGE: &str = "finished request";

/// Everything logged about a request once its response is complete.
///
/// Headers are redacted on construction; an unredacted collection is never
/// stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSummary {
    pub method: String,
    pub host: String,
    pub path: String,
    pub query: String,
    pub remote_addr: String,
    pub headers: HeaderFields,
    pub duration: Duration,
    pub status: u16,
    pub size: u64,
}

impl RequestSummary {
    /// Capture the request side. Response fields start empty.
    pub fn from_request_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|authority| authority.to_string()))
            .unwrap_or_default();

        Self {
            method: method.as_str().to_string(),
            host,
            path: uri.to_string(),
            query: normalized_query(uri.query()),
            remote_addr: String::new(),
            headers: redact_header_map(headers),
            duration: Duration::ZERO,
            status: 0,
            size: 0,
        }
    }

    #[must_use]
    pub fn with_remote_addr(mut self, remote_addr: impl Into<String>) -> Self {
        self.remote_addr = remote_addr.into();
        self
    }

    #[must_use]
    pub fn with_response(mut self, metadata: ResponseMetadata) -> Self {
        self.status = metadata.status;
        self.size = metadata.size;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Extra fields of the summary record, in wire order
    pub fn to_fields(&self) -> LogContext {
        LogContext::new()
            .with_field("http_method", self.method.as_str())
            .with_field("http_host", self.host.as_str())
            .with_field("http_path", self.path.as_str())
            .with_field("http_query", self.query.as_str())
            .with_field("http_remote", self.remote_addr.as_str())
            .with_field("http_headers", self.headers.clone())
            .with_field("http_duration", self.duration.as_secs_f64())
            .with_field("http_status", self.status)
            .with_field("http_size", self.size)
    }
}

/// Decode and re-encode a query string with keys sorted. Values of a repeated
/// key keep their order.
pub fn normalized_query(query: Option<&str>) -> String {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return String::new();
    };

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
