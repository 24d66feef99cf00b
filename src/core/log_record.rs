//! One serialized log line

use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::redact::TRACE_TOKEN_HEADER;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Keys written by every record. Extra fields may not shadow them.
pub const RESERVED_KEYS: [&str; 10] = [
    "level",
    "time",
    "caller",
    "message",
    "project",
    "service",
    "service_label",
    "version",
    "environment",
    TRACE_TOKEN_HEADER,
];

/// Prefix given to an extra field whose name collides with a reserved key.
/// The renamed field is dropped when the record already has a field under
/// that name.
pub const SHADOWED_FIELD_PREFIX: &str = "extra_";

/// Process-wide fields stamped onto every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFields {
    pub project: String,
    pub service: String,
    pub service_label: String,
    pub version: String,
    pub environment: String,
}

/// A structured record, built fresh for each emitted log call
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub trace_token: &'a str,
    pub caller: String,
    pub statics: &'a StaticFields,
    pub fields: &'a LogContext,
}

impl LogRecord<'_> {
    /// Serialize as a single JSON line, without the trailing newline
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for LogRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("level", &self.level)?;
        map.serialize_entry(
            "time",
            &self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        map.serialize_entry("caller", &self.caller)?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("project", &self.statics.project)?;
        map.serialize_entry("service", &self.statics.service)?;
        if !self.statics.service_label.is_empty() {
            map.serialize_entry("service_label", &self.statics.service_label)?;
        }
        map.serialize_entry("version", &self.statics.version)?;
        map.serialize_entry("environment", &self.statics.environment)?;
        map.serialize_entry(TRACE_TOKEN_HEADER, self.trace_token)?;

        for (key, value) in self.fields.iter() {
            if RESERVED_KEYS.contains(&key) {
                let renamed = format!("{}{}", SHADOWED_FIELD_PREFIX, key);
                // A field set under the renamed key itself takes precedence.
                if self.fields.get(&renamed).is_none() {
                    map.serialize_entry(&renamed, value)?;
                }
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}
