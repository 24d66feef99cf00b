//! Main logger implementation

use super::{
    config::{LoggerConfig, SinkTarget},
    error::Result,
    log_context::LogContext,
    log_level::LogLevel,
    log_record::{LogRecord, StaticFields},
    metrics::LoggerMetrics,
    request_summary::{RequestSummary, FINISHED_REQUEST_MESSAGE},
    sink::Sink,
    source_link::SourceLinkResolver,
};
use crate::sinks::{ConsoleSink, FileSink};
use chrono::Utc;
use parking_lot::Mutex;
use std::panic::Location;
use std::sync::Arc;

/// Stands in for the checkout directory in front of `file!()` paths
const SOURCE_ROOT_MARKER: &str = "root";

/// Structured JSON logger.
///
/// Every record carries the process-wide fields from [`LoggerConfig`], the
/// caller's trace token and a `caller` link computed from the call site.
/// Logging methods are `#[track_caller]`, so the reported location is the
/// line that called them, including through the crate's macros.
///
/// All state except the sink is read-only after construction. The sink sits
/// behind a mutex held only for the single write of an already serialized
/// line.
pub struct Logger {
    min_level: LogLevel,
    statics: StaticFields,
    resolver: SourceLinkResolver,
    sink: Mutex<Box<dyn Sink>>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Validate `config` and open the sink it names
    pub fn new(config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        let sink: Box<dyn Sink> = match &config.output {
            SinkTarget::Stdout => Box::new(ConsoleSink::stdout()),
            SinkTarget::Stderr => Box::new(ConsoleSink::stderr()),
            SinkTarget::File(path) => Box::new(FileSink::new(path)?),
        };
        Ok(Self::from_parts(config, sink))
    }

    /// Like [`Logger::new`] but writing to `sink`; `config.output` is ignored
    pub fn with_sink<S: Sink + 'static>(config: LoggerConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, Box::new(sink)))
    }

    fn from_parts(config: LoggerConfig, sink: Box<dyn Sink>) -> Self {
        let environment = config.environment();
        let resolver = SourceLinkResolver::new(
            config.scm_link_template.trim_end_matches('/'),
            config.version.as_str(),
        );

        Self {
            min_level: config.min_level,
            statics: StaticFields {
                project: config.project,
                service: config.service,
                service_label: config.service_label,
                version: config.version,
                environment,
            },
            resolver,
            sink: Mutex::new(sink),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.is_enabled_for(self.min_level)
    }

    pub fn environment(&self) -> &str {
        &self.statics.environment
    }

    pub fn static_fields(&self) -> &StaticFields {
        &self.statics
    }

    pub fn resolver(&self) -> &SourceLinkResolver {
        &self.resolver
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, trace_token: &str, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.emit(level, trace_token, message.into(), &LogContext::new(), Location::caller());
    }

    /// Log with call-specific extra fields
    #[track_caller]
    pub fn log_with_fields(
        &self,
        level: LogLevel,
        trace_token: &str,
        message: impl Into<String>,
        fields: LogContext,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        self.emit(level, trace_token, message.into(), &fields, Location::caller());
    }

    /// Emit the `finished request` record for a completed request
    #[track_caller]
    pub fn log_request_summary(&self, trace_token: &str, summary: &RequestSummary) {
        if !self.is_enabled(LogLevel::Info) {
            return;
        }
        self.emit(
            LogLevel::Info,
            trace_token,
            FINISHED_REQUEST_MESSAGE.to_string(),
            &summary.to_fields(),
            Location::caller(),
        );
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, trace_token: &str, message: impl Into<String>) {
        self.log(LogLevel::Debug, trace_token, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, trace_token: &str, message: impl Into<String>) {
        self.log(LogLevel::Info, trace_token, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, trace_token: &str, message: impl Into<String>) {
        self.log(LogLevel::Warn, trace_token, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, trace_token: &str, message: impl Into<String>) {
        self.log(LogLevel::Error, trace_token, message);
    }

    /// Logs at the highest level. The process keeps running.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, trace_token: &str, message: impl Into<String>) {
        self.log(LogLevel::Fatal, trace_token, message);
    }

    /// `caller` value for a call site.
    ///
    /// Rust reports paths relative to the package root, so a fixed
    /// single-segment marker is prepended for the resolver to strip.
    pub fn caller_link(&self, file: &str, line: u32) -> String {
        let path = file.replace('\\', "/");
        self.resolver
            .resolve(&format!("{}/{}", SOURCE_ROOT_MARKER, path), line)
    }

    fn emit(
        &self,
        level: LogLevel,
        trace_token: &str,
        message: String,
        fields: &LogContext,
        location: &Location<'_>,
    ) {
        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            message,
            trace_token,
            caller: self.caller_link(location.file(), location.line()),
            statics: &self.statics,
            fields,
        };

        match record.to_json() {
            Ok(line) => self.write_line(&line),
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to serialize record: {}", e);
                self.metrics.record_failed();
            }
        }
    }

    /// Hand one line to the sink with panic isolation. Failures are reported
    /// on stderr and counted, never returned to the caller.
    fn write_line(&self, line: &str) {
        let mut sink = self.sink.lock();
        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.write_line(line)));

        match result {
            Ok(Ok(())) => {
                self.metrics.record_written();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                self.metrics.record_failed();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked: {}. The record was dropped.",
                    sink.name(),
                    panic_msg
                );
                self.metrics.record_failed();
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }

    /// Guard that flushes this logger when dropped. Hold it in `main` so
    /// buffered lines are written before the process exits.
    #[must_use = "the logger is flushed when the guard is dropped"]
    pub fn flush_guard(self: &Arc<Self>) -> FlushGuard {
        FlushGuard {
            logger: Arc::clone(self),
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let failed = self.metrics.write_failures();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed writes (failure rate: {:.2}%)",
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Flushes the logger's sink on drop
pub struct FlushGuard {
    logger: Arc<Logger>,
}

impl FlushGuard {
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}
