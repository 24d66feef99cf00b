//! Sink trait for log output destinations

use super::error::Result;

/// Destination of serialized log lines.
///
/// The logger serializes each call before taking its sink lock, so a sink
/// receives exactly one complete line per `write_line` call and never
/// interleaves two records.
pub trait Sink: Send {
    /// Write one line; `line` carries no trailing newline.
    fn write_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
