//! Response metadata capture
//!
//! `ResponseMetadata` accumulates the status and body size of a response as
//! it is written. [`MetadataWriter`] applies it to any `std::io::Write`; the
//! HTTP middleware applies it to response body frames.

use std::io::{self, Write};

/// Status and size of a completed response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Last status written; 0 until one is recorded
    pub status: u16,
    /// Total body bytes written
    pub size: u64,
}

impl ResponseMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a header write. Later writes overwrite earlier ones.
    pub fn record_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Record `bytes` written to the body
    pub fn record_write(&mut self, bytes: usize) {
        self.size += bytes as u64;
    }
}

/// Wraps a writer and records what passes through it.
///
/// Only bytes the inner writer reports as written are counted.
#[derive(Debug)]
pub struct MetadataWriter<W> {
    inner: W,
    metadata: ResponseMetadata,
}

impl<W: Write> MetadataWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            metadata: ResponseMetadata::new(),
        }
    }

    /// Start from a status the inner writer already applies by default
    pub fn with_default_status(inner: W, status: u16) -> Self {
        let mut writer = Self::new(inner);
        writer.metadata.record_status(status);
        writer
    }

    pub fn write_header(&mut self, status: u16) {
        self.metadata.record_status(status);
    }

    pub fn metadata(&self) -> ResponseMetadata {
        self.metadata
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_parts(self) -> (W, ResponseMetadata) {
        (self.inner, self.metadata)
    }
}

impl<W: Write> Write for MetadataWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.metadata.record_write(written);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
