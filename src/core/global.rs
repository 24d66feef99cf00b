//! Process-wide logger handle
//!
//! [`configure`] runs once at startup, before request handlers are spawned,
//! and returns the `Arc<Logger>` that should be passed to them. Calling it
//! again replaces the installed logger; handles already given out keep the
//! logger they were created with.

use super::config::LoggerConfig;
use super::error::Result;
use super::logger::Logger;
use parking_lot::{const_rwlock, RwLock};
use std::sync::Arc;

static GLOBAL_LOGGER: RwLock<Option<Arc<Logger>>> = const_rwlock(None);

/// Build the logger and install it process-wide.
///
/// A configuration that cannot produce a sink is unrecoverable: the error is
/// printed on stderr and the process exits with status 1.
pub fn configure(config: LoggerConfig) -> Arc<Logger> {
    match try_configure(config) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("failed to initialize logger: {}", e);
            std::process::exit(1);
        }
    }
}

/// Like [`configure`] but returns the error instead of exiting
pub fn try_configure(config: LoggerConfig) -> Result<Arc<Logger>> {
    let logger = Logger::new(config)?;
    Ok(install(logger))
}

/// Install an already built logger, e.g. one with a custom sink
pub fn install(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    *GLOBAL_LOGGER.write() = Some(Arc::clone(&logger));
    logger
}

/// The installed logger, if [`configure`] has run
pub fn global() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER.read().clone()
}

/// Flush the installed logger, if any
pub fn shutdown() -> Result<()> {
    match global() {
        Some(logger) => logger.flush(),
        None => Ok(()),
    }
}
