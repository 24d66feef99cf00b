//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their message like `format!` and forward to the
//! matching [`Logger`](crate::Logger) method. The `caller` field still
//! reports the line of the macro invocation.
//!
//! # Examples
//!
//! ```
//! use rust_service_logger::prelude::*;
//! use rust_service_logger::info;
//!
//! let logger = Logger::with_sink(LoggerConfig::new("v1", "proj", "svc"), MemorySink::new()).unwrap();
//! let token = "aBcDeFgHiJkLmNoP";
//!
//! info!(logger, token, "Server started");
//!
//! let port = 8080;
//! info!(logger, token, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// ```
/// # use rust_service_logger::prelude::*;
/// # let logger = Logger::with_sink(LoggerConfig::new("v1", "proj", "svc"), MemorySink::new()).unwrap();
/// use rust_service_logger::log;
/// log!(logger, LogLevel::Info, "token", "Simple message");
/// log!(logger, LogLevel::Error, "token", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $token:expr, $($arg:tt)+) => {
        $logger.log($level, $token, format!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $token:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $token, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $token:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $token, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $token:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $token, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $token:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $token, $($arg)+)
    };
}

/// Log a fatal-level message. Does not exit the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $token:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $token, $($arg)+)
    };
}
