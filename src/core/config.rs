//! Logger configuration
//!
//! A `LoggerConfig` is assembled once at startup and handed to
//! [`Logger::new`](super::Logger::new) or [`configure`](super::configure).
//! Nothing in it can change afterwards.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use std::path::PathBuf;

/// Environment variable naming the runtime environment
pub const ENVIRONMENT_KEY: &str = "APP_ENV";

/// Environment reported when [`ENVIRONMENT_KEY`] is unset or empty
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Where serialized lines are written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SinkTarget {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Build version; also the ref used in source links
    pub version: String,
    pub project: String,
    pub service: String,
    /// Optional human-readable service name, written as `service_label`
    pub service_label: String,
    /// Repository base URL, e.g. `https://github.com/org/repo`. Empty
    /// disables source links.
    pub scm_link_template: String,
    pub min_level: LogLevel,
    /// Variable the environment tag is read from
    pub environment_key: String,
    pub output: SinkTarget,
}

impl LoggerConfig {
    pub fn new(
        version: impl Into<String>,
        project: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            project: project.into(),
            service: service.into(),
            ..Self::default()
        }
    }

    /// Logger that only lets fatal records through
    pub fn quiet() -> Self {
        Self::new("version", "project", "service").with_min_level(LogLevel::Fatal)
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_service_label(mut self, label: impl Into<String>) -> Self {
        self.service_label = label.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_scm_link_template(mut self, template: impl Into<String>) -> Self {
        self.scm_link_template = template.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_environment_key(mut self, key: impl Into<String>) -> Self {
        self.environment_key = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_output(mut self, output: SinkTarget) -> Self {
        self.output = output;
        self
    }

    /// Check the configuration before any sink is opened
    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "project must not be empty"));
        }
        if self.service.trim().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "service must not be empty"));
        }
        if self.environment_key.trim().is_empty() {
            return Err(LoggerError::config(
                "LoggerConfig",
                "environment key must not be empty",
            ));
        }
        if self.scm_link_template.chars().any(char::is_whitespace) {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("invalid scm link template '{}'", self.scm_link_template),
            ));
        }
        if let SinkTarget::File(path) = &self.output {
            if path.as_os_str().is_empty() {
                return Err(LoggerError::config("SinkTarget", "file path must not be empty"));
            }
        }
        Ok(())
    }

    /// Current value of the environment tag
    pub fn environment(&self) -> String {
        std::env::var(&self.environment_key)
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            version: String::new(),
            project: String::new(),
            service: String::new(),
            service_label: String::new(),
            scm_link_template: String::new(),
            min_level: LogLevel::Debug,
            environment_key: ENVIRONMENT_KEY.to_string(),
            output: SinkTarget::Stdout,
        }
    }
}
