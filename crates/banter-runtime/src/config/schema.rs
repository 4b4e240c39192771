//! Configuration schema definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BanterConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Control-surface settings.
    #[serde(default)]
    pub control: ControlConfig,

    /// Whether rule-routing traces default to on.
    #[serde(default)]
    pub debug: bool,
}

/// Log verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug-level detail.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Something looks off.
    Warn,
    /// Something failed.
    Error,
}

impl LogLevel {
    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }

    /// The lowercase directive form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, terse.
    #[default]
    Compact,
    /// The default `tracing-subscriber` layout.
    Full,
    /// Multi-line, human-oriented.
    Pretty,
}

/// Log output destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Write to standard output.
    #[default]
    Stdout,
    /// Write to standard error.
    Stderr,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Per-module level overrides, e.g. `"banter_core" = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

/// Control-surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Whether the control server starts with the runtime.
    #[serde(default = "default_control_enabled")]
    pub enabled: bool,

    /// Bind address.
    #[serde(default = "default_control_addr")]
    pub addr: String,

    /// Endpoint path.
    #[serde(default = "default_control_path")]
    pub path: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: default_control_enabled(),
            addr: default_control_addr(),
            path: default_control_path(),
        }
    }
}

fn default_control_enabled() -> bool {
    true
}

fn default_control_addr() -> String {
    "127.0.0.1:8321".to_string()
}

fn default_control_path() -> String {
    "/control".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_missing_sections() {
        let config: BanterConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.control.enabled);
        assert_eq!(config.control.addr, "127.0.0.1:8321");
        assert!(!config.debug);
    }

    #[test]
    fn levels_round_trip_through_serde() {
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
        assert_eq!(level.as_str(), "debug");
    }
}
