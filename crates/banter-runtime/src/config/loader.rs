//! Configuration loader using figment.
//!
//! Sources are layered, later overriding earlier:
//!
//! 1. Built-in defaults
//! 2. `banter.toml` (or an explicitly named file)
//! 3. Environment variables (`BANTER_*`, with `__` as the section
//!    separator: `BANTER_LOGGING__LEVEL=debug` sets `logging.level`)
//!
//! # Example
//!
//! ```rust,ignore
//! use banter_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().with_current_dir().load()?;
//! let config = ConfigLoader::new().file("config/banter.toml").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::debug;

use super::schema::BanterConfig;
use crate::error::{ConfigError, ConfigResult};

/// The default config file name searched in the current directory.
const DEFAULT_FILE: &str = "banter.toml";

/// Layered configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    search_current_dir: bool,
}

impl ConfigLoader {
    /// Creates a loader with no file source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads from an explicit file; missing files are an error.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Searches the current directory for `banter.toml`; missing is fine.
    pub fn with_current_dir(mut self) -> Self {
        self.search_current_dir = true;
        self
    }

    /// Extracts the configuration from the layered sources.
    pub fn load(&self) -> ConfigResult<BanterConfig> {
        let mut figment = Figment::from(Serialized::defaults(BanterConfig::default()));

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        } else if self.search_current_dir && Path::new(DEFAULT_FILE).exists() {
            debug!(path = DEFAULT_FILE, "loading config file");
            figment = figment.merge(Toml::file(DEFAULT_FILE));
        }

        figment = figment.merge(Env::prefixed("BANTER_").split("__"));

        Ok(figment.extract()?)
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<BanterConfig> {
    ConfigLoader::new().with_current_dir().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, LogLevel};

    #[test]
    fn defaults_load_without_any_sources() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.control.enabled);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ConfigLoader::new()
            .file("/definitely/not/here/banter.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn toml_overrides_the_defaults() {
        let config: BanterConfig =
            Figment::from(Serialized::defaults(BanterConfig::default()))
                .merge(Toml::string(
                    r#"
                    debug = true

                    [logging]
                    level = "debug"
                    format = "pretty"

                    [control]
                    enabled = false
                    addr = "0.0.0.0:9000"
                    "#,
                ))
                .extract()
                .unwrap();

        assert!(config.debug);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.control.enabled);
        assert_eq!(config.control.addr, "0.0.0.0:9000");
    }
}
