//! Configuration for the Banter runtime.
//!
//! The schema lives in [`schema`]; [`loader`] layers defaults, a TOML file,
//! and `BANTER_*` environment variables.

mod loader;
mod schema;

pub use loader::{ConfigLoader, load_config};
pub use schema::{BanterConfig, ControlConfig, LogFormat, LogLevel, LogOutput, LoggingConfig};
