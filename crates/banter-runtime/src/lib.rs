//! # Banter Runtime
//!
//! Orchestration layer for Banter bots: configuration loading, logging
//! setup, the control-surface adapter, and the run loop.
//!
//! ## Example
//!
//! ```rust,ignore
//! use banter_core::Bot;
//! use banter_runtime::Runtime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = Bot::new(MyBehavior);
//!     Runtime::new(bot).run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{BanterConfig, ConfigLoader, load_config};
pub use control::BotControl;
pub use error::{ConfigError, ConfigResult, RuntimeError, RuntimeResult};
pub use runtime::Runtime;
