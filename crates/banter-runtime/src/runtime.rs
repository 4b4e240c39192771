//! Runtime orchestration.
//!
//! A [`Runtime`] owns one bot, optionally stands up the control server, and
//! runs until ctrl-c or an explicit shutdown.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use banter_runtime::Runtime;
//!
//! // Auto-loads banter.toml from the current directory.
//! let runtime = Runtime::new(bot);
//! runtime.run().await?;
//! ```

use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use banter_core::Bot;
use banter_transport::serve;

use crate::config::{BanterConfig, load_config};
use crate::control::BotControl;
use crate::error::RuntimeResult;
use crate::logging;

/// Orchestrates one bot and its control surface.
pub struct Runtime {
    config: BanterConfig,
    bot: Bot,
    shutdown: CancellationToken,
}

impl Runtime {
    /// Creates a runtime with automatic configuration loading.
    ///
    /// Searches the current directory for `banter.toml`, falling back to
    /// defaults (with a warning) when loading fails. Logging is initialized
    /// from the resulting configuration.
    pub fn new(bot: Bot) -> Self {
        let config = load_config().unwrap_or_else(|err| {
            warn!(error = %err, "failed to load config, using defaults");
            BanterConfig::default()
        });
        Self::from_config(bot, config)
    }

    /// Creates a runtime from a pre-loaded configuration.
    pub fn from_config(bot: Bot, config: BanterConfig) -> Self {
        logging::init_from_config(&config.logging);
        Self {
            config,
            bot,
            shutdown: CancellationToken::new(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BanterConfig {
        &self.config
    }

    /// Returns the bot this runtime owns.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Returns a token that stops [`run`](Self::run) when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs until ctrl-c or shutdown, serving the control surface if
    /// enabled.
    pub async fn run(&self) -> RuntimeResult<()> {
        let control = if self.config.control.enabled {
            let service = Arc::new(BotControl::new(self.bot.clone()));
            let handle = serve(
                &self.config.control.addr,
                &self.config.control.path,
                service,
            )
            .await?;
            Some(handle)
        } else {
            None
        };

        info!("runtime started");

        tokio::select! {
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("ctrl-c received, shutting down"),
                    Err(e) => error!(error = %e, "failed to listen for ctrl-c"),
                }
            }
            _ = self.shutdown.cancelled() => {
                info!("shutdown requested");
            }
        }

        if let Some(handle) = control {
            handle.shutdown();
        }
        Ok(())
    }
}
