//! # Banter Harness
//!
//! Test tooling for Banter bots: a delivery that captures outbound messages
//! instead of sending them, diff-friendly assertion helpers, and a
//! checkpoint guard for speculative runs.
//!
//! ## Example
//!
//! ```rust,ignore
//! use banter_harness::BotHarness;
//! use regex::Regex;
//!
//! let harness = BotHarness::new(MyBehavior);
//! harness.say("@bot plan http://teamwork.com/x", "sam").await?;
//! harness.delivery().expect_content(&Regex::new("planning")?)?;
//! ```

pub mod capture;
pub mod error;
pub mod harness;

pub use capture::CapturingDelivery;
pub use error::{HarnessError, HarnessResult};
pub use harness::{BotHarness, Checkpoint};
