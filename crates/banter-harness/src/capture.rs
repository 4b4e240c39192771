//! Capturing delivery.
//!
//! A [`Delivery`] implementation that records every outbound message
//! instead of sending it, plus the assertion helpers tests lean on.

use async_trait::async_trait;
use parking_lot::Mutex;
use regex::Regex;

use banter_core::{Delivery, DeliveryResult, Message};

use crate::error::{HarnessError, HarnessResult};

/// Records outbound messages for later assertions.
#[derive(Debug, Default)]
pub struct CapturingDelivery {
    sent: Mutex<Vec<Message>>,
}

#[async_trait]
impl Delivery for CapturingDelivery {
    async fn send_message(&self, message: Message) -> DeliveryResult<()> {
        self.sent.lock().push(message);
        Ok(())
    }
}

impl CapturingDelivery {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every captured message, oldest first.
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().clone()
    }

    /// Returns the most recently captured message.
    pub fn last(&self) -> Option<Message> {
        self.sent.lock().last().cloned()
    }

    /// Discards everything captured so far.
    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    /// Asserts the most recent message equals `expected`.
    pub fn expect_last(&self, expected: &Message) -> HarnessResult<()> {
        let last = self.last().ok_or(HarnessError::NoMessage)?;
        if &last == expected {
            Ok(())
        } else {
            Err(HarnessError::MatchFailed {
                expected: format!("{expected:?}"),
                actual: format!("{last:?}"),
            })
        }
    }

    /// Asserts some captured message's content matches `pattern`, returning
    /// the first that does.
    pub fn expect_content(&self, pattern: &Regex) -> HarnessResult<Message> {
        let sent = self.sent.lock();
        if sent.is_empty() {
            return Err(HarnessError::NoMessage);
        }
        sent.iter()
            .find(|message| pattern.is_match(&message.content))
            .cloned()
            .ok_or_else(|| HarnessError::MatchFailed {
                expected: pattern.as_str().to_string(),
                actual: sent
                    .iter()
                    .map(|message| message.content.as_str())
                    .collect::<Vec<_>>()
                    .join(" | "),
            })
    }
}
