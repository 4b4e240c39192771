//! Delivery collaborator boundary.
//!
//! The core runtime never talks to a chat service directly; it hands
//! outbound messages to a [`Delivery`] implementation. Concrete transports
//! live outside the core: the harness crate ships a capturing one, and a
//! bot built without any transport gets [`NullDelivery`].

use async_trait::async_trait;

use crate::error::DeliveryResult;
use crate::message::Message;

/// Sends concrete chat messages on behalf of a bot.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Delivers one outbound message.
    async fn send_message(&self, message: Message) -> DeliveryResult<()>;
}

/// A delivery that silently drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDelivery;

#[async_trait]
impl Delivery for NullDelivery {
    async fn send_message(&self, _message: Message) -> DeliveryResult<()> {
        Ok(())
    }
}
