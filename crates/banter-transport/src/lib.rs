//! # Banter Transport
//!
//! The HTTP control surface for Banter bots.
//!
//! A bot exposes a fixed set of operations (routing a message, dispatching
//! an action, checkpoint/restore, state inspection) through a single POST
//! endpoint. The wire protocol is `{"method", "args"}` in,
//! `{"data"}` / `{"error": true, "meta"}` out; see [`control`] for the
//! envelope details and [`server::serve`] for the axum server.
//!
//! ## Example
//!
//! ```rust,ignore
//! use banter_transport::{serve, ControlService};
//! use std::sync::Arc;
//!
//! let service: Arc<dyn ControlService> = Arc::new(my_adapter);
//! let handle = serve("127.0.0.1:8321", "/control", service).await?;
//! // ...
//! handle.shutdown();
//! ```

pub mod control;
pub mod error;
pub mod server;

pub use control::{ControlRequest, ControlService, error_body, route_call, success_body};
pub use error::{ControlError, ControlResult, TransportError, TransportResult};
pub use server::{ControlHandle, serve};
