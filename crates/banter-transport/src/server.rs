//! Control server implementation.
//!
//! One axum endpoint accepting control POSTs. All failures (wrong HTTP
//! method, malformed body, unknown method, service errors) come back as
//! the JSON error envelope with status 500; the listener itself never goes
//! down over a bad request.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::control::{ControlRequest, ControlService, error_body, route_call, success_body};
use crate::error::{ControlError, TransportError, TransportResult};

/// A handle to a running control server.
///
/// Dropping the handle leaves the server running; call
/// [`shutdown`](Self::shutdown) to stop it.
pub struct ControlHandle {
    addr: std::net::SocketAddr,
    shutdown: oneshot::Sender<()>,
}

impl ControlHandle {
    /// The address the server actually bound.
    pub fn addr(&self) -> std::net::SocketAddr {
        self.addr
    }

    /// Stops the server.
    pub fn shutdown(self) {
        let _ = self.shutdown.send(());
    }
}

struct ServerState {
    service: Arc<dyn ControlService>,
}

/// Binds `addr` and serves the control surface at `path`.
pub async fn serve(
    addr: &str,
    path: &str,
    service: Arc<dyn ControlService>,
) -> TransportResult<ControlHandle> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let state = Arc::new(ServerState { service });
    let router = Router::new()
        .route(&path, any(control_entry))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    let actual_addr = listener.local_addr()?;

    info!(addr = %actual_addr, path = %path, "control server listening");

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        let server = axum::serve(listener, router);
        tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!(error = %e, "control server error");
                }
            }
            _ = &mut shutdown_rx => {
                info!("control server shutting down");
            }
        }
    });

    Ok(ControlHandle {
        addr: actual_addr,
        shutdown: shutdown_tx,
    })
}

/// Entry point for every request hitting the control path.
async fn control_entry(
    State(state): State<Arc<ServerState>>,
    method: Method,
    body: Bytes,
) -> Response {
    match handle_request(&state, method, &body).await {
        Ok(data) => (StatusCode::OK, Json(success_body(data))).into_response(),
        Err(err) => {
            debug!(error = %err, "control call failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error_body(&err))).into_response()
        }
    }
}

/// Validates the HTTP shape and routes the call.
async fn handle_request(
    state: &ServerState,
    method: Method,
    body: &[u8],
) -> Result<serde_json::Value, ControlError> {
    if method != Method::POST {
        return Err(ControlError::MethodNotAllowed {
            http_method: method.to_string(),
        });
    }

    let request: ControlRequest =
        serde_json::from_slice(body).map_err(|err| ControlError::Malformed(err.to_string()))?;

    route_call(state.service.as_ref(), request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use banter_core::{Action, Message};
    use parking_lot::Mutex;
    use serde_json::{Value, json};

    use crate::error::ControlResult;

    #[derive(Default)]
    struct Spy {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ControlService for Spy {
        async fn handle_message(&self, _message: Message) -> ControlResult<Value> {
            self.calls.lock().push("handle_message".into());
            Ok(Value::Null)
        }

        async fn dispatch(&self, action: Action) -> ControlResult<Value> {
            self.calls.lock().push(format!("dispatch:{}", action.kind));
            Ok(Value::Null)
        }

        async fn push_state(&self) -> ControlResult<Value> {
            Ok(Value::Null)
        }

        async fn pop_state(&self) -> ControlResult<Value> {
            Ok(Value::Null)
        }

        async fn state(&self) -> ControlResult<Value> {
            Ok(json!({"n": 1}))
        }
    }

    fn server_state() -> (ServerState, Arc<Spy>) {
        let spy = Arc::new(Spy::default());
        (
            ServerState {
                service: spy.clone(),
            },
            spy,
        )
    }

    #[tokio::test]
    async fn post_round_trips_through_the_service() {
        let (state, _spy) = server_state();

        let data = handle_request(
            &state,
            Method::POST,
            br#"{"method": "state", "args": []}"#,
        )
        .await
        .unwrap();

        assert_eq!(data, json!({"n": 1}));
    }

    #[tokio::test]
    async fn non_post_is_rejected_before_routing() {
        let (state, spy) = server_state();

        let err = handle_request(&state, Method::GET, b"{}").await.unwrap_err();

        assert!(matches!(err, ControlError::MethodNotAllowed { .. }));
        assert!(spy.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn malformed_bodies_are_rejected_before_routing() {
        let (state, spy) = server_state();

        let err = handle_request(&state, Method::POST, b"not json")
            .await
            .unwrap_err();

        assert!(matches!(err, ControlError::Malformed(_)));
        assert!(spy.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn unknown_method_yields_the_error_envelope() {
        let (state, spy) = server_state();

        let err = handle_request(
            &state,
            Method::POST,
            br#"{"method": "unknownFn", "args": []}"#,
        )
        .await
        .unwrap_err();

        let envelope = error_body(&err);
        assert_eq!(envelope["error"], json!(true));
        assert!(
            envelope["meta"]["message"]
                .as_str()
                .unwrap()
                .contains("unknownFn")
        );
        assert!(spy.calls.lock().is_empty());
    }
}
