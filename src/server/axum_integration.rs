//! Axum integration — ready-made HTTP routes for A2A servers.
//!
//! [`a2a_router`] builds an axum `Router` exposing:
//! - `GET /.well-known/agent.json` — agent card discovery
//! - `POST {endpoint}` — JSON-RPC 2.0 dispatch for all seven methods,
//!   responding with plain JSON for unary methods and an SSE stream for
//!   `tasks/sendSubscribe`/`tasks/resubscribe`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use futures::StreamExt;
use tracing::{debug, error};

use crate::server::request_handler::{dispatch, stream_responses, DispatchOutcome};
use crate::server::task_manager::TaskManager;
use crate::types::{AgentCard, JsonRpcRequest, JsonRpcResponse};
use crate::utils::constants::AGENT_CARD_WELL_KNOWN_PATH;

struct AppState {
    task_manager: Arc<dyn TaskManager>,
    agent_card: AgentCard,
}

/// Builds an axum `Router` serving the agent card and dispatching JSON-RPC
/// requests to `task_manager` at `endpoint`.
pub fn a2a_router(task_manager: Arc<dyn TaskManager>, agent_card: AgentCard, endpoint: &str) -> Router {
    let state = Arc::new(AppState {
        task_manager,
        agent_card,
    });

    Router::new()
        .route(AGENT_CARD_WELL_KNOWN_PATH, get(handle_agent_card))
        .route(endpoint, post(handle_rpc))
        .with_state(state)
}

async fn handle_agent_card(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(&state.agent_card)
}

async fn handle_rpc(State(state): State<Arc<AppState>>, body: axum::body::Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let reply = JsonRpcResponse::from_a2a_error(
                None,
                crate::error::A2AError::parse_error(err.to_string()),
            );
            return (axum::http::StatusCode::BAD_REQUEST, Json(reply)).into_response();
        }
    };

    debug!(method = %request.method, "dispatching JSON-RPC request");
    let id = request.id.clone();

    match dispatch(state.task_manager.as_ref(), request).await {
        DispatchOutcome::Reply(reply) => {
            let status = if reply.error.is_some() {
                axum::http::StatusCode::BAD_REQUEST
            } else {
                axum::http::StatusCode::OK
            };
            (status, Json(reply)).into_response()
        }
        DispatchOutcome::Stream(queue) => {
            let stream = stream_responses(id, queue).map(|response| {
                let data = serde_json::to_string(&response).unwrap_or_else(|err| {
                    error!(error = %err, "failed to serialize SSE event");
                    "{}".to_string()
                });
                Ok::<_, std::convert::Infallible>(Event::default().data(data))
            });
            Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
        }
    }
}
