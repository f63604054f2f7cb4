//! High-level A2A client for interacting with remote agents.
//!
//! Provides typed methods for every JSON-RPC method an A2A server exposes.

use serde::Serialize;

use crate::error::{A2AError, A2AResult};
use crate::types::{
    AgentCard, CancelTaskParams, GetTaskParams, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    Message, Part, Role, Task, TaskIdParams, TaskPushNotificationConfig, TaskSendParams,
};
use crate::utils::constants::DEFAULT_RPC_URL;

use super::card_resolver::CardResolver;
use super::sse::SseStream;
use super::transport::{JsonRpcTransport, Transport};

/// Client for interacting with A2A-compatible agents.
///
/// Provides typed methods for all seven A2A JSON-RPC methods:
/// `tasks/get`, `tasks/send`, `tasks/sendSubscribe`, `tasks/cancel`,
/// `tasks/pushNotification/set`, `tasks/pushNotification/get`,
/// `tasks/resubscribe`.
///
/// # Construction
///
/// ```no_run
/// use a2a_rs::client::A2AClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // From a base URL (resolves the agent card, discovers the endpoint):
/// let client = A2AClient::from_url("http://localhost:7420").await?;
///
/// // With a custom transport:
/// use a2a_rs::client::JsonRpcTransport;
/// let transport = JsonRpcTransport::new("http://localhost:7420/a2a");
/// let client = A2AClient::with_transport(Box::new(transport));
/// # Ok(())
/// # }
/// ```
pub struct A2AClient {
    transport: Box<dyn Transport>,
    agent_card: Option<AgentCard>,
}

impl std::fmt::Debug for A2AClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AClient")
            .field("agent_card", &self.agent_card)
            .finish_non_exhaustive()
    }
}

impl A2AClient {
    /// Create a client from a base URL.
    ///
    /// Resolves the agent card from `{url}/.well-known/agent.json`, then
    /// targets `{url}{card.url}` (or `{url}{DEFAULT_RPC_URL}` if the card's
    /// `url` is itself the base) for JSON-RPC calls.
    pub async fn from_url(url: &str) -> A2AResult<Self> {
        let resolver = CardResolver::new();
        let card = resolver.resolve(url).await?;
        Self::from_base_url_and_card(url, card)
    }

    /// Create a client from an already-resolved agent card and the base URL
    /// it was fetched from.
    pub fn from_base_url_and_card(base_url: &str, card: AgentCard) -> A2AResult<Self> {
        let endpoint = rpc_endpoint(base_url, &card);
        let transport = JsonRpcTransport::new(endpoint);
        Ok(Self {
            transport: Box::new(transport),
            agent_card: Some(card),
        })
    }

    /// Create a client with a custom transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            agent_card: None,
        }
    }

    /// Create a client with a custom transport and an already-resolved agent card.
    pub fn with_transport_and_card(transport: Box<dyn Transport>, card: AgentCard) -> Self {
        Self {
            transport,
            agent_card: Some(card),
        }
    }

    /// Create a client from a direct endpoint URL, skipping agent card resolution.
    pub fn from_endpoint(url: &str) -> Self {
        let transport = JsonRpcTransport::new(url);
        Self {
            transport: Box::new(transport),
            agent_card: None,
        }
    }

    // ──────────────────────────────────────────────────
    // Core A2A JSON-RPC methods
    // ──────────────────────────────────────────────────

    /// `tasks/get` — fetch the current state of a task.
    pub async fn get_task(&self, params: GetTaskParams) -> A2AResult<Task> {
        let request = build_request("tasks/get", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// `tasks/send` — run a task to completion (or its next terminal/`input-required`
    /// state) and return the resulting task.
    pub async fn send_task(&self, params: TaskSendParams) -> A2AResult<Task> {
        let request = build_request("tasks/send", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// `tasks/sendSubscribe` — start a task and stream its status/artifact
    /// events over SSE.
    pub async fn send_task_subscribe(&self, params: TaskSendParams) -> A2AResult<SseStream> {
        let request = build_request("tasks/sendSubscribe", &params)?;
        self.transport.send_stream(&request).await
    }

    /// `tasks/cancel` — attempt to cancel a running task.
    pub async fn cancel_task(&self, params: CancelTaskParams) -> A2AResult<Task> {
        let request = build_request("tasks/cancel", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// `tasks/pushNotification/set` — store a push notification config for a task.
    pub async fn set_task_push_notification(
        &self,
        params: TaskPushNotificationConfig,
    ) -> A2AResult<TaskPushNotificationConfig> {
        let request = build_request("tasks/pushNotification/set", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// `tasks/pushNotification/get` — retrieve a task's push notification config.
    pub async fn get_task_push_notification(
        &self,
        params: TaskIdParams,
    ) -> A2AResult<TaskPushNotificationConfig> {
        let request = build_request("tasks/pushNotification/get", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// `tasks/resubscribe` — reattach to an in-flight task's event stream.
    pub async fn resubscribe(&self, params: TaskIdParams) -> A2AResult<SseStream> {
        let request = build_request("tasks/resubscribe", &params)?;
        self.transport.send_stream(&request).await
    }

    /// Get the cached agent card, if one was resolved during construction.
    pub fn get_card(&self) -> A2AResult<&AgentCard> {
        self.agent_card.as_ref().ok_or_else(|| {
            A2AError::Transport(
                "no agent card available; use A2AClient::from_url() to auto-resolve".to_string(),
            )
        })
    }

    /// Close the client and release any held resources.
    pub async fn close(self) -> A2AResult<()> {
        self.transport.close().await
    }

    // ──────────────────────────────────────────────────
    // Convenience helpers
    // ──────────────────────────────────────────────────

    /// Convenience: send a text message in a new task, generating the task ID.
    pub async fn send_text(&self, text: &str) -> A2AResult<Task> {
        self.send_task(text_send_params(text, None)).await
    }

    /// Convenience: send a text message and stream the response.
    pub async fn send_text_stream(&self, text: &str) -> A2AResult<SseStream> {
        self.send_task_subscribe(text_send_params(text, None)).await
    }

    /// Convenience: continue an existing task with another text message.
    pub async fn send_text_in_task(&self, task_id: &str, session_id: &str, text: &str) -> A2AResult<Task> {
        self.send_task(TaskSendParams {
            id: task_id.to_string(),
            session_id: session_id.to_string(),
            message: create_text_message(Role::User, text),
            accepted_output_modes: None,
            push_notification: None,
            history_length: None,
            metadata: None,
        })
        .await
    }

    /// Convenience: get a task by ID with optional history length.
    pub async fn get_task_by_id(&self, task_id: &str, history_length: Option<i64>) -> A2AResult<Task> {
        self.get_task(GetTaskParams {
            id: task_id.to_string(),
            history_length,
        })
        .await
    }

    /// Convenience: cancel a task by ID.
    pub async fn cancel_task_by_id(&self, task_id: &str) -> A2AResult<Task> {
        self.cancel_task(CancelTaskParams { id: task_id.to_string() }).await
    }

    /// Convenience: resubscribe to a task by ID.
    pub async fn resubscribe_by_id(&self, task_id: &str) -> A2AResult<SseStream> {
        self.resubscribe(TaskIdParams { id: task_id.to_string() }).await
    }
}

// ──────────────────────────────────────────────────
// Internal helpers
// ──────────────────────────────────────────────────

/// Resolves the JSON-RPC endpoint URL to use for `card`, fetched from `base_url`.
///
/// `card.url` is the absolute endpoint per the wire format; if it happens to
/// equal the base URL (a minimal agent advertising only its origin), this
/// falls back to appending the well-known default RPC path.
fn rpc_endpoint(base_url: &str, card: &AgentCard) -> String {
    let trimmed_base = base_url.trim_end_matches('/');
    if card.url.trim_end_matches('/') == trimmed_base {
        format!("{trimmed_base}{DEFAULT_RPC_URL}")
    } else {
        card.url.clone()
    }
}

fn build_request(method: &str, params: &impl Serialize) -> A2AResult<JsonRpcRequest> {
    let params_value = serde_json::to_value(params)
        .map_err(|e| A2AError::Transport(format!("failed to serialize request params: {e}")))?;

    Ok(JsonRpcRequest::new(
        JsonRpcId::String(uuid::Uuid::new_v4().to_string()),
        method.to_string(),
        Some(params_value),
    ))
}

/// Parse the `result` field from a JSON-RPC response into the expected type.
fn parse_result<T: serde::de::DeserializeOwned>(response: JsonRpcResponse) -> A2AResult<T> {
    if let Some(error) = response.error {
        return Err(A2AError::JsonRpc {
            code: error.code,
            message: error.message,
            data: error.data,
        });
    }

    let result = response.result.ok_or_else(|| {
        A2AError::InvalidJson("JSON-RPC response has neither 'result' nor 'error'".to_string())
    })?;

    serde_json::from_value(result)
        .map_err(|e| A2AError::InvalidJson(format!("failed to deserialize response result: {e}")))
}

fn text_send_params(text: &str, session_id: Option<&str>) -> TaskSendParams {
    TaskSendParams {
        id: uuid::Uuid::new_v4().to_string(),
        session_id: session_id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        message: create_text_message(Role::User, text),
        accepted_output_modes: None,
        push_notification: None,
        history_length: None,
        metadata: None,
    }
}

/// Create a [`Message`] containing a single text part.
///
/// # Example
///
/// ```
/// use a2a_rs::client::create_text_message;
/// use a2a_rs::types::Role;
///
/// let msg = create_text_message(Role::User, "Hello, agent!");
/// assert_eq!(msg.role, Role::User);
/// assert_eq!(msg.parts.len(), 1);
/// ```
pub fn create_text_message(role: Role, content: &str) -> Message {
    Message {
        role,
        parts: vec![Part::text(content)],
        metadata: None,
    }
}
