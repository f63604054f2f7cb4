//! Agent executor — the trait implementers provide to run their own agent logic.
//!
//! The framework builds a [`RequestContext`] from an incoming `tasks/send` or
//! `tasks/sendSubscribe` request and hands it, along with a [`Publisher`]
//! to publish events on, to the configured [`AgentExecutor`]. The executor owns
//! all actual agent behavior; the framework never inspects task content.

use async_trait::async_trait;

use crate::error::A2AResult;
use crate::server::subscriber_registry::Publisher;
use crate::types::{Message, Task};

/// Execution context passed to an [`AgentExecutor`] for a single task request.
///
/// Built directly from the incoming `TaskSendParams` and the task's current
/// store state; it carries no extension-negotiation or multi-task
/// bookkeeping beyond what a single task invocation needs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The task this request concerns.
    pub task_id: String,
    /// The session this task belongs to.
    pub session_id: String,
    /// The message sent with this request, if any (absent on a bare
    /// `tasks/cancel` or `tasks/pushNotification/*` call).
    pub message: Option<Message>,
    /// The task's current state as loaded from the store immediately before
    /// the executor runs, if it already existed.
    pub task: Option<Task>,
    /// Caller-supplied request metadata, copied from `TaskSendParams.metadata`.
    pub metadata: Option<serde_json::Value>,
}

impl RequestContext {
    /// Extracts and joins all text parts of `message` with `delimiter`.
    ///
    /// Returns an empty string if there is no message.
    pub fn get_user_input(&self, delimiter: &str) -> String {
        self.message
            .as_ref()
            .map(|m| crate::utils::get_message_text(m, delimiter))
            .unwrap_or_default()
    }
}

/// Implement this trait to provide your own agent's behavior.
///
/// `execute` is invoked for `tasks/send` and `tasks/sendSubscribe`; `cancel`
/// is invoked for `tasks/cancel`. An executor drives a task to a terminal
/// state (or `input-required`) by publishing [`crate::types::StreamResponse`]
/// events through the given [`Publisher`]; the framework turns the first
/// terminal event into a synchronous response, or streams every event over
/// SSE, depending on which method was called.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Run the agent against `context`, publishing progress and results on `publisher`.
    async fn execute(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()>;

    /// Attempt to cancel an in-flight task.
    ///
    /// The reference Task Manager never calls this — `tasks/cancel` always
    /// responds with `TaskNotCancelable` before an executor is consulted —
    /// but the trait keeps the hook so a real agent has somewhere to put
    /// cancellation cleanup if it chooses to call it directly.
    async fn cancel(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()>;
}
