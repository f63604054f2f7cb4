//! Task updater — an ergonomic wrapper around [`Publisher`] for executors.
//!
//! An [`AgentExecutor`](crate::server::AgentExecutor) can publish raw
//! [`StreamResponse`] values directly through its `Publisher`, but most
//! executors only ever need a handful of shapes: move to `working`, ask for
//! more input, finish, fail, emit an artifact. `TaskUpdater` builds those
//! events and enforces that nothing is published once the task has already
//! reached a terminal state.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use crate::error::{A2AError, A2AResult};
use crate::server::subscriber_registry::Publisher;
use crate::types::{
    Artifact, Message, Part, StreamResponse, TaskArtifactUpdateEvent, TaskState, TaskStatus,
    TaskStatusUpdateEvent,
};

/// Publishes status and artifact updates for a single task, refusing
/// anything after the first terminal status.
pub struct TaskUpdater {
    publisher: Publisher,
    task_id: String,
    session_id: String,
    terminal: AtomicBool,
}

impl TaskUpdater {
    /// Builds an updater bound to one task.
    pub fn new(publisher: Publisher, task_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            publisher,
            task_id: task_id.into(),
            session_id: session_id.into(),
            terminal: AtomicBool::new(false),
        }
    }

    /// The task this updater publishes for.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Builds an agent-authored [`Message`] carrying a single text part.
    pub fn new_agent_message(&self, text: impl Into<String>) -> Message {
        Message::agent(text)
    }

    fn publish_status(&self, state: TaskState, message: Option<Message>, r#final: bool) -> A2AResult<()> {
        if self.terminal.load(Ordering::SeqCst) {
            return Err(A2AError::internal_error(format!(
                "task {} already reached a terminal state; no further updates are accepted",
                self.task_id
            )));
        }
        if state.is_terminal() {
            self.terminal.store(true, Ordering::SeqCst);
        }

        let mut status = TaskStatus::new(state);
        status.message = message;
        status.timestamp = Some(Utc::now().to_rfc3339());

        self.publisher
            .publish(StreamResponse::StatusUpdate(TaskStatusUpdateEvent {
                task_id: self.task_id.clone(),
                status,
                r#final,
            }));
        Ok(())
    }

    /// Moves the task to `working`, optionally with an agent message.
    pub fn start_work(&self, message: Option<Message>) -> A2AResult<()> {
        self.publish_status(TaskState::Working, message, false)
    }

    /// Moves the task to `input-required`. Not terminal — the caller can
    /// still transition it further once input arrives.
    pub fn requires_input(&self, message: Option<Message>) -> A2AResult<()> {
        self.publish_status(TaskState::InputRequired, message, false)
    }

    /// Marks the task `completed`. Terminal — no further updates accepted.
    pub fn complete(&self, message: Option<Message>) -> A2AResult<()> {
        self.publish_status(TaskState::Completed, message, true)
    }

    /// Marks the task `failed`. Terminal — no further updates accepted.
    pub fn fail(&self, message: Option<Message>) -> A2AResult<()> {
        self.publish_status(TaskState::Failed, message, true)
    }

    /// Marks the task `canceled`. Terminal — no further updates accepted.
    pub fn cancel(&self, message: Option<Message>) -> A2AResult<()> {
        self.publish_status(TaskState::Canceled, message, true)
    }

    /// Publishes an artifact chunk at `index`.
    pub fn add_artifact(
        &self,
        index: u32,
        parts: Vec<Part>,
        name: Option<String>,
        append: Option<bool>,
        last_chunk: Option<bool>,
    ) -> A2AResult<()> {
        if self.terminal.load(Ordering::SeqCst) {
            return Err(A2AError::internal_error(format!(
                "task {} already reached a terminal state; no further updates are accepted",
                self.task_id
            )));
        }

        self.publisher
            .publish(StreamResponse::ArtifactUpdate(TaskArtifactUpdateEvent {
                task_id: self.task_id.clone(),
                artifact: Artifact {
                    name,
                    description: None,
                    parts,
                    index,
                    append,
                    last_chunk,
                    metadata: None,
                },
            }));
        Ok(())
    }

    /// Whether a terminal status has already been published.
    pub fn is_terminal(&self) -> bool {
        self.terminal.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::subscriber_registry::{SubscriberRegistry, TaskEvent};
    use std::sync::Arc;

    fn updater_with_queue() -> (TaskUpdater, crate::server::subscriber_registry::SubscriberQueue) {
        let registry = Arc::new(SubscriberRegistry::new());
        let queue = registry.subscribe("t-1");
        let publisher = registry.publisher("t-1");
        (TaskUpdater::new(publisher, "t-1", "s-1"), queue)
    }

    #[tokio::test]
    async fn start_work_then_complete_publishes_in_order() {
        let (updater, mut queue) = updater_with_queue();
        updater.start_work(None).unwrap();
        updater.complete(Some(updater.new_agent_message("done"))).unwrap();

        let first = queue.recv().await.unwrap();
        assert!(!first.is_final());
        let second = queue.recv().await.unwrap();
        assert!(second.is_final());
    }

    #[tokio::test]
    async fn publishing_after_terminal_state_fails() {
        let (updater, _queue) = updater_with_queue();
        updater.complete(None).unwrap();
        let result = updater.start_work(None);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn add_artifact_after_terminal_fails() {
        let (updater, _queue) = updater_with_queue();
        updater.fail(None).unwrap();
        let result = updater.add_artifact(0, vec![Part::text("x")], None, None, None);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn artifact_event_carries_given_index() {
        let (updater, mut queue) = updater_with_queue();
        updater
            .add_artifact(3, vec![Part::text("chunk")], Some("result".to_string()), None, None)
            .unwrap();

        match queue.recv().await.unwrap() {
            TaskEvent::Update(StreamResponse::ArtifactUpdate(event)) => {
                assert_eq!(event.artifact.index, 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
