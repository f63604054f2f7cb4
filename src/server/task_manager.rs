//! Task manager — the seven RPC operations, independent of any transport.
//!
//! [`TaskManager`] is what [`crate::server::request_handler`] dispatches
//! into. [`InMemoryTaskManager`] is the reference implementation: it owns a
//! [`TaskStore`], a [`SubscriberRegistry`], and the [`AgentExecutor`] that
//! actually runs agent logic, and wires the three together for the two
//! methods that start work (`tasks/send`, `tasks/sendSubscribe`).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::error::{A2AError, A2AResult};
use crate::server::agent_executor::{AgentExecutor, RequestContext};
use crate::server::subscriber_registry::{SubscriberQueue, SubscriberRegistry, TaskEvent};
use crate::server::task_store::TaskStore;
use crate::types::{
    Artifact, GetTaskParams, PushNotificationConfig, StreamResponse, Task, TaskIdParams,
    TaskPushNotificationConfig, TaskSendParams,
};

/// The seven JSON-RPC operations an A2A server supports, transport-agnostic.
///
/// `on_send_task` and `on_send_task_subscribe` are the only two that involve
/// an [`AgentExecutor`]; the rest are pure task-store/registry bookkeeping.
#[async_trait]
pub trait TaskManager: Send + Sync {
    /// `tasks/get` — fetch a task, with history truncated per `history_length`.
    async fn on_get_task(&self, params: GetTaskParams) -> A2AResult<Task>;

    /// `tasks/send` — run the task to completion and return the final task.
    async fn on_send_task(&self, params: TaskSendParams) -> A2AResult<Task>;

    /// `tasks/sendSubscribe` — start the task and return a queue of every
    /// event it produces, ending with the terminal one.
    async fn on_send_task_subscribe(&self, params: TaskSendParams) -> A2AResult<SubscriberQueue>;

    /// `tasks/cancel` — attempt to cancel a task.
    async fn on_cancel_task(&self, params: TaskIdParams) -> A2AResult<Task>;

    /// `tasks/pushNotification/set` — store a push notification config.
    async fn on_set_task_push_notification(
        &self,
        params: TaskPushNotificationConfig,
    ) -> A2AResult<TaskPushNotificationConfig>;

    /// `tasks/pushNotification/get` — retrieve a previously stored config.
    async fn on_get_task_push_notification(
        &self,
        params: TaskIdParams,
    ) -> A2AResult<TaskPushNotificationConfig>;

    /// `tasks/resubscribe` — reattach to an in-flight task's event stream.
    async fn on_resubscribe_to_task(&self, params: TaskIdParams) -> A2AResult<SubscriberQueue>;
}

/// Applies one [`StreamResponse`] to the store, returning the task as it
/// stands afterward.
async fn apply_event(store: &dyn TaskStore, task_id: &str, event: &StreamResponse) -> A2AResult<Task> {
    match event {
        StreamResponse::StatusUpdate(update) => {
            store.update(task_id, update.status.clone(), None).await
        }
        StreamResponse::ArtifactUpdate(update) => {
            let current = store
                .get(task_id)
                .await?
                .ok_or_else(|| A2AError::task_not_found(task_id.to_string()))?;
            // An artifact event doesn't carry a status of its own; reuse the
            // stored one but drop its message, or `TaskStore::update` would
            // re-append that same status message to history on every chunk.
            let mut status = current.status.clone();
            status.message = None;
            let artifacts: Vec<Artifact> = vec![update.artifact.clone()];
            store.update(task_id, status, Some(artifacts)).await
        }
    }
}

/// How the executor task ended, captured by [`persist_until_final`] when it
/// wins the race against the event queue, so the caller can still log it.
enum ExecOutcome {
    Completed(Result<A2AResult<()>, tokio::task::JoinError>),
    Pending,
}

/// Drains `queue`, applying every event to `store`, until a final event
/// arrives, the queue closes, or `exec_handle` completes. Used both to
/// record the outcome of a `tasks/send` call before returning it, and to
/// persist the events a `tasks/sendSubscribe` executor produces in the
/// background.
///
/// A well-behaved executor always publishes a terminal event before
/// returning, but nothing enforces that — one that returns early (an error,
/// or simply forgetting to mark its last update `final`) would otherwise
/// leave this loop parked on `queue.recv()` forever, since the queue's own
/// sender lives in the registry until `detach` and a `Publisher` holds no
/// sender of its own to drop. Racing `exec_handle` via `select!` bounds the
/// wait by the executor's own lifetime instead.
async fn persist_until_final(
    store: &dyn TaskStore,
    task_id: &str,
    mut queue: SubscriberQueue,
    exec_handle: &mut tokio::task::JoinHandle<A2AResult<()>>,
) -> A2AResult<(Option<Task>, ExecOutcome)> {
    let mut last = None;
    loop {
        tokio::select! {
            event = queue.recv() => {
                match event {
                    Some(TaskEvent::Update(event)) => {
                        let is_final = event.is_final();
                        last = Some(apply_event(store, task_id, &event).await?);
                        if is_final {
                            queue.detach();
                            return Ok((last, ExecOutcome::Pending));
                        }
                    }
                    Some(TaskEvent::Error(err)) => {
                        queue.detach();
                        return Err(A2AError::Other(err.message));
                    }
                    None => {
                        queue.detach();
                        return Ok((last, ExecOutcome::Pending));
                    }
                }
            }
            result = &mut *exec_handle => {
                // The executor finished without us observing a final event.
                // Drain whatever it published right before exiting so a
                // last-moment event isn't lost to the race.
                while let Some(event) = queue.try_recv() {
                    match event {
                        TaskEvent::Update(update) => {
                            let is_final = update.is_final();
                            last = Some(apply_event(store, task_id, &update).await?);
                            if is_final {
                                break;
                            }
                        }
                        TaskEvent::Error(err) => {
                            queue.detach();
                            return Err(A2AError::Other(err.message));
                        }
                    }
                }
                queue.detach();
                return Ok((last, ExecOutcome::Completed(result)));
            }
        }
    }
}

/// Resolves `outcome` to the executor's actual result, joining `exec_handle`
/// if [`persist_until_final`] returned before it completed.
async fn resolve_exec_outcome(
    outcome: ExecOutcome,
    exec_handle: tokio::task::JoinHandle<A2AResult<()>>,
) -> Result<A2AResult<()>, tokio::task::JoinError> {
    match outcome {
        ExecOutcome::Completed(result) => result,
        ExecOutcome::Pending => exec_handle.await,
    }
}

/// Reference [`TaskManager`] backed by in-process state.
///
/// `tasks/cancel` always fails with [`A2AError::TaskNotCancelable`] and
/// `tasks/resubscribe` always fails with [`A2AError::UnsupportedOperation`] —
/// this implementation has no notion of interrupting a running executor or
/// replaying history to a reattaching subscriber, and says so rather than
/// pretending otherwise.
pub struct InMemoryTaskManager<E: AgentExecutor> {
    store: Arc<dyn TaskStore>,
    registry: Arc<SubscriberRegistry>,
    executor: Arc<E>,
    push_configs: Mutex<HashMap<String, PushNotificationConfig>>,
}

impl<E: AgentExecutor> InMemoryTaskManager<E> {
    /// Builds a task manager around the given store and executor, with a
    /// fresh subscriber registry.
    pub fn new(store: Arc<dyn TaskStore>, executor: Arc<E>) -> Self {
        Self {
            store,
            registry: Arc::new(SubscriberRegistry::new()),
            executor,
            push_configs: Mutex::new(HashMap::new()),
        }
    }

    fn context_for(&self, task: &Task, params: &TaskSendParams) -> RequestContext {
        RequestContext {
            task_id: task.id.clone(),
            session_id: task.session_id.clone(),
            message: Some(params.message.clone()),
            task: Some(task.clone()),
            metadata: params.metadata.clone(),
        }
    }
}

#[async_trait]
impl<E: AgentExecutor + 'static> TaskManager for InMemoryTaskManager<E> {
    async fn on_get_task(&self, params: GetTaskParams) -> A2AResult<Task> {
        let task = self
            .store
            .get(&params.id)
            .await?
            .ok_or_else(|| A2AError::task_not_found(params.id.clone()))?;
        Ok(self.store.history_view(&task, params.history_length))
    }

    async fn on_send_task(&self, params: TaskSendParams) -> A2AResult<Task> {
        let task = self.store.upsert(&params).await?;
        if let Some(config) = params.push_notification.clone() {
            self.push_configs
                .lock()
                .await
                .insert(task.id.clone(), config);
        }

        let queue = self.registry.subscribe(&task.id);
        let publisher = self.registry.publisher(task.id.clone());
        let context = self.context_for(&task, &params);
        let executor = Arc::clone(&self.executor);

        let mut exec_handle = tokio::spawn(async move { executor.execute(context, publisher).await });

        let (final_task, outcome) =
            persist_until_final(self.store.as_ref(), &task.id, queue, &mut exec_handle).await?;

        match resolve_exec_outcome(outcome, exec_handle).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!(task_id = %task.id, error = %err, "agent executor returned an error"),
            Err(join_err) => error!(task_id = %task.id, error = %join_err, "agent executor task panicked"),
        }

        Ok(final_task.unwrap_or(task))
    }

    async fn on_send_task_subscribe(&self, params: TaskSendParams) -> A2AResult<SubscriberQueue> {
        let task = self.store.upsert(&params).await?;
        if let Some(config) = params.push_notification.clone() {
            self.push_configs
                .lock()
                .await
                .insert(task.id.clone(), config);
        }

        // Both queues subscribe before the executor starts, so neither one
        // can miss an event the other sees.
        let external_queue = self.registry.subscribe(&task.id);
        let persist_queue = self.registry.subscribe(&task.id);
        let publisher = self.registry.publisher(task.id.clone());
        let context = self.context_for(&task, &params);
        let executor = Arc::clone(&self.executor);
        let store = Arc::clone(&self.store);
        let task_id = task.id.clone();

        tokio::spawn(async move {
            let mut exec_handle = tokio::spawn(async move { executor.execute(context, publisher).await });

            let outcome = match persist_until_final(store.as_ref(), &task_id, persist_queue, &mut exec_handle).await {
                Ok((_, outcome)) => outcome,
                Err(err) => {
                    warn!(task_id = %task_id, error = %err, "failed to persist task stream events");
                    return;
                }
            };

            match resolve_exec_outcome(outcome, exec_handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(task_id = %task_id, error = %err, "agent executor returned an error"),
                Err(join_err) => warn!(task_id = %task_id, error = %join_err, "agent executor task panicked"),
            }
        });

        Ok(external_queue)
    }

    async fn on_cancel_task(&self, params: TaskIdParams) -> A2AResult<Task> {
        self.store
            .get(&params.id)
            .await?
            .ok_or_else(|| A2AError::task_not_found(params.id.clone()))?;
        Err(A2AError::task_not_cancelable(params.id))
    }

    async fn on_set_task_push_notification(
        &self,
        params: TaskPushNotificationConfig,
    ) -> A2AResult<TaskPushNotificationConfig> {
        self.store
            .get(&params.id)
            .await?
            .ok_or_else(|| A2AError::internal_error(format!("unknown task: {}", params.id)))?;

        self.push_configs
            .lock()
            .await
            .insert(params.id.clone(), params.push_notification_config.clone());
        Ok(params)
    }

    async fn on_get_task_push_notification(
        &self,
        params: TaskIdParams,
    ) -> A2AResult<TaskPushNotificationConfig> {
        self.store
            .get(&params.id)
            .await?
            .ok_or_else(|| A2AError::internal_error(format!("unknown task: {}", params.id)))?;

        let config = self
            .push_configs
            .lock()
            .await
            .get(&params.id)
            .cloned()
            .ok_or_else(|| {
                A2AError::internal_error(format!(
                    "no push notification config set for task: {}",
                    params.id
                ))
            })?;

        Ok(TaskPushNotificationConfig {
            id: params.id,
            push_notification_config: config,
        })
    }

    async fn on_resubscribe_to_task(&self, params: TaskIdParams) -> A2AResult<SubscriberQueue> {
        Err(A2AError::unsupported_operation(format!(
            "tasks/resubscribe is not supported (task: {})",
            params.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::task_store::InMemoryTaskStore;
    use crate::types::{Message, Part, Role, TaskState, TaskStatus};

    struct EchoExecutor;

    /// An executor that finishes `Ok(())` without ever publishing a `final`
    /// event — the pathological case `persist_until_final` must not hang on.
    struct SilentExecutor;

    #[async_trait]
    impl AgentExecutor for SilentExecutor {
        async fn execute(
            &self,
            context: RequestContext,
            publisher: crate::server::subscriber_registry::Publisher,
        ) -> A2AResult<()> {
            publisher.publish(StreamResponse::StatusUpdate(crate::types::TaskStatusUpdateEvent {
                task_id: context.task_id,
                status: TaskStatus::new(TaskState::Working),
                r#final: false,
            }));
            Ok(())
        }

        async fn cancel(
            &self,
            _context: RequestContext,
            _publisher: crate::server::subscriber_registry::Publisher,
        ) -> A2AResult<()> {
            Ok(())
        }
    }

    /// An executor that returns an error without publishing anything at all.
    struct FailingExecutor;

    #[async_trait]
    impl AgentExecutor for FailingExecutor {
        async fn execute(
            &self,
            _context: RequestContext,
            _publisher: crate::server::subscriber_registry::Publisher,
        ) -> A2AResult<()> {
            Err(A2AError::internal_error("boom"))
        }

        async fn cancel(
            &self,
            _context: RequestContext,
            _publisher: crate::server::subscriber_registry::Publisher,
        ) -> A2AResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl AgentExecutor for EchoExecutor {
        async fn execute(
            &self,
            context: RequestContext,
            publisher: crate::server::subscriber_registry::Publisher,
        ) -> A2AResult<()> {
            publisher.publish(StreamResponse::StatusUpdate(crate::types::TaskStatusUpdateEvent {
                task_id: context.task_id.clone(),
                status: TaskStatus::new(TaskState::Working),
                r#final: false,
            }));
            publisher.publish(StreamResponse::StatusUpdate(crate::types::TaskStatusUpdateEvent {
                task_id: context.task_id,
                status: TaskStatus::new(TaskState::Completed),
                r#final: true,
            }));
            Ok(())
        }

        async fn cancel(
            &self,
            _context: RequestContext,
            _publisher: crate::server::subscriber_registry::Publisher,
        ) -> A2AResult<()> {
            Ok(())
        }
    }

    fn send_params(id: &str, text: &str) -> TaskSendParams {
        TaskSendParams {
            id: id.to_string(),
            session_id: "session-1".to_string(),
            message: Message {
                role: Role::User,
                parts: vec![Part::text(text)],
                metadata: None,
            },
            accepted_output_modes: None,
            push_notification: None,
            history_length: None,
            metadata: None,
        }
    }

    fn manager() -> InMemoryTaskManager<EchoExecutor> {
        InMemoryTaskManager::new(Arc::new(InMemoryTaskStore::new()), Arc::new(EchoExecutor))
    }

    #[tokio::test]
    async fn send_task_runs_to_completion() {
        let manager = manager();
        let task = manager.on_send_task(send_params("t-1", "hi")).await.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[tokio::test]
    async fn send_task_subscribe_streams_every_event() {
        let manager = manager();
        let mut queue = manager
            .on_send_task_subscribe(send_params("t-1", "hi"))
            .await
            .unwrap();

        let first = queue.recv().await.unwrap();
        assert!(!first.is_final());
        let second = queue.recv().await.unwrap();
        assert!(second.is_final());
    }

    /// An executor that exits `Ok(())` without ever publishing a `final`
    /// event must not leave `on_send_task` parked forever — it returns the
    /// last task state the store has once the executor task itself ends.
    #[tokio::test]
    async fn send_task_returns_when_executor_exits_without_a_final_event() {
        let manager = InMemoryTaskManager::new(Arc::new(InMemoryTaskStore::new()), Arc::new(SilentExecutor));
        let task = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            manager.on_send_task(send_params("t-1", "hi")),
        )
        .await
        .expect("on_send_task must not hang when no final event is ever published")
        .unwrap();
        assert_eq!(task.status.state, TaskState::Working);
    }

    /// Same hang, but the executor also returns an error — that error must
    /// still surface as a task rather than blocking forever.
    #[tokio::test]
    async fn send_task_returns_when_executor_errors_without_publishing() {
        let manager = InMemoryTaskManager::new(Arc::new(InMemoryTaskStore::new()), Arc::new(FailingExecutor));
        let task = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            manager.on_send_task(send_params("t-1", "hi")),
        )
        .await
        .expect("on_send_task must not hang when the executor errors without publishing")
        .unwrap();
        assert_eq!(task.status.state, TaskState::Submitted);
    }

    /// Same guarantee for the streaming entry point: the returned queue
    /// still yields the one event the executor did publish, and the
    /// background persist task doesn't leak its subscriber forever.
    #[tokio::test]
    async fn send_task_subscribe_does_not_hang_without_a_final_event() {
        let manager = InMemoryTaskManager::new(Arc::new(InMemoryTaskStore::new()), Arc::new(SilentExecutor));
        let mut queue = manager
            .on_send_task_subscribe(send_params("t-1", "hi"))
            .await
            .unwrap();

        let first = tokio::time::timeout(std::time::Duration::from_secs(5), queue.recv())
            .await
            .expect("queue must not hang")
            .unwrap();
        assert!(!first.is_final());
    }

    #[tokio::test]
    async fn get_task_fails_for_unknown_id() {
        let manager = manager();
        let result = manager
            .on_get_task(GetTaskParams {
                id: "missing".to_string(),
                history_length: None,
            })
            .await;
        assert!(matches!(result, Err(A2AError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn cancel_always_refuses_known_task() {
        let manager = manager();
        manager.on_send_task(send_params("t-1", "hi")).await.unwrap();
        let result = manager
            .on_cancel_task(TaskIdParams { id: "t-1".to_string() })
            .await;
        assert!(matches!(result, Err(A2AError::TaskNotCancelable { .. })));
    }

    #[tokio::test]
    async fn cancel_fails_not_found_for_unknown_task() {
        let manager = manager();
        let result = manager
            .on_cancel_task(TaskIdParams { id: "missing".to_string() })
            .await;
        assert!(matches!(result, Err(A2AError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn resubscribe_is_always_unsupported() {
        let manager = manager();
        manager.on_send_task(send_params("t-1", "hi")).await.unwrap();
        let result = manager
            .on_resubscribe_to_task(TaskIdParams { id: "t-1".to_string() })
            .await;
        assert!(matches!(result, Err(A2AError::UnsupportedOperation { .. })));
    }

    #[tokio::test]
    async fn push_notification_set_then_get_round_trips() {
        let manager = manager();
        manager.on_send_task(send_params("t-1", "hi")).await.unwrap();

        let config = TaskPushNotificationConfig {
            id: "t-1".to_string(),
            push_notification_config: PushNotificationConfig {
                url: "https://example.com/hook".to_string(),
                token: None,
                authentication: None,
            },
        };
        manager
            .on_set_task_push_notification(config.clone())
            .await
            .unwrap();

        let fetched = manager
            .on_get_task_push_notification(TaskIdParams { id: "t-1".to_string() })
            .await
            .unwrap();
        assert_eq!(fetched.push_notification_config.url, config.push_notification_config.url);
    }

    /// An artifact event must not re-append the task's current status
    /// message to history on every chunk — only the status update that
    /// actually carried the message does that.
    #[tokio::test]
    async fn artifact_event_does_not_reappend_status_message_to_history() {
        let store = InMemoryTaskStore::new();
        store.upsert(&send_params("t-1", "hi")).await.unwrap();

        let status_with_message = StreamResponse::StatusUpdate(crate::types::TaskStatusUpdateEvent {
            task_id: "t-1".to_string(),
            status: TaskStatus {
                state: TaskState::Working,
                message: Some(Message {
                    role: Role::Agent,
                    parts: vec![Part::text("working on it")],
                    metadata: None,
                }),
                timestamp: None,
            },
            r#final: false,
        });
        apply_event(&store, "t-1", &status_with_message).await.unwrap();

        let artifact_event = StreamResponse::ArtifactUpdate(crate::types::TaskArtifactUpdateEvent {
            task_id: "t-1".to_string(),
            artifact: crate::types::Artifact {
                name: None,
                description: None,
                parts: vec![Part::text("chunk")],
                index: 0,
                append: None,
                last_chunk: Some(false),
                metadata: None,
            },
        });
        apply_event(&store, "t-1", &artifact_event).await.unwrap();
        let task = apply_event(&store, "t-1", &artifact_event).await.unwrap();

        let agent_messages = task.history.iter().filter(|m| m.role == Role::Agent).count();
        assert_eq!(agent_messages, 1, "artifact events must not re-append the status message");
        assert_eq!(task.artifacts.len(), 2);
    }

    #[tokio::test]
    async fn push_notification_set_fails_for_unknown_task() {
        let manager = manager();
        let config = TaskPushNotificationConfig {
            id: "missing".to_string(),
            push_notification_config: PushNotificationConfig {
                url: "https://example.com/hook".to_string(),
                token: None,
                authentication: None,
            },
        };
        let result = manager.on_set_task_push_notification(config).await;
        assert!(matches!(result, Err(A2AError::InternalError { .. })));
    }
}
