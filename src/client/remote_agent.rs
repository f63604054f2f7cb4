//! Remote Agent Adapter — host-side wrapper unifying streaming and
//! non-streaming remote agents behind one `send_task` call.
//!
//! A host holding several remote agents drives each one through the same
//! callback-based API regardless of whether the remote agent advertises
//! `capabilities.streaming`.

use crate::error::A2AResult;
use crate::types::{AgentCard, Message, StreamResponse, Task, TaskSendParams, TaskState, TaskStatus};

use super::a2a_client::A2AClient;

/// Adapter over a single remote agent, combining its resolved [`AgentCard`]
/// with an [`A2AClient`] targeting it.
///
/// Hosts that orchestrate multiple remote agents keep one of these per
/// agent and always call [`send_task`](Self::send_task) — the adapter
/// decides whether to use `tasks/sendSubscribe` or `tasks/send` based on
/// `card.capabilities.streaming`.
pub struct RemoteAgentConnection {
    card: AgentCard,
    client: A2AClient,
}

impl RemoteAgentConnection {
    /// Wrap an already-resolved agent card with a client targeting it.
    pub fn new(card: AgentCard, client: A2AClient) -> Self {
        Self { card, client }
    }

    /// The remote agent's card.
    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// Run `params` against the remote agent, invoking `task_callback` with
    /// every [`Task`] snapshot the agent produces, and returning the last one.
    ///
    /// If the remote agent supports streaming (`card.capabilities.streaming`),
    /// this subscribes via `tasks/sendSubscribe`: it first synthesizes and
    /// delivers a `submitted` snapshot (showing the caller's own message as
    /// task history before the first server event arrives), then folds each
    /// streamed [`StreamResponse`]
    /// into a running [`Task`] and delivers it, stopping at the first
    /// `final` event.
    ///
    /// If the agent does not support streaming, this calls `tasks/send` once
    /// and delivers the single resulting task.
    ///
    /// In both cases, before delivery each task's (and its status message's)
    /// metadata is merged with the request's via [`merge_metadata`], and the
    /// status message (if any) additionally has its `message_id` rotated: any
    /// existing `message_id` is moved to `last_message_id` and replaced with a
    /// freshly generated one, so the host can tell repeated deliveries of the
    /// "same" status message apart from genuinely new ones.
    pub async fn send_task(
        &self,
        params: TaskSendParams,
        mut task_callback: impl FnMut(Task),
    ) -> A2AResult<Option<Task>> {
        if self.card.capabilities.streaming {
            task_callback(synthesize_submitted(&params));

            let mut stream = self.client.send_task_subscribe(params.clone()).await?;
            let mut running = synthesize_submitted(&params);
            let mut last: Option<Task> = None;

            while let Some(event) = stream.next().await {
                let event = event?;
                apply_event(&mut running, &event);
                merge_metadata_task(&mut running, &params);
                rotate_status_message_id(&mut running);

                task_callback(running.clone());
                last = Some(running.clone());

                if event.is_final() {
                    break;
                }
            }

            Ok(last)
        } else {
            let mut task = self.client.send_task(params.clone()).await?;
            merge_metadata_task(&mut task, &params);
            rotate_status_message_id(&mut task);

            task_callback(task.clone());
            Ok(Some(task))
        }
    }
}

fn synthesize_submitted(params: &TaskSendParams) -> Task {
    Task {
        id: params.id.clone(),
        session_id: params.session_id.clone(),
        status: TaskStatus {
            state: TaskState::Submitted,
            message: Some(params.message.clone()),
            timestamp: None,
        },
        history: vec![params.message.clone()],
        artifacts: Vec::new(),
        metadata: None,
    }
}

fn apply_event(running: &mut Task, event: &StreamResponse) {
    match event {
        StreamResponse::StatusUpdate(update) => {
            running.status = update.status.clone();
            if let Some(message) = &update.status.message {
                running.history.push(message.clone());
            }
        }
        StreamResponse::ArtifactUpdate(update) => {
            running.artifacts.push(update.artifact.clone());
        }
    }
}

fn merge_metadata_task(task: &mut Task, params: &TaskSendParams) {
    merge_metadata(&mut task.metadata, &params.metadata);
    if let Some(status_message) = &mut task.status.message {
        merge_metadata(&mut status_message.metadata, &params.message.metadata);
    }
}

fn rotate_status_message_id(task: &mut Task) {
    let Some(message) = &mut task.status.message else {
        return;
    };

    let mut map = match message.metadata.take() {
        Some(serde_json::Value::Object(map)) => map,
        Some(other) => {
            // Non-object metadata can't hold message-id bookkeeping; leave it untouched.
            message.metadata = Some(other);
            return;
        }
        None => serde_json::Map::new(),
    };

    if let Some(existing) = map.remove("message_id") {
        map.insert("last_message_id".to_string(), existing);
    }
    map.insert(
        "message_id".to_string(),
        serde_json::Value::String(uuid::Uuid::new_v4().to_string()),
    );

    message.metadata = Some(serde_json::Value::Object(map));
}

/// Merge `source`'s metadata into `target`'s, source winning on key conflicts.
///
/// - Both present: `target`'s map is updated with `source`'s entries (source
///   wins on shared keys), mirroring Python's `dict.update`.
/// - Only `source` present: `target` takes a clone of `source`'s metadata.
/// - Neither present, or only `target` present: no-op.
///
/// Adapted for `Option<serde_json::Value>` fields holding JSON objects.
pub fn merge_metadata(target: &mut Option<serde_json::Value>, source: &Option<serde_json::Value>) {
    let Some(source_value) = source else {
        return;
    };

    match (target.as_mut().and_then(|v| v.as_object_mut()), source_value.as_object()) {
        (Some(target_map), Some(source_map)) => {
            for (key, value) in source_map {
                target_map.insert(key.clone(), value.clone());
            }
        }
        (None, Some(_)) => {
            *target = Some(source_value.clone());
        }
        _ => {}
    }
}
