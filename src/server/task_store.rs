//! Task store — the single source of truth for task state.
//!
//! `upsert`/`get`/`update` are guarded by one mutex held for the full
//! read-modify-write sequence; reads return copies, so a `history_view` can
//! observe a task concurrently being mutated by another handler.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{A2AError, A2AResult};
use crate::types::{Artifact, Task, TaskSendParams, TaskStatus};
use crate::utils::task::{history_view, new_task};

/// Trait for persisting and retrieving A2A tasks.
///
/// Implementations must be `Send + Sync` for use in async server contexts.
///
/// # Provided implementations
///
/// - [`InMemoryTaskStore`] — simple in-memory store (data lost on restart)
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task from `params` if `params.id` is unknown, otherwise
    /// append `params.message` to the existing task's history without
    /// touching its status. Returns the resulting task either way.
    async fn upsert(&self, params: &TaskSendParams) -> A2AResult<Task>;

    /// Retrieve a task by its ID. Returns `None` if it does not exist.
    /// The returned value is a snapshot and may race with a concurrent
    /// mutation.
    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>>;

    /// Replace a task's status and append any given artifacts.
    ///
    /// If `status.message` is present, it is appended to the task's
    /// history before the status is replaced. New artifacts are appended
    /// to the existing list (artifacts are never replaced or removed).
    ///
    /// Fails with [`A2AError::task_not_found`] if `task_id` is unknown.
    async fn update(
        &self,
        task_id: &str,
        status: TaskStatus,
        artifacts: Option<Vec<Artifact>>,
    ) -> A2AResult<Task>;

    /// Returns a copy of `task` with `history` truncated per `history_length`
    /// — a positive length returns the last `min(n, history.len())`
    /// messages, otherwise an empty history. Never mutates the store.
    fn history_view(&self, task: &Task, history_length: Option<i64>) -> Task {
        history_view(task, history_length)
    }
}

/// In-memory task store backed by a `HashMap` behind a single `RwLock`.
///
/// Suitable for development, testing, and short-lived server instances.
/// All task data is lost when the process exits. Never garbage-collects.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl InMemoryTaskStore {
    /// Create a new empty in-memory task store.
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn upsert(&self, params: &TaskSendParams) -> A2AResult<Task> {
        let mut tasks = self.tasks.write().await;
        if let Some(existing) = tasks.get_mut(&params.id) {
            existing.history.push(params.message.clone());
            debug!(task_id = %params.id, "appended message to existing task");
            return Ok(existing.clone());
        }

        let task = new_task(params)?;
        tasks.insert(task.id.clone(), task.clone());
        debug!(task_id = %task.id, "created new task");
        Ok(task)
    }

    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(task_id).cloned())
    }

    async fn update(
        &self,
        task_id: &str,
        status: TaskStatus,
        artifacts: Option<Vec<Artifact>>,
    ) -> A2AResult<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| A2AError::task_not_found(task_id.to_string()))?;

        if let Some(message) = status.message.clone() {
            task.history.push(message);
        }
        task.status = status;

        if let Some(new_artifacts) = artifacts {
            task.artifacts.extend(new_artifacts);
        }

        debug!(task_id = %task_id, state = %task.status.state, "task updated");
        Ok(task.clone())
    }
}
