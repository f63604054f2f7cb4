//! Utility functions for creating and viewing A2A Task objects.

use crate::error::{A2AError, A2AResult};
use crate::types::{Artifact, Message, Part, Task, TaskSendParams, TaskState, TaskStatus};

/// Creates a new Task object from a `tasks/send` request.
///
/// # Errors
///
/// Returns an error if the message has no parts, or any text part is empty.
///
/// # Example
///
/// ```
/// use a2a_rs::types::{Message, Part, Role, TaskSendParams};
/// use a2a_rs::utils::new_task;
///
/// let params = TaskSendParams {
///     id: "t-1".to_string(),
///     session_id: "s-1".to_string(),
///     message: Message { role: Role::User, parts: vec![Part::text("Hello")], metadata: None },
///     accepted_output_modes: None,
///     push_notification: None,
///     history_length: None,
///     metadata: None,
/// };
/// let task = new_task(&params).unwrap();
/// assert_eq!(task.status.state, a2a_rs::types::TaskState::Submitted);
/// ```
pub fn new_task(params: &TaskSendParams) -> A2AResult<Task> {
    if params.message.parts.is_empty() {
        return Err(A2AError::invalid_params("Message parts cannot be empty"));
    }
    for part in &params.message.parts {
        if let Part::Text { text, .. } = part {
            if text.is_empty() {
                return Err(A2AError::invalid_params("TextPart content cannot be empty"));
            }
        }
    }

    Ok(Task {
        id: params.id.clone(),
        session_id: params.session_id.clone(),
        status: TaskStatus::new(TaskState::Submitted),
        history: vec![params.message.clone()],
        artifacts: Vec::new(),
        metadata: params.metadata.clone(),
    })
}

/// Creates a Task object in the 'completed' state.
///
/// Useful for constructing a final Task representation when the agent
/// finishes and produces artifacts.
///
/// # Errors
///
/// Returns an error if `artifacts` is empty.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::{completed_task, new_text_artifact};
///
/// let artifact = new_text_artifact("Result", "Task complete", None::<String>);
/// let task = completed_task("task-123", "session-456", vec![artifact], Vec::new()).unwrap();
/// assert_eq!(task.status.state, a2a_rs::types::TaskState::Completed);
/// ```
pub fn completed_task(
    task_id: impl Into<String>,
    session_id: impl Into<String>,
    artifacts: Vec<Artifact>,
    history: Vec<Message>,
) -> A2AResult<Task> {
    if artifacts.is_empty() {
        return Err(A2AError::invalid_params(
            "artifacts must be a non-empty list of Artifact objects",
        ));
    }

    Ok(Task {
        id: task_id.into(),
        session_id: session_id.into(),
        status: TaskStatus::new(TaskState::Completed),
        history,
        artifacts,
        metadata: None,
    })
}

/// Returns a copy of `task` with its history truncated to the Task Store's
/// `history_view` contract: a positive `history_length` returns the last
/// `min(history_length, history.len())` messages; `None` or a
/// non-positive length returns an empty history. The underlying task and
/// its `artifacts`/`status` are unaffected.
///
/// # Example
///
/// ```
/// use a2a_rs::types::{Message, Part, Role, Task, TaskState, TaskStatus};
/// use a2a_rs::utils::history_view;
///
/// let messages: Vec<Message> = (0..10)
///     .map(|i| Message { role: Role::User, parts: vec![Part::text(format!("m{}", i))], metadata: None })
///     .collect();
///
/// let task = Task {
///     id: "task-1".to_string(),
///     session_id: "session-1".to_string(),
///     status: TaskStatus::new(TaskState::Working),
///     history: messages,
///     artifacts: Vec::new(),
///     metadata: None,
/// };
///
/// let view = history_view(&task, Some(5));
/// assert_eq!(view.history.len(), 5);
///
/// let empty_view = history_view(&task, None);
/// assert!(empty_view.history.is_empty());
/// ```
pub fn history_view(task: &Task, history_length: Option<i64>) -> Task {
    let history = match history_length {
        Some(n) if n > 0 => {
            let n = n as usize;
            let total = task.history.len();
            if total > n {
                task.history[total - n..].to_vec()
            } else {
                task.history.clone()
            }
        }
        _ => Vec::new(),
    };

    Task {
        id: task.id.clone(),
        session_id: task.session_id.clone(),
        status: task.status.clone(),
        history,
        artifacts: task.artifacts.clone(),
        metadata: task.metadata.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn params_with_text(text: &str) -> TaskSendParams {
        TaskSendParams {
            id: "task-1".to_string(),
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

    #[test]
    fn test_new_task_status() {
        let task = new_task(&params_with_text("test message")).unwrap();
        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(task.history.len(), 1);
    }

    #[test]
    fn test_new_task_rejects_empty_parts() {
        let mut params = params_with_text("x");
        params.message.parts.clear();
        assert!(new_task(&params).is_err());
    }

    #[test]
    fn test_completed_task_status() {
        let artifact = crate::utils::new_text_artifact("test", "content", None::<String>);
        let task = completed_task("task-1", "session-1", vec![artifact], Vec::new()).unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[test]
    fn test_completed_task_empty_artifacts_fails() {
        let result = completed_task("task-1", "session-1", vec![], Vec::new());
        assert!(result.is_err());
    }

    fn task_with_history(len: usize) -> Task {
        let messages: Vec<Message> = (0..len)
            .map(|i| Message {
                role: Role::User,
                parts: vec![Part::text(format!("message-{}", i))],
                metadata: None,
            })
            .collect();

        Task {
            id: "task-1".to_string(),
            session_id: "session-1".to_string(),
            status: TaskStatus::new(TaskState::Working),
            history: messages,
            artifacts: Vec::new(),
            metadata: None,
        }
    }

    #[test]
    fn test_history_view_truncates_to_last_n() {
        let task = task_with_history(10);
        let view = history_view(&task, Some(5));
        assert_eq!(view.history.len(), 5);
        match &view.history[0].parts[0] {
            Part::Text { text, .. } => assert_eq!(text, "message-5"),
            _ => panic!("expected text part"),
        }
    }

    #[test]
    fn test_history_view_none_is_empty() {
        let task = task_with_history(10);
        assert!(history_view(&task, None).history.is_empty());
    }

    #[test]
    fn test_history_view_non_positive_is_empty() {
        let task = task_with_history(10);
        assert!(history_view(&task, Some(0)).history.is_empty());
        assert!(history_view(&task, Some(-3)).history.is_empty());
    }

    #[test]
    fn test_history_view_n_larger_than_history_returns_all() {
        let task = task_with_history(3);
        assert_eq!(history_view(&task, Some(50)).history.len(), 3);
    }
}
