//! RPC dispatch — turns a parsed [`JsonRpcRequest`] into a reply or a stream.
//!
//! This module knows the seven method names and how to get a
//! [`TaskManager`] to act on them; it knows nothing about HTTP, SSE framing,
//! or request bodies. [`crate::server::axum_integration`] is the thin layer
//! on top that does.

use futures::Stream;

use crate::error::A2AError;
use crate::server::subscriber_registry::{SubscriberQueue, TaskEvent};
use crate::server::task_manager::TaskManager;
use crate::types::{
    GetTaskParams, JsonRpcId, JsonRpcRequest, JsonRpcResponse, TaskIdParams,
    TaskPushNotificationConfig, TaskSendParams,
};

/// `tasks/get`.
pub const METHOD_GET_TASK: &str = "tasks/get";
/// `tasks/send`.
pub const METHOD_SEND_TASK: &str = "tasks/send";
/// `tasks/sendSubscribe`.
pub const METHOD_SEND_TASK_SUBSCRIBE: &str = "tasks/sendSubscribe";
/// `tasks/cancel`.
pub const METHOD_CANCEL_TASK: &str = "tasks/cancel";
/// `tasks/pushNotification/set`.
pub const METHOD_SET_PUSH_NOTIFICATION: &str = "tasks/pushNotification/set";
/// `tasks/pushNotification/get`.
pub const METHOD_GET_PUSH_NOTIFICATION: &str = "tasks/pushNotification/get";
/// `tasks/resubscribe`.
pub const METHOD_RESUBSCRIBE: &str = "tasks/resubscribe";

/// The result of dispatching one request: either a single JSON reply, or an
/// event stream to be sent as SSE.
pub enum DispatchOutcome {
    /// A single JSON-RPC response (success or error).
    Reply(JsonRpcResponse),
    /// An open stream of JSON-RPC responses, ending with the first one that
    /// carries a final event or an error.
    Stream(SubscriberQueue),
}

fn parse_params<T: serde::de::DeserializeOwned>(
    id: &Option<JsonRpcId>,
    params: Option<serde_json::Value>,
) -> Result<T, JsonRpcResponse> {
    let value = params.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value)
        .map_err(|err| JsonRpcResponse::from_a2a_error(id.clone(), A2AError::invalid_params(err.to_string())))
}

/// Dispatches `request` against `task_manager`, returning either a reply or
/// a stream depending on the method (and, for the streaming methods,
/// whether the task manager itself produced an error up front).
pub async fn dispatch(task_manager: &dyn TaskManager, request: JsonRpcRequest) -> DispatchOutcome {
    let id = request.id.clone();

    if request.jsonrpc != "2.0" {
        return DispatchOutcome::Reply(JsonRpcResponse::from_a2a_error(
            id,
            A2AError::invalid_request("jsonrpc must be \"2.0\""),
        ));
    }

    match request.method.as_str() {
        METHOD_GET_TASK => {
            let params: GetTaskParams = match parse_params(&id, request.params) {
                Ok(p) => p,
                Err(reply) => return DispatchOutcome::Reply(reply),
            };
            reply_from(id, task_manager.on_get_task(params).await)
        }
        METHOD_SEND_TASK => {
            let params: TaskSendParams = match parse_params(&id, request.params) {
                Ok(p) => p,
                Err(reply) => return DispatchOutcome::Reply(reply),
            };
            reply_from(id, task_manager.on_send_task(params).await)
        }
        METHOD_SEND_TASK_SUBSCRIBE => {
            let params: TaskSendParams = match parse_params(&id, request.params) {
                Ok(p) => p,
                Err(reply) => return DispatchOutcome::Reply(reply),
            };
            match task_manager.on_send_task_subscribe(params).await {
                Ok(queue) => DispatchOutcome::Stream(queue),
                Err(err) => DispatchOutcome::Reply(JsonRpcResponse::from_a2a_error(id, err)),
            }
        }
        METHOD_CANCEL_TASK => {
            let params: TaskIdParams = match parse_params(&id, request.params) {
                Ok(p) => p,
                Err(reply) => return DispatchOutcome::Reply(reply),
            };
            reply_from(id, task_manager.on_cancel_task(params).await)
        }
        METHOD_SET_PUSH_NOTIFICATION => {
            let params: TaskPushNotificationConfig = match parse_params(&id, request.params) {
                Ok(p) => p,
                Err(reply) => return DispatchOutcome::Reply(reply),
            };
            reply_from(id, task_manager.on_set_task_push_notification(params).await)
        }
        METHOD_GET_PUSH_NOTIFICATION => {
            let params: TaskIdParams = match parse_params(&id, request.params) {
                Ok(p) => p,
                Err(reply) => return DispatchOutcome::Reply(reply),
            };
            reply_from(id, task_manager.on_get_task_push_notification(params).await)
        }
        METHOD_RESUBSCRIBE => {
            let params: TaskIdParams = match parse_params(&id, request.params) {
                Ok(p) => p,
                Err(reply) => return DispatchOutcome::Reply(reply),
            };
            match task_manager.on_resubscribe_to_task(params).await {
                Ok(queue) => DispatchOutcome::Stream(queue),
                Err(err) => DispatchOutcome::Reply(JsonRpcResponse::from_a2a_error(id, err)),
            }
        }
        other => DispatchOutcome::Reply(JsonRpcResponse::from_a2a_error(
            id,
            A2AError::invalid_request(format!("unknown method: {other}")),
        )),
    }
}

fn reply_from<T: serde::Serialize>(id: Option<JsonRpcId>, result: Result<T, A2AError>) -> DispatchOutcome {
    match result {
        Ok(value) => {
            let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
            DispatchOutcome::Reply(JsonRpcResponse::success(id, json))
        }
        Err(err) => DispatchOutcome::Reply(JsonRpcResponse::from_a2a_error(id, err)),
    }
}

/// Turns a subscribed queue into a stream of JSON-RPC responses, one per
/// event, terminating (and detaching) after the first final event or error.
pub fn stream_responses(id: Option<JsonRpcId>, mut queue: SubscriberQueue) -> impl Stream<Item = JsonRpcResponse> {
    async_stream::stream! {
        loop {
            match queue.recv().await {
                Some(TaskEvent::Update(event)) => {
                    let is_final = event.is_final();
                    let result = serde_json::to_value(&event).unwrap_or(serde_json::Value::Null);
                    yield JsonRpcResponse::success(id.clone(), result);
                    if is_final {
                        break;
                    }
                }
                Some(TaskEvent::Error(err)) => {
                    yield JsonRpcResponse::error(id.clone(), err);
                    break;
                }
                None => break,
            }
        }
        queue.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::agent_executor::{AgentExecutor, RequestContext};
    use crate::server::subscriber_registry::Publisher;
    use crate::server::task_manager::InMemoryTaskManager;
    use crate::server::task_store::InMemoryTaskStore;
    use crate::types::{Message, Part, Role, StreamResponse, TaskState, TaskStatus, TaskStatusUpdateEvent};
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::Arc;

    struct EchoExecutor;

    #[async_trait]
    impl AgentExecutor for EchoExecutor {
        async fn execute(&self, context: RequestContext, publisher: Publisher) -> crate::error::A2AResult<()> {
            publisher.publish(StreamResponse::StatusUpdate(TaskStatusUpdateEvent {
                task_id: context.task_id,
                status: TaskStatus::new(TaskState::Completed),
                r#final: true,
            }));
            Ok(())
        }

        async fn cancel(&self, _context: RequestContext, _publisher: Publisher) -> crate::error::A2AResult<()> {
            Ok(())
        }
    }

    fn manager() -> InMemoryTaskManager<EchoExecutor> {
        InMemoryTaskManager::new(Arc::new(InMemoryTaskStore::new()), Arc::new(EchoExecutor))
    }

    fn request(method: &str, params: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest::new(Some(JsonRpcId::from("req-1".to_string())), method.to_string(), Some(params))
    }

    #[tokio::test]
    async fn unknown_method_is_folded_into_invalid_request() {
        let manager = manager();
        let outcome = dispatch(&manager, request("bogus/method", serde_json::json!({}))).await;
        match outcome {
            DispatchOutcome::Reply(reply) => {
                let error = reply.error.expect("error");
                assert_eq!(error.code, A2AError::invalid_request("x").code());
            }
            DispatchOutcome::Stream(_) => panic!("expected reply"),
        }
    }

    #[tokio::test]
    async fn send_task_dispatches_to_reply() {
        let manager = manager();
        let message = Message {
            role: Role::User,
            parts: vec![Part::text("hi")],
            metadata: None,
        };
        let params = serde_json::json!({
            "id": "t-1",
            "sessionId": "s-1",
            "message": message,
        });
        let outcome = dispatch(&manager, request(METHOD_SEND_TASK, params)).await;
        match outcome {
            DispatchOutcome::Reply(reply) => assert!(reply.error.is_none()),
            DispatchOutcome::Stream(_) => panic!("expected reply"),
        }
    }

    #[tokio::test]
    async fn send_task_subscribe_dispatches_to_stream() {
        let manager = manager();
        let message = Message {
            role: Role::User,
            parts: vec![Part::text("hi")],
            metadata: None,
        };
        let params = serde_json::json!({
            "id": "t-2",
            "sessionId": "s-1",
            "message": message,
        });
        let outcome = dispatch(&manager, request(METHOD_SEND_TASK_SUBSCRIBE, params)).await;
        match outcome {
            DispatchOutcome::Stream(queue) => {
                let mut stream = Box::pin(stream_responses(Some(JsonRpcId::from("req-1".to_string())), queue));
                let first = stream.next().await.expect("one response");
                assert!(first.error.is_none());
                assert!(stream.next().await.is_none());
            }
            DispatchOutcome::Reply(_) => panic!("expected stream"),
        }
    }

    #[tokio::test]
    async fn resubscribe_always_replies_with_unsupported_operation() {
        let manager = manager();
        let outcome = dispatch(&manager, request(METHOD_RESUBSCRIBE, serde_json::json!({ "id": "t-1" }))).await;
        match outcome {
            DispatchOutcome::Reply(reply) => assert!(reply.error.is_some()),
            DispatchOutcome::Stream(_) => panic!("expected reply"),
        }
    }
}
