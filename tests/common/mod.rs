//! Shared fixtures for integration tests: agent executors and a tiny helper
//! to stand up a real A2A server on an ephemeral port.

use std::sync::Arc;

use a2a_rs::builders::AgentCardBuilder;
use a2a_rs::error::A2AResult;
use a2a_rs::server::{a2a_router, AgentExecutor, InMemoryTaskManager, InMemoryTaskStore, Publisher, RequestContext, TaskUpdater};
use a2a_rs::types::{AgentCard, Part};
use async_trait::async_trait;

/// Echoes the user's text back as a single completed status message and one
/// artifact, synchronously — no intermediate `working` event.
pub struct EchoAgent;

#[async_trait]
impl AgentExecutor for EchoAgent {
    async fn execute(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()> {
        let updater = TaskUpdater::new(publisher, context.task_id.clone(), context.session_id.clone());
        let text = context.get_user_input(" ");

        updater.add_artifact(0, vec![Part::text(format!("Echo: {text}"))], None, None, Some(true))?;

        let message = updater.new_agent_message(format!("Echoed: {text}"));
        updater.complete(Some(message))?;
        Ok(())
    }

    async fn cancel(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()> {
        let updater = TaskUpdater::new(publisher, context.task_id, context.session_id);
        updater.cancel(None)?;
        Ok(())
    }
}

/// Publishes `working`, then an artifact, then `completed` — for exercising
/// the full streaming event sequence.
pub struct SlowEchoAgent;

#[async_trait]
impl AgentExecutor for SlowEchoAgent {
    async fn execute(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()> {
        let updater = TaskUpdater::new(publisher, context.task_id.clone(), context.session_id.clone());
        let text = context.get_user_input(" ");

        updater.start_work(None)?;
        updater.add_artifact(0, vec![Part::text(format!("partial: {text}"))], None, None, Some(true))?;
        let message = updater.new_agent_message(format!("done: {text}"));
        updater.complete(Some(message))?;
        Ok(())
    }

    async fn cancel(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()> {
        let updater = TaskUpdater::new(publisher, context.task_id, context.session_id);
        updater.cancel(None)?;
        Ok(())
    }
}

pub fn test_agent_card(url: &str) -> AgentCard {
    AgentCardBuilder::new("Test Agent")
        .description("An agent for integration tests")
        .version("0.0.1")
        .url(url)
        .with_streaming(true)
        .with_skill("echo", "Echo", "Echoes input back", vec!["test".to_string()])
        .build()
        .unwrap()
}

/// Same as [`test_agent_card`] but advertising no streaming support, for
/// exercising the non-streaming branch of `RemoteAgentConnection::send_task`.
pub fn test_agent_card_non_streaming(url: &str) -> AgentCard {
    AgentCardBuilder::new("Test Agent (non-streaming)")
        .description("An agent for integration tests")
        .version("0.0.1")
        .url(url)
        .with_streaming(false)
        .with_skill("echo", "Echo", "Echoes input back", vec!["test".to_string()])
        .build()
        .unwrap()
}

/// Binds an ephemeral local port, serves `executor` behind `/a2a`, and
/// returns the base URL once the listener is ready to accept connections.
pub async fn spawn_server<E: AgentExecutor + 'static>(executor: Arc<E>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    let agent_card = test_agent_card(&format!("{base_url}/a2a"));
    let store = Arc::new(InMemoryTaskStore::new());
    let manager = Arc::new(InMemoryTaskManager::new(store, executor));
    let app = a2a_router(manager, agent_card, "/a2a");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base_url
}
