//! Echo Agent — a minimal A2A server that echoes messages back.
//!
//! Run with:
//! ```sh
//! cargo run --example echo_agent
//! ```
//!
//! Then test with curl:
//! ```sh
//! # Check agent card
//! curl http://localhost:3000/.well-known/agent.json | jq
//!
//! # Send a message
//! curl -X POST http://localhost:3000/a2a \
//!   -H "Content-Type: application/json" \
//!   -d '{
//!     "jsonrpc": "2.0",
//!     "id": "1",
//!     "method": "tasks/send",
//!     "params": {
//!       "id": "task-1",
//!       "sessionId": "session-1",
//!       "message": {
//!         "role": "user",
//!         "parts": [{"type": "text", "text": "Hello, agent!"}]
//!       }
//!     }
//!   }'
//! ```

use std::sync::Arc;

use a2a_rs::builders::AgentCardBuilder;
use a2a_rs::error::A2AResult;
use a2a_rs::server::{a2a_router, AgentExecutor, InMemoryTaskManager, InMemoryTaskStore, Publisher, RequestContext};
use a2a_rs::types::Part;
use async_trait::async_trait;

/// A simple agent that echoes back whatever you send it.
struct EchoAgent;

#[async_trait]
impl AgentExecutor for EchoAgent {
    async fn execute(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()> {
        let updater = a2a_rs::server::TaskUpdater::new(
            publisher,
            context.task_id.clone(),
            context.session_id.clone(),
        );

        let input = context.get_user_input("\n");
        let text = if input.is_empty() {
            "No text received".to_string()
        } else {
            input
        };

        updater.start_work(None)?;

        updater.add_artifact(
            0,
            vec![Part::text(format!("Echo: {text}"))],
            Some("echo-response".to_string()),
            None,
            Some(true),
        )?;

        let message = updater.new_agent_message(format!("Echoed: {text}"));
        updater.complete(Some(message))?;

        Ok(())
    }

    async fn cancel(&self, context: RequestContext, publisher: Publisher) -> A2AResult<()> {
        let updater = a2a_rs::server::TaskUpdater::new(publisher, context.task_id, context.session_id);
        updater.cancel(None)?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let agent_card = AgentCardBuilder::new("Echo Agent")
        .description("A simple agent that echoes messages back")
        .version("0.1.0")
        .url("http://localhost:3000/a2a")
        .with_streaming(true)
        .with_skill(
            "echo",
            "Echo",
            "Echoes back any text message you send",
            vec!["echo".to_string(), "test".to_string()],
        )
        .build()?;

    let store = Arc::new(InMemoryTaskStore::new());
    let manager = Arc::new(InMemoryTaskManager::new(store, Arc::new(EchoAgent)));

    let app = a2a_router(manager, agent_card, "/a2a");

    let addr = "0.0.0.0:3000";
    println!("Echo Agent listening on http://{addr}");
    println!("  Agent card: http://{addr}/.well-known/agent.json");
    println!("  A2A endpoint: http://{addr}/a2a");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
