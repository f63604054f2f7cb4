//! # a2a-rs — Rust SDK for the Agent-to-Agent (A2A) Protocol
//!
//! This crate provides a Rust implementation of the Agent-to-Agent (A2A)
//! protocol core: JSON-RPC 2.0 dispatch over seven task-oriented methods, an
//! in-memory task store, and Server-Sent Events (SSE) streaming for
//! real-time status/artifact updates.
//!
//! ## Overview
//!
//! The A2A protocol allows agents to:
//! - Send a message and get back a [`types::Task`] tracking its processing
//! - Stream real-time status and artifact updates via SSE
//! - Cancel running tasks
//! - Discover a remote agent's capabilities via its [`types::AgentCard`]
//!
//! This crate provides:
//! - **Complete type definitions** for the wire-level JSON-RPC shapes
//! - **Client** for calling remote A2A agents ([`client::A2AClient`])
//! - **Server** framework for building A2A-compatible agents ([`server::AgentExecutor`])
//! - **Ergonomic builders** for constructing complex types ([`AgentCardBuilder`], [`ClientBuilder`], [`ServerBuilder`])
//!
//! ## Feature flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `client` | yes     | HTTP client for calling A2A agents (reqwest + SSE) |
//! | `server` | yes     | Server traits + axum integration for building agents |
//! | `full`   | no      | Enable all features |
//!
//! ## Quick Start: Client
//!
//! ```no_run
//! use a2a_rs::client::A2AClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to an A2A agent (resolves its agent card, discovers the endpoint).
//!     let client = A2AClient::from_url("http://localhost:7420").await?;
//!
//!     // Send a simple text message (`tasks/send`).
//!     let task = client.send_text("Write a haiku about Rust").await?;
//!     println!("Task {} — status: {:?}", task.id, task.status.state);
//!
//!     // Or stream responses in real-time (`tasks/sendSubscribe`).
//!     let mut stream = client.send_text_stream("Tell me a story").await?;
//!     while let Some(event) = stream.next().await {
//!         match event? {
//!             a2a_rs::types::StreamResponse::StatusUpdate(update) => {
//!                 println!("Status: {:?}", update.status.state);
//!             }
//!             a2a_rs::types::StreamResponse::ArtifactUpdate(artifact) => {
//!                 println!("Artifact: {:?}", artifact.artifact.name);
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Quick Start: Server
//!
//! Implement [`server::AgentExecutor`] to define your agent's behavior:
//!
//! ```rust,ignore
//! use a2a_rs::server::{AgentExecutor, RequestContext, Publisher, TaskUpdater};
//! use a2a_rs::error::A2AResult;
//! use async_trait::async_trait;
//!
//! struct EchoAgent;
//!
//! #[async_trait]
//! impl AgentExecutor for EchoAgent {
//!     async fn execute(&self, ctx: RequestContext, publisher: Publisher) -> A2AResult<()> {
//!         let updater = TaskUpdater::new(publisher, ctx.task_id.clone(), ctx.session_id.clone());
//!         updater.start_work(None)?;
//!
//!         let text = ctx.get_user_input(" ");
//!         let message = updater.new_agent_message(format!("Echo: {text}"));
//!         updater.complete(Some(message))?;
//!         Ok(())
//!     }
//!
//!     async fn cancel(&self, ctx: RequestContext, publisher: Publisher) -> A2AResult<()> {
//!         let updater = TaskUpdater::new(publisher, ctx.task_id, ctx.session_id);
//!         updater.cancel(None)?;
//!         Ok(())
//!     }
//! }
//! ```
//!
//! Then set up the HTTP server:
//!
//! ```rust,ignore
//! use a2a_rs::server::{a2a_router, InMemoryTaskManager, InMemoryTaskStore};
//! use a2a_rs::AgentCardBuilder;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent_card = AgentCardBuilder::new("Echo Agent")
//!         .description("A simple agent that echoes back your messages")
//!         .version("1.0.0")
//!         .url("http://localhost:3000/a2a")
//!         .build()?;
//!
//!     let store = Arc::new(InMemoryTaskStore::new());
//!     let manager = Arc::new(InMemoryTaskManager::new(store, Arc::new(EchoAgent)));
//!
//!     let app = a2a_router(manager, agent_card, "/a2a");
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! The server automatically provides:
//! - `POST /a2a` — JSON-RPC 2.0 endpoint for all A2A methods
//! - `GET /.well-known/agent.json` — Agent card discovery
//!
//! ## Protocol Compliance
//!
//! Supported JSON-RPC methods:
//! - `tasks/get` — Retrieve a task by ID
//! - `tasks/send` — Run a task to completion (or its next terminal/`input-required` state)
//! - `tasks/sendSubscribe` — Run a task, streaming status/artifact updates over SSE
//! - `tasks/cancel` — Cancel a running task
//! - `tasks/pushNotification/set` — Configure push notifications for a task
//! - `tasks/pushNotification/get` — Retrieve a task's push notification configuration
//! - `tasks/resubscribe` — Reattach to an in-flight task's event stream
//!
//! ## Architecture
//!
//! ### Client
//!
//! - [`client::A2AClient`] — High-level client with typed methods for all A2A operations
//! - [`client::CardResolver`] — Discovers agent cards from `/.well-known/agent.json`
//! - [`client::JsonRpcTransport`] — HTTP transport with JSON-RPC 2.0 encoding
//! - [`client::SseStream`] — Server-Sent Events stream for real-time updates
//! - [`client::RemoteAgentConnection`] — Host-side adapter unifying streaming
//!   and non-streaming remote agents behind one callback API
//!
//! ### Server
//!
//! - [`server::AgentExecutor`] — Trait for implementing your agent's logic
//! - [`server::TaskManager`] — Trait implementing the seven A2A RPC operations
//! - [`server::InMemoryTaskManager`] — Reference implementation of `TaskManager`
//! - [`server::TaskStore`] — Trait for task persistence
//! - [`server::InMemoryTaskStore`] — In-memory task store implementation
//! - [`server::SubscriberRegistry`] / [`server::Publisher`] — Per-task event fan-out
//! - [`server::TaskUpdater`] — Helper for publishing task status/artifact updates
//! - [`server::a2a_router`] — Creates an axum `Router` with A2A routes
//!
//! ### Core Types
//!
//! - [`types::Task`] — A2A task with status, history, and artifacts
//! - [`types::Message`] — A message with text/file/data parts
//! - [`types::Part`] — Content part (text, file, or structured data)
//! - [`types::TaskState`] — Task lifecycle state machine
//! - [`types::StreamResponse`] — SSE event types (status updates, artifact updates)
//! - [`types::AgentCard`] — Agent metadata and capabilities
//! - [`error::A2AError`] — Error types with JSON-RPC error codes

pub mod builders;
pub mod error;
pub mod types;
pub mod utils;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;

/// Prelude module that re-exports commonly used types and traits.
///
/// Import this module with `use a2a_rs::prelude::*;` to get access to the most
/// frequently used types without having to import them individually.
///
/// # Example
///
/// ```
/// use a2a_rs::prelude::*;
///
/// // Now you have access to common types like:
/// // - Message, Part, Task, TaskState, Role
/// // - AgentCard, AgentSkill, AgentCapabilities
/// // - A2AError, A2AResult
/// // - builders like AgentCardBuilder
/// ```
pub mod prelude {
    // Core types
    pub use crate::types::{
        AgentCapabilities, AgentCard, AgentProvider, AgentSkill, Artifact, FileContent,
        FileWithBytes, FileWithUri, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
        Message, Part, PushNotificationConfig, Role, StreamResponse, Task,
        TaskArtifactUpdateEvent, TaskPushNotificationConfig, TaskState, TaskStatus,
        TaskStatusUpdateEvent,
    };

    // Error types
    pub use crate::error::{A2AError, A2AResult};

    // Builders
    pub use crate::builders::AgentCardBuilder;

    #[cfg(feature = "client")]
    pub use crate::builders::ClientBuilder;

    #[cfg(feature = "client")]
    pub use crate::client::{A2AClient, RemoteAgentConnection};

    #[cfg(feature = "server")]
    pub use crate::builders::ServerBuilder;

    #[cfg(feature = "server")]
    pub use crate::server::{
        a2a_router, AgentExecutor, InMemoryTaskManager, InMemoryTaskStore, Publisher,
        RequestContext, SubscriberRegistry, TaskManager, TaskStore, TaskUpdater,
    };
}

// Re-export core types at crate root for convenience.
pub use builders::AgentCardBuilder;
pub use error::{A2AError, A2AResult};
pub use types::*;

#[cfg(feature = "client")]
pub use builders::ClientBuilder;

#[cfg(feature = "server")]
pub use builders::ServerBuilder;
