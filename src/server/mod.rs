//! A2A server framework — traits and implementations for building A2A agents.
//!
//! - [`AgentExecutor`] trait + [`RequestContext`] — implement your agent logic
//! - [`TaskStore`] trait + [`InMemoryTaskStore`] — task persistence
//! - [`SubscriberRegistry`] + [`Publisher`] — per-task event fan-out
//! - [`TaskUpdater`] — ergonomic status/artifact publishing for executors
//! - [`TaskManager`] trait + [`InMemoryTaskManager`] — the seven RPC operations
//! - [`request_handler::dispatch`] — transport-agnostic JSON-RPC dispatch
//! - [`a2a_router`] — ready-made axum routes for A2A servers
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use a2a_rs::server::*;
//! use a2a_rs::types::AgentCard;
//!
//! struct MyAgent;
//!
//! #[async_trait::async_trait]
//! impl AgentExecutor for MyAgent {
//!     async fn execute(&self, ctx: RequestContext, publisher: Publisher) -> a2a_rs::A2AResult<()> {
//!         let updater = TaskUpdater::new(publisher, ctx.task_id, ctx.session_id);
//!         updater.start_work(None)?;
//!         updater.complete(Some(updater.new_agent_message("done")))?;
//!         Ok(())
//!     }
//!
//!     async fn cancel(&self, _ctx: RequestContext, _publisher: Publisher) -> a2a_rs::A2AResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
//! let manager = Arc::new(InMemoryTaskManager::new(store, Arc::new(MyAgent)));
//! let app = a2a_router(manager, agent_card, "/a2a");
//! ```

pub mod agent_executor;
pub mod axum_integration;
pub mod request_handler;
pub mod subscriber_registry;
pub mod task_manager;
pub mod task_store;
pub mod task_updater;

pub use agent_executor::{AgentExecutor, RequestContext};
pub use axum_integration::a2a_router;
pub use subscriber_registry::{Publisher, SubscriberQueue, SubscriberRegistry, TaskEvent};
pub use task_manager::{InMemoryTaskManager, TaskManager};
pub use task_store::{InMemoryTaskStore, TaskStore};
pub use task_updater::TaskUpdater;
