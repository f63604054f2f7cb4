//! A2A client — call remote A2A agents.
//!
//! - [`A2AClient`] — high-level client with typed methods for every A2A
//!   JSON-RPC operation (`tasks/get`, `tasks/send`, `tasks/sendSubscribe`,
//!   `tasks/cancel`, `tasks/pushNotification/set`, `tasks/pushNotification/get`,
//!   `tasks/resubscribe`)
//! - [`CardResolver`] — discover agent cards via the well-known URL convention
//! - [`Transport`] / [`JsonRpcTransport`] — pluggable transport layer
//! - [`SseStream`] — parsed SSE event stream for streaming responses
//! - [`RemoteAgentConnection`] — host-side adapter unifying streaming and
//!   non-streaming remote agents behind a single `send_task` callback API
//!
//! # Quick Start
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use a2a_rs::client::A2AClient;
//!
//! // Connect to an agent (resolves agent card automatically):
//! let client = A2AClient::from_url("http://localhost:7420").await?;
//!
//! // Send a text message:
//! let task = client.send_text("Hello, agent!").await?;
//! println!("Task {} — status: {:?}", task.id, task.status.state);
//!
//! // Stream responses:
//! let mut stream = client.send_text_stream("Write a haiku").await?;
//! while let Some(event) = stream.next().await {
//!     println!("{:?}", event?);
//! }
//! # Ok(())
//! # }
//! ```

mod a2a_client;
mod card_resolver;
mod remote_agent;
mod sse;
mod transport;

pub use a2a_client::{create_text_message, A2AClient};
pub use card_resolver::CardResolver;
pub use remote_agent::{merge_metadata, RemoteAgentConnection};
pub use sse::{SseStream, SseStreamAdapter};
pub use transport::{JsonRpcTransport, Transport, TransportConfig};
