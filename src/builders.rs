//! Builder patterns for ergonomic construction of A2A types.

use crate::types::*;

/// Builder for constructing [`AgentCard`] with sensible defaults.
///
/// # Example
///
/// ```
/// use a2a_rs::builders::AgentCardBuilder;
///
/// let card = AgentCardBuilder::new("My Agent")
///     .description("An example agent")
///     .version("1.0.0")
///     .url("http://localhost:8080/a2a")
///     .with_skill("chat", "Chat", "Conversational AI", vec!["conversation".to_string()])
///     .with_streaming(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AgentCardBuilder {
    name: String,
    description: String,
    url: String,
    version: String,
    capabilities: AgentCapabilities,
    default_input_modes: Vec<String>,
    default_output_modes: Vec<String>,
    skills: Vec<AgentSkill>,
    provider: Option<AgentProvider>,
    documentation_url: Option<String>,
}

impl AgentCardBuilder {
    /// Create a new builder with the agent's name. `description`, `url`, and
    /// `version` default to empty strings and must be set before [`build`](Self::build)
    /// succeeds.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: String::new(),
            version: String::new(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            skills: Vec::new(),
            provider: None,
            documentation_url: None,
        }
    }

    /// Set the agent's description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the agent's version string.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the absolute URL of the agent's JSON-RPC endpoint. This is the
    /// URL advertised in the card and used by clients to reach `POST
    /// {endpoint}`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the provider/organization information.
    pub fn with_provider(mut self, organization: impl Into<String>, url: impl Into<String>) -> Self {
        self.provider = Some(AgentProvider {
            organization: organization.into(),
            url: url.into(),
        });
        self
    }

    /// Set the documentation URL.
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Enable or disable streaming support (`capabilities.streaming`).
    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.capabilities.streaming = enabled;
        self
    }

    /// Enable or disable push notification support (`capabilities.pushNotifications`).
    pub fn with_push_notifications(mut self, enabled: bool) -> Self {
        self.capabilities.push_notifications = enabled;
        self
    }

    /// Add a skill to the agent card.
    pub fn with_skill(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        self.skills.push(AgentSkill {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags,
            examples: None,
            input_modes: None,
            output_modes: None,
        });
        self
    }

    /// Add a skill with example prompts.
    pub fn with_skill_examples(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
        examples: Vec<String>,
    ) -> Self {
        self.skills.push(AgentSkill {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags,
            examples: Some(examples),
            input_modes: None,
            output_modes: None,
        });
        self
    }

    /// Set the default input MIME types.
    pub fn with_input_modes(mut self, modes: Vec<String>) -> Self {
        self.default_input_modes = modes;
        self
    }

    /// Set the default output MIME types.
    pub fn with_output_modes(mut self, modes: Vec<String>) -> Self {
        self.default_output_modes = modes;
        self
    }

    /// Build the [`AgentCard`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::A2AError::invalid_params`] if `url` was never
    /// set — an `AgentCard`'s `url` must be an absolute address.
    pub fn build(self) -> crate::A2AResult<AgentCard> {
        if self.url.is_empty() {
            return Err(crate::error::A2AError::invalid_params(
                "AgentCardBuilder: url must be set",
            ));
        }
        Ok(AgentCard {
            name: self.name,
            description: self.description,
            url: self.url,
            version: self.version,
            capabilities: self.capabilities,
            default_input_modes: self.default_input_modes,
            default_output_modes: self.default_output_modes,
            skills: self.skills,
            provider: self.provider,
            documentation_url: self.documentation_url,
        })
    }
}

/// Builder for constructing [`crate::client::A2AClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use a2a_rs::builders::ClientBuilder;
/// use std::time::Duration;
///
/// let client = ClientBuilder::new("http://localhost:7420")
///     .with_timeout(Duration::from_secs(30))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    timeout: Option<std::time::Duration>,
    headers: std::collections::HashMap<String, String>,
}

#[cfg(feature = "client")]
impl ClientBuilder {
    /// Create a new client builder for the given base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: std::collections::HashMap::new(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a custom HTTP header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add an Authorization header with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.into()),
        );
        self
    }

    /// Add an API key header.
    pub fn with_api_key(
        mut self,
        header_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        self.headers.insert(header_name.into(), api_key.into());
        self
    }

    /// Build the client by resolving the agent card and creating the transport.
    pub async fn build(self) -> crate::A2AResult<crate::client::A2AClient> {
        use crate::client::{A2AClient, CardResolver, JsonRpcTransport};

        let resolver = CardResolver::new();
        let card = resolver.resolve(&self.url).await?;

        let mut transport = JsonRpcTransport::new(card.url.clone());
        if let Some(timeout) = self.timeout {
            transport = transport.with_timeout(timeout);
        }
        for (key, value) in &self.headers {
            transport = transport.with_header(key, value);
        }

        Ok(A2AClient::with_transport_and_card(
            Box::new(transport),
            card,
        ))
    }

    /// Build a client from a direct endpoint URL (skip agent card resolution).
    pub fn build_from_endpoint(self) -> crate::client::A2AClient {
        use crate::client::{A2AClient, JsonRpcTransport};

        let mut transport = JsonRpcTransport::new(self.url.clone());

        if let Some(timeout) = self.timeout {
            transport = transport.with_timeout(timeout);
        }
        for (key, value) in &self.headers {
            transport = transport.with_header(key, value);
        }

        A2AClient::with_transport(Box::new(transport))
    }
}

/// Builder for constructing an A2A axum server with fluent configuration.
///
/// # Example
///
/// ```rust,ignore
/// use a2a_rs::builders::ServerBuilder;
/// use a2a_rs::server::{AgentExecutor, InMemoryTaskStore};
/// use std::sync::Arc;
///
/// # async fn example(executor: Arc<MyAgent>) {
/// let app = ServerBuilder::new(executor)
///     .with_agent_card(|builder| {
///         builder
///             .url("http://localhost:8080/a2a")
///             .with_skill("chat", "Chat", "Conversational AI", vec!["conversation".to_string()])
///             .with_streaming(true)
///     })
///     .with_task_store(Arc::new(InMemoryTaskStore::new()))
///     .with_cors(true)
///     .build("/a2a");
/// # }
/// ```
#[cfg(feature = "server")]
pub struct ServerBuilder<E: crate::server::AgentExecutor + 'static> {
    executor: std::sync::Arc<E>,
    task_store: Option<std::sync::Arc<dyn crate::server::TaskStore>>,
    agent_card: Option<AgentCard>,
    cors_enabled: bool,
}

#[cfg(feature = "server")]
impl<E: crate::server::AgentExecutor + 'static> ServerBuilder<E> {
    /// Create a new server builder with the given agent executor.
    pub fn new(executor: std::sync::Arc<E>) -> Self {
        Self {
            executor,
            task_store: None,
            agent_card: None,
            cors_enabled: false,
        }
    }

    /// Set the task store implementation.
    pub fn with_task_store(mut self, store: std::sync::Arc<dyn crate::server::TaskStore>) -> Self {
        self.task_store = Some(store);
        self
    }

    /// Configure the agent card using a builder callback.
    pub fn with_agent_card<F>(mut self, f: F) -> Self
    where
        F: FnOnce(AgentCardBuilder) -> AgentCardBuilder,
    {
        let builder = AgentCardBuilder::new("A2A Agent").description("An A2A-compatible agent").version("1.0.0");
        let builder = f(builder);
        self.agent_card = builder.build().ok();
        self
    }

    /// Set the agent card directly.
    pub fn with_agent_card_direct(mut self, card: AgentCard) -> Self {
        self.agent_card = Some(card);
        self
    }

    /// Enable or disable CORS middleware.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    /// Build the axum router, dispatching JSON-RPC requests at `endpoint`.
    pub fn build(self, endpoint: &str) -> axum::Router {
        use crate::server::{a2a_router, InMemoryTaskManager, InMemoryTaskStore};
        use std::sync::Arc;

        let store = self
            .task_store
            .unwrap_or_else(|| Arc::new(InMemoryTaskStore::new()));
        let manager: Arc<dyn crate::server::TaskManager> =
            Arc::new(InMemoryTaskManager::new(store, self.executor));
        let card = self.agent_card.unwrap_or_else(|| {
            AgentCardBuilder::new("A2A Agent")
                .description("An A2A-compatible agent")
                .version("1.0.0")
                .url(format!("http://localhost:8080{endpoint}"))
                .build()
                .expect("default agent card always has a url")
        });

        let mut router = a2a_router(manager, card, endpoint);

        if self.cors_enabled {
            use tower_http::cors::CorsLayer;
            router = router.layer(CorsLayer::permissive());
        }

        router
    }
}
