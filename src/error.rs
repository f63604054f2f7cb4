//! A2A error types — JSON-RPC error codes + A2A-specific errors.
//!
//! - Standard JSON-RPC 2.0 errors (-32700 through -32603)
//! - A2A-specific errors (-32001 through -32005)

use crate::types::JsonRpcError;

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes
// ---------------------------------------------------------------------------

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i64 = -32700;

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i64 = -32600;

/// The method does not exist / is not available.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid method parameter(s).
pub const INVALID_PARAMS: i64 = -32602;

/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

// ---------------------------------------------------------------------------
// A2A-specific error codes
// ---------------------------------------------------------------------------

/// The requested task was not found.
pub const TASK_NOT_FOUND: i64 = -32001;

/// The task cannot be canceled in its current state.
pub const TASK_NOT_CANCELABLE: i64 = -32002;

/// Push notifications are not supported by this agent.
pub const PUSH_NOTIFICATION_NOT_SUPPORTED: i64 = -32003;

/// The requested operation is not supported.
pub const UNSUPPORTED_OPERATION: i64 = -32004;

/// The content type is not supported.
pub const CONTENT_TYPE_NOT_SUPPORTED: i64 = -32005;

// ---------------------------------------------------------------------------
// A2AError enum
// ---------------------------------------------------------------------------

/// Unified error type for all A2A and JSON-RPC errors.
///
/// Each variant carries a human-readable message and an optional structured
/// `data` payload.
///
/// Also includes transport/client-side error variants that are not part of
/// the protocol error taxonomy but are needed for a complete Rust SDK.
#[derive(Debug, Clone, thiserror::Error)]
pub enum A2AError {
    // -- A2A protocol errors (map to JSON-RPC error codes) --
    //
    // Each variant carries a human-readable message and an optional structured
    // `data` payload, mirroring the JSON-RPC error object's `message` and
    // optional `data` fields.
    /// Invalid JSON payload (code -32700).
    #[error("Parse error: {message}")]
    ParseError {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data (e.g. parse error details).
        data: Option<serde_json::Value>,
    },

    /// Request payload validation error (code -32600).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data (e.g. validation errors).
        data: Option<serde_json::Value>,
    },

    /// Method not found (code -32601).
    #[error("Method not found: {message}")]
    MethodNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Invalid parameters (code -32602).
    #[error("Invalid params: {message}")]
    InvalidParams {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data (e.g. validation errors).
        data: Option<serde_json::Value>,
    },

    /// Internal error (code -32603).
    #[error("Internal error: {message}")]
    InternalError {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Task not found (code -32001).
    #[error("Task not found: {message}")]
    TaskNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Task cannot be canceled (code -32002).
    #[error("Task not cancelable: {message}")]
    TaskNotCancelable {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Push notifications not supported (code -32003).
    #[error("Push notification not supported: {message}")]
    PushNotificationNotSupported {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Operation not supported (code -32004).
    #[error("Unsupported operation: {message}")]
    UnsupportedOperation {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Content type not supported (code -32005).
    #[error("Content type not supported: {message}")]
    ContentTypeNotSupported {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    // -- Client/transport-side errors (not A2A error codes) --
    /// Transport-level error (connection failed, request failed, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or stream timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error with status code and response body.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Invalid JSON received from remote (parse or deserialization failure).
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A JSON-RPC error response was received from the remote agent.
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for A2A operations.
pub type A2AResult<T> = Result<T, A2AError>;

impl A2AError {
    // -- Convenience constructors (message-only, no data) --

    /// Create a `ParseError` with a message and no data.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `InvalidRequest` with a message and no data.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `MethodNotFound` with a message and no data.
    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::MethodNotFound {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `InvalidParams` with a message and no data.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `InternalError` with a message and no data.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `TaskNotFound` with a message and no data.
    pub fn task_not_found(message: impl Into<String>) -> Self {
        Self::TaskNotFound {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `TaskNotCancelable` with a message and no data.
    pub fn task_not_cancelable(message: impl Into<String>) -> Self {
        Self::TaskNotCancelable {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `PushNotificationNotSupported` with a message and no data.
    pub fn push_notification_not_supported(message: impl Into<String>) -> Self {
        Self::PushNotificationNotSupported {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `UnsupportedOperation` with a message and no data.
    pub fn unsupported_operation(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `ContentTypeNotSupported` with a message and no data.
    pub fn content_type_not_supported(message: impl Into<String>) -> Self {
        Self::ContentTypeNotSupported {
            message: message.into(),
            data: None,
        }
    }

    /// Returns the JSON-RPC error code for this error variant.
    ///
    /// For transport/client-side errors that don't map to A2A codes,
    /// returns -32603 (internal error).
    pub fn code(&self) -> i64 {
        match self {
            A2AError::ParseError { .. } => PARSE_ERROR,
            A2AError::InvalidRequest { .. } => INVALID_REQUEST,
            A2AError::MethodNotFound { .. } => METHOD_NOT_FOUND,
            A2AError::InvalidParams { .. } => INVALID_PARAMS,
            A2AError::InternalError { .. } => INTERNAL_ERROR,
            A2AError::TaskNotFound { .. } => TASK_NOT_FOUND,
            A2AError::TaskNotCancelable { .. } => TASK_NOT_CANCELABLE,
            A2AError::PushNotificationNotSupported { .. } => PUSH_NOTIFICATION_NOT_SUPPORTED,
            A2AError::UnsupportedOperation { .. } => UNSUPPORTED_OPERATION,
            A2AError::ContentTypeNotSupported { .. } => CONTENT_TYPE_NOT_SUPPORTED,
            // Client/transport errors map to internal error.
            A2AError::Transport(_)
            | A2AError::Timeout(_)
            | A2AError::Http { .. }
            | A2AError::InvalidJson(_)
            | A2AError::Other(_) => INTERNAL_ERROR,
            A2AError::JsonRpc { code, .. } => *code,
        }
    }

    /// Returns the default human-readable message for this error variant.
    pub fn default_message(&self) -> &str {
        match self {
            A2AError::ParseError { .. } => "Invalid JSON payload",
            A2AError::InvalidRequest { .. } => "Request payload validation error",
            A2AError::MethodNotFound { .. } => "Method not found",
            A2AError::InvalidParams { .. } => "Invalid parameters",
            A2AError::InternalError { .. } => "Internal error",
            A2AError::TaskNotFound { .. } => "Task not found",
            A2AError::TaskNotCancelable { .. } => "Task cannot be canceled",
            A2AError::PushNotificationNotSupported { .. } => "Push Notification is not supported",
            A2AError::UnsupportedOperation { .. } => "This operation is not supported",
            A2AError::ContentTypeNotSupported { .. } => "Incompatible content types",
            A2AError::Transport(_) => "Transport error",
            A2AError::Timeout(_) => "Request timed out",
            A2AError::Http { .. } => "HTTP error",
            A2AError::InvalidJson(_) => "Invalid JSON",
            A2AError::JsonRpc { .. } => "JSON-RPC error",
            A2AError::Other(_) => "Error",
        }
    }
}

impl From<A2AError> for JsonRpcError {
    fn from(err: A2AError) -> Self {
        let code = err.code();
        let message = err.to_string();
        // Preserve structured data from protocol error variants and JsonRpc variant.
        let data = match &err {
            A2AError::ParseError { data, .. }
            | A2AError::InvalidRequest { data, .. }
            | A2AError::MethodNotFound { data, .. }
            | A2AError::InvalidParams { data, .. }
            | A2AError::InternalError { data, .. }
            | A2AError::TaskNotFound { data, .. }
            | A2AError::TaskNotCancelable { data, .. }
            | A2AError::PushNotificationNotSupported { data, .. }
            | A2AError::UnsupportedOperation { data, .. }
            | A2AError::ContentTypeNotSupported { data, .. }
            | A2AError::JsonRpc { data, .. } => data.clone(),
            _ => None,
        };
        JsonRpcError {
            code,
            message,
            data,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::ParseError {
            message: err.to_string(),
            data: None,
        }
    }
}
