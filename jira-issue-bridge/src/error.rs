//! Error types and handling for the Jira issue bridge
//!
//! Every failure is a `JiraBridgeError`. Only configuration errors abort
//! startup; the gateway logs everything else and reports an absent result.

use thiserror::Error;

/// Custom error types for the Jira issue bridge
#[derive(Debug, Error)]
pub enum JiraBridgeError {
    /// Configuration errors (-32001)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Authentication failures (-32002)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Network errors (-32003)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Resource not found errors (-32005)
    #[error("Not found: {resource} '{key}' not found")]
    NotFound { resource: String, key: String },

    /// Invalid parameter errors (-32006)
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// No live session to the Jira instance (-32008)
    #[error("Connection unavailable: the Jira client is not initialized")]
    ConnectionUnavailable,

    /// A remote operation failed without further detail (-32009)
    #[error("Remote call failed: {operation} - {message}")]
    RemoteCall { operation: String, message: String },

    /// Releasing the session failed
    #[error("Close failed: {message}")]
    Close { message: String },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl JiraBridgeError {
    /// Get the MCP JSON-RPC error code for this error
    pub fn error_code(&self) -> i32 {
        match self {
            JiraBridgeError::Configuration { .. } => -32001,
            JiraBridgeError::Authentication { .. } => -32002,
            JiraBridgeError::Network { .. } => -32003,
            JiraBridgeError::NotFound { .. } => -32005,
            JiraBridgeError::InvalidParameter { .. } => -32006,
            JiraBridgeError::ConnectionUnavailable => -32008,
            JiraBridgeError::RemoteCall { .. } => -32009,
            JiraBridgeError::Close { .. } => -32603,
            JiraBridgeError::Internal { .. } => -32603,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            JiraBridgeError::Configuration { .. } => "configuration",
            JiraBridgeError::Authentication { .. } => "authentication",
            JiraBridgeError::Network { .. } => "network",
            JiraBridgeError::NotFound { .. } => "not_found",
            JiraBridgeError::InvalidParameter { .. } => "invalid_parameter",
            JiraBridgeError::ConnectionUnavailable => "connection_unavailable",
            JiraBridgeError::RemoteCall { .. } => "remote_call",
            JiraBridgeError::Close { .. } => "close",
            JiraBridgeError::Internal { .. } => "internal",
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        JiraBridgeError::Configuration {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        JiraBridgeError::Authentication {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        JiraBridgeError::Network {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, key: impl Into<String>) -> Self {
        JiraBridgeError::NotFound {
            resource: resource.into(),
            key: key.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        JiraBridgeError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a remote call error
    pub fn remote_call(operation: impl Into<String>, message: impl Into<String>) -> Self {
        JiraBridgeError::RemoteCall {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a close error
    pub fn close(message: impl Into<String>) -> Self {
        JiraBridgeError::Close {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        JiraBridgeError::Internal {
            message: message.into(),
        }
    }
}

/// Convert from gouqi errors to JiraBridgeError
impl From<gouqi::Error> for JiraBridgeError {
    fn from(err: gouqi::Error) -> Self {
        match err {
            gouqi::Error::Http(_) => JiraBridgeError::network(format!("HTTP error: {}", err)),
            gouqi::Error::IO(_) => JiraBridgeError::network(format!("IO error: {}", err)),
            gouqi::Error::Serde(_) => {
                JiraBridgeError::internal(format!("Serialization error: {}", err))
            }
            gouqi::Error::Unauthorized => JiraBridgeError::auth("JIRA authentication failed"),
            gouqi::Error::NotFound => JiraBridgeError::not_found("resource", "unknown"),
            gouqi::Error::Fault { .. } => {
                JiraBridgeError::internal(format!("JIRA API error: {}", err))
            }
            _ => JiraBridgeError::internal(format!("JIRA client error: {}", err)),
        }
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for JiraBridgeError {
    fn from(err: serde_json::Error) -> Self {
        JiraBridgeError::internal(format!("JSON error: {}", err))
    }
}

/// Result type alias for bridge operations
pub type JiraBridgeResult<T> = Result<T, JiraBridgeError>;
