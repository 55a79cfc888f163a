use crate::{Operation, Resource};
use thiserror::Error;

/// Why a request did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The request never got a response (connection refused, timeout, ...).
    Transport(String),
    /// The response body was not the JSON we expected.
    Decode(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Status(status) => write!(f, "HTTP {}", status),
            FailureReason::Transport(msg) => write!(f, "transport error: {}", msg),
            FailureReason::Decode(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

/// The single failure kind of the API client layer.
///
/// No distinction is made between 4xx and 5xx for handling purposes; the
/// status is kept for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed: {operation} {resource}: {reason}")]
pub struct RequestFailed {
    pub resource: Resource,
    pub operation: Operation,
    pub reason: FailureReason,
}

impl RequestFailed {
    pub fn new(resource: Resource, operation: Operation, reason: FailureReason) -> Self {
        Self {
            resource,
            operation,
            reason,
        }
    }

    pub fn status(resource: Resource, operation: Operation, status: u16) -> Self {
        Self::new(resource, operation, FailureReason::Status(status))
    }

    /// HTTP status, when the server answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self.reason {
            FailureReason::Status(status) => Some(status),
            _ => None,
        }
    }

    /// Localized message naming the failed operation.
    pub fn localized(&self) -> String {
        match self.operation {
            Operation::List => format!("Falha ao buscar {}", self.resource.plural()),
            Operation::Create => format!("Falha ao criar {}", self.resource.singular()),
            Operation::Update => format!("Falha ao atualizar {}", self.resource.singular()),
            Operation::Delete => format!("Falha ao excluir {}", self.resource.singular()),
        }
    }
}

/// Invalid client configuration, detected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
