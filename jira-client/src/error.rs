use thiserror::Error;

use crate::operation::{EntityKind, Operation};

#[derive(Error, Debug)]
pub enum Error {
    /// The login exchange was rejected with 401.
    #[error("Failed to log in to JIRA due to authentication error")]
    AuthenticationFailed,

    #[error(
        "Invalid {entity} during {operation}{}",
        .target.as_deref().map(|t| format!(": {}", t)).unwrap_or_default()
    )]
    NotFound {
        entity: EntityKind,
        operation: Operation,
        target: Option<String>,
    },

    #[error("{status}: Unable to connect to JIRA during {operation}")]
    UnexpectedStatus { status: u16, operation: Operation },

    #[error("HTTP request failed during {operation}: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response during {operation}: {reason}")]
    MalformedResponse { operation: Operation, reason: String },

    #[error("Could not serialize the {operation} document: {reason}")]
    InvalidDocument { operation: Operation, reason: String },

    #[error("Invalid input for {operation}: {reason}")]
    InvalidInput { operation: Operation, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The operation the error was raised for, if it came from one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::AuthenticationFailed => Some(Operation::Login),
            Error::NotFound { operation, .. }
            | Error::UnexpectedStatus { operation, .. }
            | Error::Transport { operation, .. }
            | Error::MalformedResponse { operation, .. }
            | Error::InvalidDocument { operation, .. }
            | Error::InvalidInput { operation, .. } => Some(*operation),
            Error::InvalidConfiguration(_) | Error::ConfigurationMissing(_) => None,
        }
    }

    /// HTTP status behind the error, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AuthenticationFailed => Some(401),
            Error::NotFound { .. } => Some(404),
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
