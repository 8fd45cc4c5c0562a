use crate::notify::{Notification, Severity};
use crate::types::CollectionKind;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Remote call rejected or failed at the gateway (network, auth, validation)
    #[error("Failed to {operation} {collection}: {message}")]
    Gateway {
        operation: GatewayOperation,
        collection: String,
        message: String,
    },

    /// Remote call failed before a response was received
    #[error("Request to {collection} failed")]
    Transport {
        collection: String,
        #[source]
        source: reqwest::Error,
    },

    /// Privileged auth-admin client not configured (no service-role key)
    #[error("Privileged identity operations are not configured")]
    MissingCapability { operation: String },

    /// Invalid input caught before any remote call is issued
    #[error("{message}")]
    Validation { message: String },

    /// Requested record not found in the remote collection
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The remote operation that failed, for notification titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayOperation {
    Fetch,
    Create,
    Update,
    Delete,
    Upload,
    Invoke,
}

impl std::fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayOperation::Fetch => "fetch",
            GatewayOperation::Create => "create",
            GatewayOperation::Update => "update",
            GatewayOperation::Delete => "delete",
            GatewayOperation::Upload => "upload",
            GatewayOperation::Invoke => "invoke",
        };
        f.write_str(s)
    }
}

impl Error {
    pub fn gateway(operation: GatewayOperation, collection: CollectionKind, message: impl Into<String>) -> Self {
        Error::Gateway {
            operation,
            collection: collection.as_str().to_string(),
            message: message.into(),
        }
    }

    /// Returns a user-safe message, without leaking internal details
    pub fn user_message(&self) -> String {
        match self {
            Error::Gateway {
                operation, collection, ..
            } => format!("Failed to {operation} {collection}"),
            Error::Transport { collection, .. } => {
                format!("Could not reach the server while accessing {collection}")
            }
            Error::MissingCapability { .. } => "This action requires elevated access that is not configured".to_string(),
            Error::Validation { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Other(_) => "Internal error".to_string(),
        }
    }

    /// Map the error to the title/message/severity triple the presentation layer
    /// renders as a blocking modal. This is the only structured error surface
    /// exposed beyond logs.
    pub fn notification(&self, title: impl Into<String>) -> Notification {
        let severity = match self {
            Error::Validation { .. } => Severity::Warning,
            _ => Severity::Error,
        };
        Notification {
            title: title.into(),
            message: self.user_message(),
            severity,
        }
    }
}

/// Type alias for operation results across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_user_message_hides_details() {
        let err = Error::gateway(GatewayOperation::Create, CollectionKind::Jobs, "duplicate key value violates unique constraint");
        assert_eq!(err.user_message(), "Failed to create jobs");
    }

    #[test]
    fn validation_error_maps_to_warning() {
        let err = Error::Validation {
            message: "Message body cannot be empty".to_string(),
        };
        let n = err.notification("Send failed");
        assert_eq!(n.severity, Severity::Warning);
        assert_eq!(n.message, "Message body cannot be empty");
        assert_eq!(n.title, "Send failed");
    }
}
