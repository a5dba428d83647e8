//! Error types
//!
//! Defines the error taxonomy shared by the control session and the data
//! channel transfer.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Result alias used across the client.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Every terminal failure a single invocation can end with.
///
/// None of these are retried automatically. A declined overwrite is not an
/// error and therefore has no variant here.
#[derive(Debug)]
pub enum ClientError {
    /// Invocation parameters violate the request invariants. Raised before any I/O.
    InvalidRequest(String),
    /// The control or data socket could not be established.
    Connect { addr: String, source: io::Error },
    /// The control acknowledgment was not `OK`.
    Rejected(String),
    /// The server reported the requested file as missing on the control connection.
    FileNotFoundOnServer(String),
    /// The peer closed the connection before the terminating marker arrived.
    IncompleteTransfer { received: u64 },
    /// The local destination could not be opened, written or finalized.
    LocalWrite { path: PathBuf, source: io::Error },
    /// A connect or read did not finish within the configured bound.
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    IoError(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ClientError::Connect { addr, source } => {
                write!(f, "Failed to connect to {}: {}", addr, source)
            }
            ClientError::Rejected(reply) if reply.is_empty() => {
                write!(f, "Server closed the control connection without acknowledging")
            }
            ClientError::Rejected(reply) => write!(f, "Server rejected the request: {}", reply),
            ClientError::FileNotFoundOnServer(name) => {
                write!(f, "File not found on server: {}", name)
            }
            ClientError::IncompleteTransfer { received } => write!(
                f,
                "Connection closed before transfer completed ({} bytes received)",
                received
            ),
            ClientError::LocalWrite { path, source } => {
                write!(f, "Cannot write {}: {}", path.display(), source)
            }
            ClientError::Timeout { operation, after } => {
                write!(f, "Timed out after {:?} waiting for {}", after, operation)
            }
            ClientError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Connect { source, .. } | ClientError::LocalWrite { source, .. } => {
                Some(source)
            }
            ClientError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        ClientError::IoError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display_mentions_reply() {
        let err = ClientError::Rejected("Invalid Command".into());
        assert_eq!(err.to_string(), "Server rejected the request: Invalid Command");

        let closed = ClientError::Rejected(String::new());
        assert!(closed.to_string().contains("without acknowledging"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: ClientError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(matches!(err, ClientError::IoError(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
