//! Error handlers
//!
//! Maps client errors to process exit statuses and logs them.

use crate::error::types::ClientError;
use log::error;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
/// Conventional status for a run cut short by SIGINT.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Handle a client error
pub fn handle_error(err: &ClientError) {
    error!("Transfer failed: {}", err);
}

/// Convert error to process exit status
pub fn error_to_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::InvalidRequest(_) => EXIT_USAGE,
        ClientError::Connect { .. } => EXIT_FAILURE,
        ClientError::Rejected(_) => EXIT_FAILURE,
        ClientError::FileNotFoundOnServer(_) => EXIT_FAILURE,
        ClientError::IncompleteTransfer { .. } => EXIT_FAILURE,
        ClientError::LocalWrite { .. } => EXIT_FAILURE,
        ClientError::Timeout { .. } => EXIT_FAILURE,
        ClientError::IoError(_) => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_invalid_request_is_usage_error() {
        let err = ClientError::InvalidRequest("bad port".into());
        assert_eq!(error_to_exit_code(&err), EXIT_USAGE);
    }

    #[test]
    fn test_runtime_failures_are_non_zero() {
        let errors = [
            ClientError::Rejected("no".into()),
            ClientError::FileNotFoundOnServer("a.txt".into()),
            ClientError::IncompleteTransfer { received: 7 },
            ClientError::Connect {
                addr: "localhost:30020".into(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        ];
        for err in &errors {
            assert_eq!(error_to_exit_code(err), EXIT_FAILURE, "{}", err);
        }
    }
}
