//! Module `data_channel`
//!
//! Opens the data connection on the negotiated port. The server only binds
//! that port after reading the port number from the control connection, so
//! a refused connect right after negotiation is expected and retried with
//! exponential backoff.

use log::{debug, error, info};
use std::io::ErrorKind;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::utils::network;

/// Upper bound for the delay between two connection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Connects to `host:data_port`, retrying while the server is not listening yet.
///
/// # Behavior
///
/// - At most `data_connect_attempts` attempts are made
/// - The delay starts at `data_connect_backoff_ms` and doubles, capped at 2s
/// - Only refused or reset connects are retried; timeouts and other errors
///   fail immediately
pub async fn open_data_stream(host: &str, data_port: u16, config: &ClientConfig) -> Result<TcpStream> {
    let attempts = config.data_connect_attempts.max(1);
    let mut delay = config.data_connect_backoff();
    let mut attempt = 1;

    loop {
        match network::connect(host, data_port, config.connect_timeout()).await {
            Ok(stream) => {
                info!(
                    "Data connection established with {}:{} (attempt {}/{})",
                    host, data_port, attempt, attempts
                );
                return Ok(stream);
            }
            Err(ClientError::Connect { ref source, .. })
                if attempt < attempts && is_retryable(source.kind()) =>
            {
                debug!(
                    "Data port {}:{} not ready (attempt {}/{}): {}. Retrying in {:?}",
                    host, data_port, attempt, attempts, source, delay
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_BACKOFF);
                attempt += 1;
            }
            Err(e) => {
                error!(
                    "Failed to open data connection to {}:{} after {} attempts: {}",
                    host, data_port, attempt, e
                );
                return Err(e);
            }
        }
    }
}

fn is_retryable(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn fast_config(attempts: u32) -> ClientConfig {
        ClientConfig {
            connect_timeout_secs: 2,
            data_connect_attempts: attempts,
            data_connect_backoff_ms: 20,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connects_when_listener_ready() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let stream = open_data_stream("127.0.0.1", port, &fast_config(1)).await;
        assert!(stream.is_ok());
    }

    #[tokio::test]
    async fn test_gives_up_after_configured_attempts() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = open_data_stream("127.0.0.1", port, &fast_config(3)).await;
        assert!(matches!(result, Err(ClientError::Connect { .. })));
    }

    #[test]
    fn test_only_refusals_are_retried() {
        assert!(is_retryable(ErrorKind::ConnectionRefused));
        assert!(!is_retryable(ErrorKind::PermissionDenied));
    }
}
