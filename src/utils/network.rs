//! Network utilities
//!
//! Timed connects and bounded reads shared by both connections.

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;

use crate::error::{ClientError, Result};

/// Connects to `host:port`, failing with `Timeout` after `timeout`.
pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => Err(ClientError::Connect {
            addr: format!("{}:{}", host, port),
            source,
        }),
        Err(_) => Err(ClientError::Timeout {
            operation: "connection",
            after: timeout,
        }),
    }
}

/// Performs one read of at most `limit` bytes.
///
/// An empty result means the peer closed the connection. With `timeout` set
/// to `None` the read blocks until data or EOF arrives.
pub async fn read_bounded<R>(
    reader: &mut R,
    limit: usize,
    timeout: Option<Duration>,
    operation: &'static str,
) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; limit];
    let n = match timeout {
        Some(after) => tokio::time::timeout(after, reader.read(&mut buffer))
            .await
            .map_err(|_| ClientError::Timeout { operation, after })??,
        None => reader.read(&mut buffer).await?,
    };
    buffer.truncate(n);
    Ok(buffer)
}
