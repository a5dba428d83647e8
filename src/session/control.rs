//! Control session
//!
//! Opens the control connection, sends the request, checks the
//! acknowledgment and announces the data port. The resulting
//! `ControlHandle` owns the control stream and is moved into the transfer
//! step, which needs it for the GET status reply.

use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol::TransferRequest;
use crate::protocol::commands::encode_data_port;
use crate::protocol::markers::{ACK_OK, CONTROL_READ_LIMIT};
use crate::utils::network;

/// Exclusive owner of a negotiated control connection.
///
/// Dropping the handle closes the connection.
#[derive(Debug)]
pub struct ControlHandle {
    stream: TcpStream,
    peer: String,
}

impl ControlHandle {
    /// Reads one bounded message sent by the server after negotiation.
    pub async fn read_status(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>> {
        network::read_bounded(
            &mut self.stream,
            CONTROL_READ_LIMIT,
            timeout,
            "control status",
        )
        .await
    }

    /// `host:port` of the control connection.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Closes the control connection.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!("Control connection to {} already closed: {}", self.peer, e);
        }
    }
}

/// Performs the control handshake for `request`.
///
/// # Errors
///
/// * `Connect` / `Timeout` if the control connection cannot be opened.
/// * `Rejected` if the acknowledgment is anything but `OK`. The connection
///   is closed before returning and nothing is retried.
pub async fn negotiate(request: &TransferRequest, config: &ClientConfig) -> Result<ControlHandle> {
    let peer = request.control_addr();
    let mut stream = network::connect(
        request.host(),
        request.control_port(),
        config.connect_timeout(),
    )
    .await?;
    info!("Control connection established with {}", peer);

    let message = request.encode();
    stream.write_all(&message).await?;
    stream.flush().await?;
    debug!(
        "Sent {} request to {}: {:?}",
        request.command(),
        peer,
        String::from_utf8_lossy(&message)
    );

    let ack = network::read_bounded(
        &mut stream,
        CONTROL_READ_LIMIT,
        config.read_timeout(),
        "control acknowledgment",
    )
    .await?;

    if ack != ACK_OK {
        let reply = String::from_utf8_lossy(&ack)
            .trim_end_matches('\0')
            .to_string();
        warn!("{} rejected {} request: {:?}", peer, request.command(), reply);
        let handle = ControlHandle { stream, peer };
        handle.close().await;
        return Err(ClientError::Rejected(reply));
    }

    stream
        .write_all(&encode_data_port(request.data_port()))
        .await?;
    stream.flush().await?;
    info!(
        "{} acknowledged {} request, data port {} announced",
        peer,
        request.command(),
        request.data_port()
    );

    Ok(ControlHandle { stream, peer })
}
