//! Transfer operations
//!
//! Runs the data-channel half of an invocation after the control handshake:
//! opens the data connection, then drains either a listing or a file.
//!
//! Retrieval moves through these states:
//!
//! ```text
//! Idle -> AwaitingNotFoundCheck -> NotFound
//!                               -> AwaitingOverwriteDecision -> Declined
//!                                                            -> Writing -> Complete
//!                                                                       -> IncompleteTransfer
//! ```

use log::{info, warn};
use tokio::net::TcpStream;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol::markers::FILE_NOT_FOUND;
use crate::protocol::{Command, TransferRequest};
use crate::session::ControlHandle;
use crate::transfer::data_channel::open_data_stream;
use crate::transfer::file_ops::{PartialFile, receive_file};
use crate::transfer::listing::receive_listing;
use crate::transfer::prompt::OverwritePrompt;
use crate::transfer::results::TransferOutcome;

/// Performs the data-channel transfer for a negotiated request.
///
/// Takes ownership of the control handle; both connections are closed when
/// this returns, whatever the outcome.
pub async fn transfer<P>(
    request: &TransferRequest,
    control: ControlHandle,
    config: &ClientConfig,
    prompt: &mut P,
) -> Result<TransferOutcome>
where
    P: OverwritePrompt,
{
    let mut data_stream = open_data_stream(request.host(), request.data_port(), config).await?;

    match request.command() {
        Command::List => {
            // The listing only flows on the data connection.
            control.close().await;
            info!("Receiving directory structure from {}", request.data_addr());
            let entries = receive_listing(&mut data_stream, config.read_timeout()).await?;
            Ok(TransferOutcome::Listed(entries))
        }
        Command::Get => retrieve_file(request, control, data_stream, config, prompt).await,
    }
}

async fn retrieve_file<P>(
    request: &TransferRequest,
    mut control: ControlHandle,
    mut data_stream: TcpStream,
    config: &ClientConfig,
    prompt: &mut P,
) -> Result<TransferOutcome>
where
    P: OverwritePrompt,
{
    let filename = request
        .filename()
        .ok_or_else(|| ClientError::InvalidRequest("GET requires a filename".into()))?;

    let status = control.read_status(config.read_timeout()).await?;
    if status == FILE_NOT_FOUND {
        warn!("{} says File not found: {}", control.peer(), filename);
        return Err(ClientError::FileNotFoundOnServer(filename.to_string()));
    }

    let path = config.download_path(filename);
    let exists = tokio::fs::try_exists(&path)
        .await
        .map_err(|source| ClientError::LocalWrite {
            path: path.clone(),
            source,
        })?;

    if exists && !prompt.confirm(&path).await? {
        info!("Kept existing {}, transfer declined", path.display());
        return Ok(TransferOutcome::Declined { path });
    }

    info!("Receiving '{}' from {}", filename, request.data_addr());
    let destination = PartialFile::create(&path).await?;
    let bytes = receive_file(
        &mut data_stream,
        destination,
        config.read_timeout(),
        config.strip_padding,
    )
    .await?;

    Ok(TransferOutcome::Downloaded { path, bytes })
}
