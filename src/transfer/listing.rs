//! Directory listing drain
//!
//! Reads the data connection in bounded chunks until the listing-complete
//! marker and returns every entry in the order the server sent them.

use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::AsyncRead;

use crate::error::{ClientError, Result};
use crate::protocol::ListingDecoder;
use crate::protocol::markers::LIST_READ_LIMIT;
use crate::utils::network;

/// Drains a listing from `data_stream`.
///
/// The whole listing is consumed before returning. A connection closed
/// before the marker is a protocol violation and yields `IncompleteTransfer`.
pub async fn receive_listing<R>(data_stream: &mut R, read_timeout: Option<Duration>) -> Result<Vec<String>>
where
    R: AsyncRead + Unpin,
{
    let mut decoder = ListingDecoder::new();
    let mut entries = Vec::new();
    let mut received = 0u64;

    loop {
        let chunk =
            network::read_bounded(data_stream, LIST_READ_LIMIT, read_timeout, "directory listing")
                .await?;

        if chunk.is_empty() {
            warn!(
                "Data connection closed before listing marker ({} bytes, {} entries received)",
                received,
                entries.len()
            );
            return Err(ClientError::IncompleteTransfer { received });
        }
        received += chunk.len() as u64;

        for entry in decoder.feed(&chunk) {
            debug!("Listing entry: {}", entry);
            entries.push(entry);
        }

        if decoder.is_finished() {
            if decoder.trailing_bytes() > 0 {
                debug!(
                    "Ignoring {} bytes after listing marker",
                    decoder.trailing_bytes()
                );
            }
            info!("Directory listing complete: {} entries", entries.len());
            return Ok(entries);
        }
    }
}
