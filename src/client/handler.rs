//! Client façade
//!
//! Runs one invocation end to end: control handshake, then the data-channel
//! transfer with the control handle moved into it.

use log::info;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::TransferRequest;
use crate::session::negotiate;
use crate::transfer::{OverwritePrompt, TransferOutcome, transfer};

/// A single-shot transfer client.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Negotiates `request` on the control connection and performs the transfer.
    ///
    /// Both connections and any partial download are released on every exit
    /// path, including when the returned future is dropped.
    pub async fn run<P>(&self, request: &TransferRequest, prompt: &mut P) -> Result<TransferOutcome>
    where
        P: OverwritePrompt,
    {
        info!(
            "Starting {} with {} (data port {})",
            request.command(),
            request.control_addr(),
            request.data_port()
        );

        let control = negotiate(request, &self.config).await?;
        let outcome = transfer(request, control, &self.config, prompt).await?;

        info!("{} finished: {}", request.command(), outcome_summary(&outcome));
        Ok(outcome)
    }
}

fn outcome_summary(outcome: &TransferOutcome) -> String {
    match outcome {
        TransferOutcome::Listed(entries) => format!("{} entries", entries.len()),
        TransferOutcome::Downloaded { path, bytes } => {
            format!("{} bytes saved to {}", bytes, path.display())
        }
        TransferOutcome::Declined { path } => format!("kept {}", path.display()),
    }
}
