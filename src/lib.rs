pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transfer;
pub mod utils;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use protocol::{Command, TransferRequest};
pub use transfer::TransferOutcome;
