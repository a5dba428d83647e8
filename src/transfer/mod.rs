//! Data channel transfer
//!
//! Opens the data connection negotiated by the control session and drains a
//! directory listing or a file from it.

pub mod data_channel;
pub mod file_ops;
pub mod listing;
pub mod operations;
pub mod prompt;
pub mod results;

// Re-export key types and functions
pub use data_channel::open_data_stream;
pub use file_ops::{PartialFile, receive_file};
pub use listing::receive_listing;
pub use operations::transfer;
pub use prompt::{ConsolePrompt, FixedAnswer, OverwritePolicy, OverwritePrompt, PolicyPrompt};
pub use results::TransferOutcome;
