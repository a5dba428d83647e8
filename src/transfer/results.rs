//! Transfer result types
//!
//! Defines the non-error terminal states of a transfer.

use std::path::PathBuf;

/// How a successful invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Directory entries, in the order the server sent them.
    Listed(Vec<String>),
    /// The file was retrieved and saved.
    Downloaded { path: PathBuf, bytes: u64 },
    /// The destination already existed and replacing it was declined.
    /// Nothing was written.
    Declined { path: PathBuf },
}
