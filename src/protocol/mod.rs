//! Wire protocol
//!
//! Command tokens, request encoding, sentinel markers and the framing
//! decoders for both connections.

pub mod commands;
pub mod framing;
pub mod markers;
pub mod request;

pub use commands::Command;
pub use framing::{ListingDecoder, Scanned, SentinelScanner};
pub use request::TransferRequest;
