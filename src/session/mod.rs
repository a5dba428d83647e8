//! Control session
//!
//! Handshake on the control connection that precedes every transfer.

pub mod control;

pub use control::{ControlHandle, negotiate};
