//! Transfer client
//!
//! Ties the control session and the data channel transfer together.

pub mod handler;

pub use handler::Client;
