//! Transfer request
//!
//! The validated parameters of one invocation. A `TransferRequest` can only
//! be built through `list` or `get`, which enforce its invariants before any
//! network I/O happens.

use crate::error::{ClientError, Result};
use crate::protocol::commands::{self, Command, TOKEN_WIDTH};

/// Lowest port a request may use for either connection.
pub const MIN_PORT: u16 = 1024;

/// The server only serves text files.
pub const REQUIRED_EXTENSION: &str = ".txt";

/// The server reads at most 500 request bytes, token included.
pub const MAX_FILENAME_LEN: usize = 500 - TOKEN_WIDTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    host: String,
    control_port: u16,
    command: Command,
    data_port: u16,
    filename: Option<String>,
}

impl TransferRequest {
    /// Builds a directory listing request.
    pub fn list(host: impl Into<String>, control_port: u16, data_port: u16) -> Result<Self> {
        Self {
            host: host.into(),
            control_port,
            command: Command::List,
            data_port,
            filename: None,
        }
        .validated()
    }

    /// Builds a file retrieval request.
    pub fn get(
        host: impl Into<String>,
        control_port: u16,
        filename: impl Into<String>,
        data_port: u16,
    ) -> Result<Self> {
        Self {
            host: host.into(),
            control_port,
            command: Command::Get,
            data_port,
            filename: Some(filename.into()),
        }
        .validated()
    }

    fn validated(self) -> Result<Self> {
        if self.host.trim().is_empty() {
            return Err(invalid("host cannot be empty"));
        }

        for (name, port) in [("control", self.control_port), ("data", self.data_port)] {
            if port < MIN_PORT {
                return Err(invalid(format!(
                    "{} port {} must be between {} and 65535",
                    name, port, MIN_PORT
                )));
            }
        }

        if self.control_port == self.data_port {
            return Err(invalid("control port and data port must differ"));
        }

        match (&self.filename, self.command.takes_filename()) {
            (Some(name), true) => validate_filename(name)?,
            (None, false) => {}
            (Some(_), false) => return Err(invalid("LIST does not take a filename")),
            (None, true) => return Err(invalid("GET requires a filename")),
        }

        Ok(self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn control_port(&self) -> u16 {
        self.control_port
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn data_port(&self) -> u16 {
        self.data_port
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// `host:port` of the control connection, for messages.
    pub fn control_addr(&self) -> String {
        format!("{}:{}", self.host, self.control_port)
    }

    /// `host:port` of the data connection, for messages.
    pub fn data_addr(&self) -> String {
        format!("{}:{}", self.host, self.data_port)
    }

    /// Control-connection request bytes.
    pub fn encode(&self) -> Vec<u8> {
        commands::encode_request(self.command, self.filename())
    }
}

/// The file lands in the local download directory under the same name,
/// so only a bare `.txt` file name is accepted.
fn validate_filename(name: &str) -> Result<()> {
    if !name.ends_with(REQUIRED_EXTENSION) || name.len() == REQUIRED_EXTENSION.len() {
        return Err(invalid(format!(
            "filename {:?} must end in {}",
            name, REQUIRED_EXTENSION
        )));
    }
    if name.len() > MAX_FILENAME_LEN {
        return Err(invalid(format!(
            "filename is longer than {} bytes",
            MAX_FILENAME_LEN
        )));
    }
    if name.contains(['/', '\\', '\0']) || name.starts_with("..") {
        return Err(invalid(format!("filename {:?} is not a plain file name", name)));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ClientError {
    ClientError::InvalidRequest(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(result: Result<TransferRequest>) {
        assert!(
            matches!(result, Err(ClientError::InvalidRequest(_))),
            "expected InvalidRequest, got {:?}",
            result
        );
    }

    #[test]
    fn test_valid_list_request() {
        let request = TransferRequest::list("flip1", 30020, 30021).unwrap();
        assert_eq!(request.command(), Command::List);
        assert_eq!(request.filename(), None);
        assert_eq!(request.encode(), b"-l".to_vec());
        assert_eq!(request.data_addr(), "flip1:30021");
    }

    #[test]
    fn test_valid_get_request() {
        let request = TransferRequest::get("flip1", 30020, "short.txt", 30021).unwrap();
        assert_eq!(request.filename(), Some("short.txt"));
        assert_eq!(request.encode(), b"-gshort.txt".to_vec());
    }

    #[test]
    fn test_ports_must_differ() {
        assert_invalid(TransferRequest::list("localhost", 30020, 30020));
    }

    #[test]
    fn test_ports_below_range_rejected() {
        assert_invalid(TransferRequest::list("localhost", 80, 30021));
        assert_invalid(TransferRequest::list("localhost", 30020, 1023));
        assert!(TransferRequest::list("localhost", 1024, 65535).is_ok());
    }

    #[test]
    fn test_empty_host_rejected() {
        assert_invalid(TransferRequest::list("  ", 30020, 30021));
    }

    #[test]
    fn test_get_requires_txt_extension() {
        assert_invalid(TransferRequest::get("localhost", 30020, "image.png", 30021));
        assert_invalid(TransferRequest::get("localhost", 30020, ".txt", 30021));
        assert_invalid(TransferRequest::get("localhost", 30020, "", 30021));
    }

    #[test]
    fn test_get_rejects_paths() {
        assert_invalid(TransferRequest::get("localhost", 30020, "../etc.txt", 30021));
        assert_invalid(TransferRequest::get("localhost", 30020, "dir/a.txt", 30021));
    }

    #[test]
    fn test_get_rejects_overlong_name() {
        let name = format!("{}.txt", "a".repeat(MAX_FILENAME_LEN));
        assert_invalid(TransferRequest::get("localhost", 30020, name, 30021));
    }
}
