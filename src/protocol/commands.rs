//! Module `commands`
//!
//! Defines the two commands the server understands and how a request is put
//! on the control connection.

use std::fmt;

/// Every command token occupies exactly this many bytes on the wire.
///
/// The request carries no delimiter between the token and the filename, so
/// the server splits it by position. Tokens must keep this width.
pub const TOKEN_WIDTH: usize = 2;

const LIST_TOKEN: &str = "-l";
const GET_TOKEN: &str = "-g";

const _: () = assert!(LIST_TOKEN.len() == TOKEN_WIDTH && GET_TOKEN.len() == TOKEN_WIDTH);

/// Represents a command sent on the control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List, // Directory listing over the data connection
    Get,  // File retrieval over the data connection
}

impl Command {
    /// Returns the fixed-width wire token for this command.
    pub fn token(self) -> &'static str {
        match self {
            Command::List => LIST_TOKEN,
            Command::Get => GET_TOKEN,
        }
    }

    /// Parses a wire token. Returns `None` for anything but `-l` or `-g`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            LIST_TOKEN => Some(Command::List),
            GET_TOKEN => Some(Command::Get),
            _ => None,
        }
    }

    /// Whether this command carries a filename.
    pub fn takes_filename(self) -> bool {
        matches!(self, Command::Get)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::List => write!(f, "LIST"),
            Command::Get => write!(f, "GET"),
        }
    }
}

/// Builds the control request: token immediately followed by the filename.
pub fn encode_request(command: Command, filename: Option<&str>) -> Vec<u8> {
    let filename = filename.unwrap_or("");
    let mut message = Vec::with_capacity(TOKEN_WIDTH + filename.len());
    message.extend_from_slice(command.token().as_bytes());
    message.extend_from_slice(filename.as_bytes());
    message
}

/// Encodes the data port as the server expects it: plain decimal text.
pub fn encode_data_port(port: u16) -> Vec<u8> {
    port.to_string().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        assert_eq!(Command::from_token("-l"), Some(Command::List));
        assert_eq!(Command::from_token("-g"), Some(Command::Get));
        assert_eq!(Command::from_token("-x"), None);
        assert_eq!(Command::from_token("-list"), None);
    }

    #[test]
    fn test_encode_list_has_no_filename() {
        assert_eq!(encode_request(Command::List, None), b"-l".to_vec());
    }

    #[test]
    fn test_encode_get_concatenates_without_delimiter() {
        assert_eq!(
            encode_request(Command::Get, Some("notes.txt")),
            b"-gnotes.txt".to_vec()
        );
    }

    #[test]
    fn test_filename_starts_at_token_width() {
        let message = encode_request(Command::Get, Some("a.txt"));
        assert_eq!(&message[TOKEN_WIDTH..], b"a.txt");
    }

    #[test]
    fn test_encode_data_port() {
        assert_eq!(encode_data_port(30021), b"30021".to_vec());
    }
}
