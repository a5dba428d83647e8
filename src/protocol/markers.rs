//! Sentinel markers and read bounds
//!
//! Messages on both connections have no length prefix. The end of a message
//! is an in-band byte sequence instead, and the protocol has no escaping:
//! a directory named `complete` (sent NUL padded) or a file containing
//! `__complete__` is indistinguishable from a real terminator. This is a known
//! limitation of the wire format and is kept for compatibility.

/// Control acknowledgment that lets the client send its data port.
pub const ACK_OK: &[u8] = b"OK";

/// Ends a directory listing on the data connection.
pub const LISTING_COMPLETE: &[u8] = b"complete\0";

/// Body of `LISTING_COMPLETE` without its NUL terminator.
pub const LISTING_COMPLETE_TOKEN: &[u8] = b"complete";

/// Sent on the control connection when a GET names a missing file.
pub const FILE_NOT_FOUND: &[u8] = b"File not found";

/// Ends file content on the data connection. Matched as a substring.
pub const FILE_COMPLETE: &[u8] = b"__complete__";

// Bounded read sizes
pub const CONTROL_READ_LIMIT: usize = 100;
pub const LIST_READ_LIMIT: usize = 100;
pub const FILE_READ_LIMIT: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_token_matches_marker() {
        let (body, terminator) = LISTING_COMPLETE.split_at(LISTING_COMPLETE.len() - 1);
        assert_eq!(body, LISTING_COMPLETE_TOKEN);
        assert_eq!(terminator, b"\0");
    }
}
