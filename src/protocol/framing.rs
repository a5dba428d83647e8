//! Module `framing`
//!
//! Incremental decoders for the two sentinel-terminated data streams.
//! Both accept arbitrary chunk boundaries: TCP may merge or split the
//! server's writes, and the result must not depend on how it did.

use crate::protocol::markers::{LISTING_COMPLETE, LISTING_COMPLETE_TOKEN};

/// Reassembles listing entries from raw data-connection chunks.
///
/// Every read the server answers with is one chunk, and the end of a chunk
/// ends an entry. Within a chunk, entries are separated by `\n` or NUL. The
/// reference server writes every name as a NUL-padded 100-byte record, so runs
/// of NUL produce empty entries, which are skipped. The token `complete`
/// followed by NUL ends the listing.
///
/// Trailing bytes that could still grow into the end marker are held until
/// the next chunk decides them, so a marker split across reads is found.
#[derive(Debug, Default)]
pub struct ListingDecoder {
    pending: Vec<u8>,
    finished: bool,
    trailing: usize,
}

impl ListingDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the entries it completed, in order.
    ///
    /// Bytes after the end marker are counted in `trailing_bytes` and dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.finished {
            self.trailing += chunk.len();
            return Vec::new();
        }

        let mut entries = Vec::new();
        if !self.pending.is_empty() && !continues_marker(&self.pending, chunk) {
            // The held bytes were a chunk of their own.
            entries.extend(decode_entry(&self.pending));
            self.pending.clear();
        }
        self.pending.extend_from_slice(chunk);

        let mut start = 0;
        while let Some(offset) = self.pending[start..]
            .iter()
            .position(|b| *b == b'\n' || *b == 0)
        {
            let end = start + offset;
            let separator = self.pending[end];
            let token = &self.pending[start..end];
            start = end + 1;

            if separator == 0 && token == LISTING_COMPLETE_TOKEN {
                self.finished = true;
                break;
            }
            if let Some(entry) = decode_entry(token) {
                entries.push(entry);
            }
        }

        if self.finished {
            self.trailing += self.pending.len() - start;
            self.pending.clear();
        } else {
            self.pending.drain(..start);
            if !LISTING_COMPLETE.starts_with(&self.pending) {
                entries.extend(decode_entry(&self.pending));
                self.pending.clear();
            }
        }
        entries
    }

    /// Whether the end marker has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes received after the end marker.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }
}

/// Whether `chunk` carries on the end marker that `held` started.
fn continues_marker(held: &[u8], chunk: &[u8]) -> bool {
    let Some(rest) = LISTING_COMPLETE.strip_prefix(held) else {
        return false;
    };
    let n = rest.len().min(chunk.len());
    rest[..n] == chunk[..n]
}

/// Strips line-ending and padding bytes only; spaces belong to the name.
fn decode_entry(token: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(token);
    let trimmed = text.trim_matches(|c| c == '\r' || c == '\0');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Result of scanning one chunk of file content.
#[derive(Debug, PartialEq, Eq)]
pub struct Scanned {
    /// Bytes that are definitely payload.
    pub payload: Vec<u8>,
    /// The marker was found; `payload` ends right before it.
    pub complete: bool,
}

/// Finds a substring marker in a byte stream fed in chunks.
///
/// A suffix that could be the start of the marker is held back until the next
/// chunk decides it, so a marker straddling two reads is still found and is
/// never written out as payload.
#[derive(Debug)]
pub struct SentinelScanner {
    marker: &'static [u8],
    carry: Vec<u8>,
    found: bool,
}

impl SentinelScanner {
    pub fn new(marker: &'static [u8]) -> Self {
        debug_assert!(!marker.is_empty(), "sentinel marker must not be empty");
        Self {
            marker,
            carry: Vec::new(),
            found: false,
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Scanned {
        if self.found {
            return Scanned {
                payload: Vec::new(),
                complete: true,
            };
        }

        let mut window = std::mem::take(&mut self.carry);
        window.extend_from_slice(chunk);

        if let Some(pos) = find(&window, self.marker) {
            window.truncate(pos);
            self.found = true;
            return Scanned {
                payload: window,
                complete: true,
            };
        }

        let held = partial_suffix_len(&window, self.marker);
        self.carry = window.split_off(window.len() - held);
        Scanned {
            payload: window,
            complete: false,
        }
    }

    /// Number of bytes currently held back as a possible marker prefix.
    pub fn held_back(&self) -> usize {
        self.carry.len()
    }

    pub fn is_complete(&self) -> bool {
        self.found
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Length of the longest suffix of `window` that is a proper prefix of `marker`.
fn partial_suffix_len(window: &[u8], marker: &[u8]) -> usize {
    let max = (marker.len() - 1).min(window.len());
    (1..=max)
        .rev()
        .find(|&n| window.ends_with(&marker[..n]))
        .unwrap_or(0)
}
