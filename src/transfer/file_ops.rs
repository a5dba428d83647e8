//! Module `file_ops`
//!
//! Writes retrieved file content to disk. Content goes to a sibling
//! `<name>.part` file first and is renamed over the destination only once the
//! file-complete marker has been seen, so an aborted transfer never leaves a
//! truncated destination behind.

use log::{debug, error, info, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::{ClientError, Result};
use crate::protocol::SentinelScanner;
use crate::protocol::markers::{FILE_COMPLETE, FILE_READ_LIMIT};
use crate::utils::network;

const PARTIAL_SUFFIX: &str = ".part";

/// A destination being written.
///
/// Dropping it without `commit` removes the partial file, which covers
/// errors, timeouts and cancellation alike.
#[derive(Debug)]
pub struct PartialFile {
    final_path: PathBuf,
    temp_path: PathBuf,
    file: Option<File>,
    written: u64,
    committed: bool,
}

impl PartialFile {
    /// Creates (or truncates) `<destination>.part`.
    pub async fn create(destination: &Path) -> Result<Self> {
        let temp_path = partial_path(destination);
        let file = File::create(&temp_path).await.map_err(|source| {
            error!("Failed to create {}: {}", temp_path.display(), source);
            ClientError::LocalWrite {
                path: destination.to_path_buf(),
                source,
            }
        })?;
        debug!("Writing to {}", temp_path.display());

        Ok(Self {
            final_path: destination.to_path_buf(),
            temp_path,
            file: Some(file),
            written: 0,
            committed: false,
        })
    }

    pub async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let result = match self.file.as_mut() {
            Some(file) => file.write_all(bytes).await,
            None => Err(std::io::Error::other("partial file already closed")),
        };
        if let Err(source) = result {
            return Err(self.local_error(source));
        }
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Flushes the content and moves it over the destination.
    pub async fn commit(mut self) -> Result<u64> {
        if let Some(mut file) = self.file.take() {
            if let Err(source) = file.flush().await {
                return Err(self.local_error(source));
            }
        }

        if let Err(source) = fs::rename(&self.temp_path, &self.final_path).await {
            return Err(self.local_error(source));
        }
        self.committed = true;
        info!(
            "Saved {} ({} bytes)",
            self.final_path.display(),
            self.written
        );
        Ok(self.written)
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    fn local_error(&self, source: std::io::Error) -> ClientError {
        error!("Failed to write {}: {}", self.temp_path.display(), source);
        ClientError::LocalWrite {
            path: self.final_path.clone(),
            source,
        }
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.file.take());
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => warn!(
                "Discarded incomplete download {} ({} bytes)",
                self.temp_path.display(),
                self.written
            ),
            Err(e) => debug!("Could not remove {}: {}", self.temp_path.display(), e),
        }
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    destination.with_file_name(name)
}

/// Drains file content from `data_stream` into `destination`.
///
/// Each bounded read is scanned for the file-complete marker. Bytes before
/// it are written and the destination is committed. A connection closed
/// before the marker drops the partial file and yields `IncompleteTransfer`.
pub async fn receive_file<R>(
    data_stream: &mut R,
    mut destination: PartialFile,
    read_timeout: Option<Duration>,
    strip_padding: bool,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut scanner = SentinelScanner::new(FILE_COMPLETE);
    let mut received = 0u64;

    loop {
        let chunk =
            network::read_bounded(data_stream, FILE_READ_LIMIT, read_timeout, "file content")
                .await?;

        if chunk.is_empty() {
            warn!(
                "Data connection closed before file marker ({} bytes received)",
                received
            );
            return Err(ClientError::IncompleteTransfer { received });
        }
        received += chunk.len() as u64;

        let mut scanned = scanner.feed(&chunk);
        if strip_padding {
            scanned.payload.retain(|b| *b != 0);
        }
        destination.write(&scanned.payload).await?;

        if scanned.complete {
            return destination.commit().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("dir/notes.txt")),
            Path::new("dir/notes.txt.part")
        );
    }

    #[tokio::test]
    async fn test_commit_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.txt");
        std::fs::write(&dest, "old").unwrap();

        let mut partial = PartialFile::create(&dest).await.unwrap();
        partial.write(b"new content").await.unwrap();
        let temp = partial.temp_path().to_path_buf();
        assert_eq!(partial.commit().await.unwrap(), 11);

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new content");
        assert!(!temp.exists());
    }

    #[tokio::test]
    async fn test_drop_discards_partial_and_keeps_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.txt");
        std::fs::write(&dest, "X").unwrap();

        let mut partial = PartialFile::create(&dest).await.unwrap();
        partial.write(b"half").await.unwrap();
        let temp = partial.temp_path().to_path_buf();
        drop(partial);

        assert!(!temp.exists());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "X");
    }

    #[tokio::test]
    async fn test_create_in_missing_directory_is_local_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing").join("a.txt");
        let result = PartialFile::create(&dest).await;
        assert!(matches!(result, Err(ClientError::LocalWrite { .. })));
    }

    #[tokio::test]
    async fn test_receive_file_strips_padding() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("padded.txt");

        let mut block = b"line one\n".to_vec();
        block.resize(1000, 0);
        block.extend_from_slice(b"__complete__\0");
        let mut source: &[u8] = &block;

        let partial = PartialFile::create(&dest).await.unwrap();
        let written = receive_file(&mut source, partial, None, true).await.unwrap();

        assert_eq!(written, 9);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "line one\n");
    }

    #[tokio::test]
    async fn test_receive_file_keeps_nuls_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("raw.txt");
        let mut source: &[u8] = b"a\0b__complete__";

        let partial = PartialFile::create(&dest).await.unwrap();
        receive_file(&mut source, partial, None, false).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"a\0b".to_vec());
    }
}
