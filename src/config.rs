//! Configuration management for the transfer client
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `FTCLIENT_`
//! (e.g. `FTCLIENT_READ_TIMEOUT_SECS=5`).

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transfer::OverwritePolicy;

/// Looked up in the working directory when no `--config` is given.
const DEFAULT_CONFIG_NAME: &str = "ftclient";
const ENV_PREFIX: &str = "FTCLIENT";

/// Client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Bound on establishing either connection.
    pub connect_timeout_secs: u64,

    /// Bound on every single read. 0 disables the timeout and reads block
    /// until the server answers or closes.
    pub read_timeout_secs: u64,

    /// How many times the data connection is attempted while the server is
    /// still binding the data port.
    pub data_connect_attempts: u32,

    /// First delay between data connection attempts, doubled after each.
    pub data_connect_backoff_ms: u64,

    /// Directory retrieved files are written to.
    pub download_dir: String,

    /// Drop NUL bytes from retrieved content. The reference server pads
    /// every block it sends to a fixed width with NULs.
    ///
    /// On by default, which departs from writing the bytes before the
    /// file-complete marker exactly as received: a payload NUL is lost too.
    /// Only `.txt` files are transferred, so that is accepted for
    /// compatibility with the reference server. Set to `false` for a
    /// byte-exact copy.
    pub strip_padding: bool,

    /// What to do when the destination file already exists.
    pub overwrite: OverwritePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            data_connect_attempts: 8,
            data_connect_backoff_ms: 100,
            download_dir: ".".to_string(),
            strip_padding: true,
            overwrite: OverwritePolicy::Ask,
        }
    }
}

impl ClientConfig {
    /// Load configuration with environment overrides.
    ///
    /// An explicit `path` must exist; the default `ftclient.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs)?
            .set_default("read_timeout_secs", defaults.read_timeout_secs)?
            .set_default(
                "data_connect_attempts",
                u64::from(defaults.data_connect_attempts),
            )?
            .set_default("data_connect_backoff_ms", defaults.data_connect_backoff_ms)?
            .set_default("download_dir", defaults.download_dir)?
            .set_default("strip_padding", defaults.strip_padding)?
            .set_default("overwrite", defaults.overwrite.as_str())?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.connect_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.data_connect_attempts == 0 {
            return Err(config::ConfigError::Message(
                "data_connect_attempts must be at least 1".into(),
            ));
        }

        if self.download_dir.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "download_dir cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get read timeout, `None` when disabled
    pub fn read_timeout(&self) -> Option<Duration> {
        match self.read_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn data_connect_backoff(&self) -> Duration {
        Duration::from_millis(self.data_connect_backoff_ms)
    }

    /// Local path a retrieved file is written to.
    pub fn download_path(&self, filename: &str) -> PathBuf {
        Path::new(&self.download_dir).join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.overwrite, OverwritePolicy::Ask);
    }

    #[test]
    fn test_zero_read_timeout_disables_it() {
        let config = ClientConfig {
            read_timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.read_timeout(), None);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = ClientConfig {
            data_connect_attempts: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_download_path_joins_dir() {
        let config = ClientConfig {
            download_dir: "downloads".into(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.download_path("a.txt"),
            Path::new("downloads").join("a.txt")
        );
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "read_timeout_secs = 5").unwrap();
        writeln!(file, "overwrite = \"never\"").unwrap();
        writeln!(file, "strip_padding = false").unwrap();

        let config = ClientConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.read_timeout_secs, 5);
        assert_eq!(config.overwrite, OverwritePolicy::Never);
        assert!(!config.strip_padding);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.data_connect_attempts, 8);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(ClientConfig::load(Some(&missing)).is_err());
    }
}
