//! Overwrite confirmation
//!
//! Retrieval asks before replacing an existing local file. The decision is
//! made by an `OverwritePrompt` supplied by the caller, so the transfer logic
//! never touches the terminal itself.

use serde::Deserialize;
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;
use std::thread;
use tokio::io::AsyncWriteExt;
use tokio::sync::oneshot;

/// Decides whether an existing destination may be replaced.
#[allow(async_fn_in_trait)]
pub trait OverwritePrompt {
    /// Returns `true` only for an explicit yes.
    async fn confirm(&mut self, path: &Path) -> io::Result<bool>;
}

/// Asks on stdout and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl OverwritePrompt for ConsolePrompt {
    async fn confirm(&mut self, path: &Path) -> io::Result<bool> {
        let mut stdout = tokio::io::stdout();
        let question = format!(
            "{} already exists, would you like to overwrite it?\ny/n: ",
            path.display()
        );
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let answer = read_line_detached(io::BufReader::new(io::stdin())).await?;
        Ok(is_affirmative(&answer))
    }
}

/// Reads one line from `reader` on a thread of its own.
///
/// A read blocked on the terminal cannot be cancelled. Left on the runtime's
/// blocking pool it would hold up runtime shutdown after an interrupt; a
/// detached thread does not.
async fn read_line_detached<R>(mut reader: R) -> io::Result<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name("overwrite-prompt".into())
        .spawn(move || {
            let mut line = String::new();
            let result = reader.read_line(&mut line).map(|_| line);
            let _ = tx.send(result);
        })?;

    rx.await
        .map_err(|_| io::Error::other("prompt reader stopped without an answer"))?
}

/// Answers every question the same way without asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl OverwritePrompt for FixedAnswer {
    async fn confirm(&mut self, _path: &Path) -> io::Result<bool> {
        Ok(self.0)
    }
}

/// Only `y` or `yes`, in any case, count as consent.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Configured reaction to an existing destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    Ask,
    Always,
    Never,
}

impl OverwritePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            OverwritePolicy::Ask => "ask",
            OverwritePolicy::Always => "always",
            OverwritePolicy::Never => "never",
        }
    }

    /// Builds the prompt implementing this policy.
    pub fn prompt(self) -> PolicyPrompt {
        match self {
            OverwritePolicy::Ask => PolicyPrompt::Console(ConsolePrompt),
            OverwritePolicy::Always => PolicyPrompt::Fixed(FixedAnswer(true)),
            OverwritePolicy::Never => PolicyPrompt::Fixed(FixedAnswer(false)),
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverwritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ask" => Ok(OverwritePolicy::Ask),
            "always" => Ok(OverwritePolicy::Always),
            "never" => Ok(OverwritePolicy::Never),
            other => Err(format!(
                "unknown overwrite policy {:?} (expected ask, always or never)",
                other
            )),
        }
    }
}

/// Prompt selected from an `OverwritePolicy`.
#[derive(Debug, Clone, Copy)]
pub enum PolicyPrompt {
    Console(ConsolePrompt),
    Fixed(FixedAnswer),
}

impl OverwritePrompt for PolicyPrompt {
    async fn confirm(&mut self, path: &Path) -> io::Result<bool> {
        match self {
            PolicyPrompt::Console(prompt) => prompt.confirm(path).await,
            PolicyPrompt::Fixed(prompt) => prompt.confirm(path).await,
        }
    }
}
