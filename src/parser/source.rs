//! Content source abstraction and the shared, retrying line reader.
//!
//! Optimizer logs are usually still being appended to while they are viewed, so
//! the filesystem source opens files without locking out the writer and the line
//! reader retries a few times before giving up.

use std::io::Read;
use std::thread;
use std::time::Duration;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LogError, Result};

/// Trait for abstracting file I/O (filesystem vs. in-memory content).
pub trait ContentSource {
    /// Read the complete file at `path` as text.
    fn read_to_string(&mut self, path: &Utf8Path) -> std::io::Result<String>;
}

/// Reads files from the local filesystem in shared mode.
pub struct FsSource;

impl ContentSource for FsSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> std::io::Result<String> {
        let mut opts = std::fs::OpenOptions::new();
        opts.read(true);
        #[cfg(windows)]
        {
            use std::os::windows::fs::OpenOptionsExt;
            // FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE
            opts.share_mode(0x1 | 0x2 | 0x4);
        }
        let mut file = opts.open(path.as_std_path())?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Bounded retry budget for reads that may collide with a concurrent writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of read attempts (at least one is always made).
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 150,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Split text into logical lines.
///
/// `\r\n` and lone `\r` both count as line breaks. A trailing line break does not
/// produce an extra empty line, and empty text has no lines.
pub fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Read all lines of `path` through `source`, retrying failed reads.
///
/// Every I/O error is treated as transient until the retry budget is spent; the
/// last error is then returned as [`LogError::Io`].
pub fn read_lines_shared<S: ContentSource + ?Sized>(
    source: &mut S,
    path: &Utf8Path,
    retry: RetryPolicy,
) -> Result<Vec<String>> {
    let attempts = retry.attempts.max(1);
    let mut attempt = 1;
    loop {
        match source.read_to_string(path) {
            Ok(text) => return Ok(split_lines(&text)),
            Err(err) if attempt < attempts => {
                warn!(path = %path, attempt, error = %err, "read failed, retrying");
                thread::sleep(retry.delay());
                attempt += 1;
            }
            Err(err) => {
                return Err(LogError::Io {
                    path: path.to_owned(),
                    source: err,
                });
            }
        }
    }
}
