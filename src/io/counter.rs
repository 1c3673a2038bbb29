//! The report-export counter.
//!
//! The counter is deliberately outside the core: callers see only the
//! [`ExportCounter`] contract (an atomic increment), so the backing store can
//! be swapped for a real counter service without touching anything else.
//! The file implementation writes to a temp file and renames, so a crashed
//! export never leaves a half-written count behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Environment variable overriding the counter file location.
pub const COUNTER_PATH_ENV: &str = "DS_EXPORT_COUNTER";

const DEFAULT_COUNTER_FILE: &str = "ds_export_count.txt";

/// Atomic-increment contract for the export counter.
pub trait ExportCounter {
    /// The current count (0 if nothing has been recorded yet).
    fn current(&self) -> u64;

    /// Increment and return the new count.
    fn increment(&self) -> Result<u64, AppError>;
}

/// File-backed counter.
#[derive(Debug, Clone)]
pub struct FileCounter {
    path: PathBuf,
}

impl FileCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the counter path from the environment (dotenv already loaded
    /// at startup), falling back to a file in the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var(COUNTER_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_COUNTER_FILE));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportCounter for FileCounter {
    fn current(&self) -> u64 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    fn increment(&self) -> Result<u64, AppError> {
        let next = self.current() + 1;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, next.to_string()).map_err(|e| {
            AppError::new(
                4,
                format!("Failed to write counter '{}': {e}", tmp.display()),
            )
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::new(
                4,
                format!("Failed to update counter '{}': {e}", self.path.display()),
            )
        })?;

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_zero_and_increments() {
        let path = std::env::temp_dir().join(format!(
            "datascope_counter_{}.txt",
            std::process::id()
        ));
        std::fs::remove_file(&path).ok();

        let counter = FileCounter::new(&path);
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.increment().unwrap(), 1);
        assert_eq!(counter.increment().unwrap(), 2);
        assert_eq!(counter.current(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn garbage_contents_reset_to_zero() {
        let path = std::env::temp_dir().join(format!(
            "datascope_counter_garbage_{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "not a number").unwrap();

        let counter = FileCounter::new(&path);
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.increment().unwrap(), 1);

        std::fs::remove_file(&path).ok();
    }
}
