//! Crash report writer: latest error plus a timestamped archive.

use std::path::PathBuf;

use {tokio::fs, tracing::warn};

use crate::error::Result;

const LATEST_FILE: &str = "error.log";
const ARCHIVE_DIR: &str = "archive";

/// Records operator-facing failure reports under a log directory.
///
/// `error.log` always holds the most recent report; every report is also
/// archived under `archive/crash_<timestamp>.log` and never overwritten.
/// Recording never fails: a secondary fault while writing the report is
/// logged and swallowed so it cannot mask the original error.
#[derive(Debug, Clone)]
pub struct CrashLog {
    dir: PathBuf,
}

impl CrashLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(LATEST_FILE)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.dir.join(ARCHIVE_DIR)
    }

    /// Write a failure report. Infallible by contract.
    pub async fn record(&self, context: &str, detail: &str) {
        if let Err(e) = self.try_record(context, detail).await {
            warn!(error = %e, context, "failed to write crash report");
        }
    }

    async fn try_record(&self, context: &str, detail: &str) -> Result<()> {
        fs::create_dir_all(self.archive_dir()).await?;

        let body = format!("{context}\n\n{detail}\n");
        fs::write(self.latest_path(), body.as_bytes()).await?;

        // Millisecond precision keeps archive names unique across rapid
        // successive reports.
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S%.3f");
        let archive = self.archive_dir().join(format!("crash_{stamp}.log"));
        fs::write(&archive, body.as_bytes()).await?;
        Ok(())
    }
}
