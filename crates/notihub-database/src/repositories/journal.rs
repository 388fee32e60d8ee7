//! Append-only JSON-lines journal for the file backend.
//!
//! Each line holds one write batch as a JSON array with store-assigned ids.
//! A batch is synced to disk before the store publishes it, so a crash can
//! only ever leave a torn final line behind. A failed append is rolled back
//! to the last synced length before the error is returned; if that rollback
//! fails too, the journal refuses further appends.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use notihub_core::error::{AppError, ErrorKind};
use notihub_core::result::AppResult;
use notihub_entity::Notification;

/// Journal file name inside the data directory.
pub const JOURNAL_FILE: &str = "notifications.jsonl";

/// Open handle on the journal file.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: File,
    /// Length of the synced, fully terminated prefix.
    len: u64,
    poisoned: bool,
}

impl Journal {
    /// Open (creating if needed) the journal in `dir` and replay its batches.
    pub async fn open(dir: impl AsRef<Path>) -> AppResult<(Self, Vec<Vec<Notification>>)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to create data directory {}", dir.display()),
                e,
            )
        })?;

        let path = dir.join(JOURNAL_FILE);
        let (batches, valid_len) = match fs::read(&path).await {
            Ok(bytes) => replay(&path, &bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Vec::new(), 0),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to read journal {}", path.display()),
                    e,
                ));
            }
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to open journal {}", path.display()),
                    e,
                )
            })?;

        let on_disk = file.metadata().await?.len();
        if on_disk > valid_len {
            file.set_len(valid_len).await?;
            file.sync_data().await?;
        }

        info!(
            path = %path.display(),
            batches = batches.len(),
            "Journal replayed"
        );
        Ok((
            Self {
                path,
                file,
                len: valid_len,
                poisoned: false,
            },
            batches,
        ))
    }

    /// Append one batch and sync it to disk.
    ///
    /// On error the file is cut back to its previous length, so a retried
    /// batch never lands behind a partial line.
    pub async fn append(&mut self, batch: &[Notification]) -> AppResult<()> {
        if self.poisoned {
            return Err(AppError::persistence(format!(
                "Journal {} is unusable after a failed rollback",
                self.path.display()
            )));
        }

        let mut line = serde_json::to_vec(batch)?;
        line.push(b'\n');

        if let Err(e) = self.write_line(&line).await {
            self.rollback().await;
            return Err(e);
        }
        self.len += line.len() as u64;
        debug!(records = batch.len(), "Journal batch appended");
        Ok(())
    }

    async fn write_line(&mut self, line: &[u8]) -> AppResult<()> {
        let on_disk = self
            .file
            .metadata()
            .await
            .map_err(|e| self.io_error("inspect", e))?
            .len();
        if on_disk != self.len {
            warn!(
                path = %self.path.display(),
                expected = self.len,
                on_disk,
                "Journal length drifted, cutting back before append"
            );
            self.file
                .set_len(self.len)
                .await
                .map_err(|e| self.io_error("truncate", e))?;
        }
        self.file.write_all(line).await.map_err(|e| self.io_error("append", e))?;
        self.file.sync_data().await.map_err(|e| self.io_error("sync", e))
    }

    async fn rollback(&mut self) {
        let restored = match self.file.set_len(self.len).await {
            Ok(()) => self.file.sync_data().await,
            Err(e) => Err(e),
        };
        if let Err(e) = restored {
            error!(
                path = %self.path.display(),
                error = %e,
                "Journal rollback failed, refusing further appends"
            );
            self.poisoned = true;
        }
    }

    /// Flush everything written so far.
    pub async fn sync(&mut self) -> AppResult<()> {
        self.file.flush().await.map_err(|e| self.io_error("flush", e))?;
        self.file.sync_all().await.map_err(|e| self.io_error("sync", e))
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> AppError {
        AppError::with_source(
            ErrorKind::Persistence,
            format!("Failed to {action} journal {}", self.path.display()),
            e,
        )
    }
}

/// Parse journal contents into batches plus the byte length of the valid prefix.
fn replay(path: &Path, bytes: &[u8]) -> AppResult<(Vec<Vec<Notification>>, u64)> {
    let mut batches = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        let (line, consumed, terminated) = match rest.iter().position(|b| *b == b'\n') {
            Some(end) => (&rest[..end], end + 1, true),
            None => (rest, rest.len(), false),
        };
        let is_last = offset + consumed >= bytes.len();

        if line.iter().all(u8::is_ascii_whitespace) {
            offset += consumed;
            continue;
        }

        match serde_json::from_slice::<Vec<Notification>>(line) {
            Ok(batch) if terminated => batches.push(batch),
            Err(e) if !is_last => {
                return Err(AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Corrupt journal entry at byte {offset} in {}", path.display()),
                    e,
                ));
            }
            _ => {
                warn!(
                    path = %path.display(),
                    offset,
                    "Discarding torn trailing journal entry"
                );
                return Ok((batches, offset as u64));
            }
        }
        offset += consumed;
    }

    Ok((batches, offset as u64))
}
