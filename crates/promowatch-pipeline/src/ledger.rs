//! Durable record of codes that have already been announced.
//!
//! One code per line in a plain text file, append-only. The file is the
//! source of truth across restarts; the in-memory set just mirrors it for
//! lookups during a pass.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::LedgerError;

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    codes: HashSet<String>,
}

impl Ledger {
    /// Loads the ledger at `path`. A file that does not exist yet is an
    /// empty ledger; it is created on the first [`record`](Self::record).
    ///
    /// Blank lines and repeated codes in the file are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Read`] when the file exists but cannot be
    /// read.
    pub async fn load(path: &Path) -> Result<Self, LedgerError> {
        let codes = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => {
                return Err(LedgerError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            codes,
        })
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Appends `code` to the file, then to the in-memory set. The write is
    /// flushed and synced before this returns, so a code is never
    /// announced on the strength of an update that did not reach disk.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Append`] when the file cannot be opened or
    /// the write does not complete.
    pub async fn record(&mut self, code: &str) -> Result<(), LedgerError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.append_err(e))?;

        file.write_all(format!("{code}\n").as_bytes())
            .await
            .map_err(|e| self.append_err(e))?;
        file.flush().await.map_err(|e| self.append_err(e))?;
        file.sync_data().await.map_err(|e| self.append_err(e))?;

        self.codes.insert(code.to_string());
        Ok(())
    }

    fn append_err(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Append {
            path: self.path.clone(),
            source,
        }
    }
}
