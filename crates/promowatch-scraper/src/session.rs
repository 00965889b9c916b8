use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Cookies that keep an Instagram web login alive between passes.
///
/// Written as JSON to `<data_dir>/session` after a successful
/// `--force-login` run and reloaded on every later pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramSession {
    pub username: String,
    pub csrf_token: String,
    pub session_id: String,
}

impl InstagramSession {
    /// Location of the session file inside the data directory.
    #[must_use]
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join("session")
    }

    /// Loads the session saved by a previous login.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::SessionMissing`] — no session file exists yet.
    /// - [`ScrapeError::Deserialize`] — the file is not a valid session.
    pub async fn load(path: &Path) -> Result<Self, ScrapeError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScrapeError::SessionMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|e| ScrapeError::Deserialize {
            context: format!("instagram session at {}", path.display()),
            source: e,
        })
    }

    /// Persists the session for later passes.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Io`] when the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<(), ScrapeError> {
        let raw = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }
}
