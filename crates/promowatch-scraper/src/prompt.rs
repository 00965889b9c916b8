//! Interactive credential prompts for `--force-login` runs.
//!
//! Ordinary passes run unattended off persisted sessions; stdin is only
//! read when the operator explicitly asked to log in again.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::ScrapeError;

/// Username/password pair typed by the operator.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Writes `prompt` to stdout and reads one trimmed line from stdin.
///
/// # Errors
///
/// Returns [`ScrapeError::Io`] when stdin or stdout is closed.
pub async fn prompt_line(prompt: &str) -> Result<String, ScrapeError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

/// Prompts for the username and password of `service`.
///
/// # Errors
///
/// Returns [`ScrapeError::Io`] when stdin or stdout is closed.
pub async fn prompt_credentials(service: &str) -> Result<Credentials, ScrapeError> {
    let username = prompt_line(&format!("Enter the username for {service}: ")).await?;
    let password = prompt_line(&format!("Enter the password for {username}: ")).await?;
    Ok(Credentials { username, password })
}
