//! Error types for the pipeline crate.

use std::path::PathBuf;

use thiserror::Error;

use promowatch_ocr::OcrError;

/// Errors touching the announced-codes ledger file.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file exists but could not be read.
    #[error("failed to read ledger {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A code could not be appended durably.
    #[error("failed to append to ledger {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a whole pass.
///
/// Per-platform scrape failures and webhook rejections are logged and
/// absorbed inside the pass; only broken local machinery lands here.
#[derive(Debug, Error)]
pub enum PassError {
    /// The shared HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// Code extraction failed for a reason other than image geometry.
    #[error("code extraction failed: {0}")]
    Ocr(#[from] OcrError),

    /// The ledger could not be read or written.
    #[error("ledger update failed: {0}")]
    Ledger(#[from] LedgerError),
}
