use async_trait::async_trait;
use image::GrayImage;
use tempfile::NamedTempFile;

use crate::error::OcrError;

/// Text recognition over a preprocessed black-and-white image.
///
/// The candidate filter is generic over this trait so tests can substitute
/// a scripted engine for the tesseract subprocess.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in `image`.
    ///
    /// Finding no text is not an error: the result is `Ok` with an empty or
    /// whitespace-only string.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::Backend`] when the backend cannot produce a
    /// result at all.
    async fn recognize(&self, image: &GrayImage) -> Result<String, OcrError>;
}

/// OCR backend that shells out to the `tesseract` CLI.
///
/// Invokes `<binary> <scratch>.png stdout -l <lang> --psm 6` — single
/// uniform block mode, which fits the one-line code band.
pub struct TesseractEngine {
    binary: String,
    lang: String,
}

impl TesseractEngine {
    #[must_use]
    pub fn new(binary: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        // tesseract reads its input from a file, so round-trip through a
        // scratch PNG that is removed on drop.
        let input = NamedTempFile::with_suffix(".png")?;
        image.save(input.path())?;

        let output = tokio::process::Command::new(&self.binary)
            .arg(input.path())
            .args(["stdout", "-l", &self.lang, "--psm", "6"])
            .output()
            .await
            .map_err(|e| OcrError::Backend {
                reason: format!("failed to spawn {}: {e}", self.binary),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Backend {
                reason: format!(
                    "{} exited with {}: {}",
                    self.binary,
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
