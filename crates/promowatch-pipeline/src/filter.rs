//! Narrows scraped posts down to announceable candidates.

use promowatch_core::{Candidate, Post};
use promowatch_ocr::{extract_code, OcrEngine, OcrError};

/// Literal a post's text must contain before its image is worth reading.
/// Matched case-sensitively, the way the account writes it.
pub const PROMOCODE_KEYWORD: &str = "promocode";

/// Filters one pass worth of posts into candidates carrying a code.
///
/// A post survives when it exists, its text mentions
/// [`PROMOCODE_KEYWORD`], it has an image, and the engine reads a
/// non-empty code out of that image. Input order is preserved. Posts
/// whose image is too small for the template crop are skipped with a
/// warning; every other extraction failure aborts, since it means the
/// OCR machinery itself is broken.
///
/// # Errors
///
/// Returns [`OcrError`] when recognition fails for a reason other than
/// [`OcrError::InvalidImageDimensions`].
pub async fn filter_candidates<E: OcrEngine + ?Sized>(
    posts: Vec<Option<Post>>,
    engine: &E,
) -> Result<Vec<Candidate>, OcrError> {
    let mut candidates = Vec::new();

    for post in posts.into_iter().flatten() {
        if !post.text.contains(PROMOCODE_KEYWORD) {
            tracing::debug!(platform = %post.platform, "post does not mention a promocode");
            continue;
        }
        let Some(image) = post.image.as_ref() else {
            tracing::debug!(platform = %post.platform, "promocode post has no image to read");
            continue;
        };

        let code = match extract_code(engine, image).await {
            Ok(Some(code)) => code,
            Ok(None) => {
                tracing::info!(platform = %post.platform, url = %post.url, "no code found in post image");
                continue;
            }
            Err(OcrError::InvalidImageDimensions { width, height }) => {
                tracing::warn!(
                    platform = %post.platform,
                    width,
                    height,
                    "post image too small for the code template, skipping"
                );
                continue;
            }
            Err(e) => return Err(e),
        };

        tracing::info!(platform = %post.platform, code = %code, "found candidate code");
        candidates.push(Candidate { post, code });
    }

    Ok(candidates)
}
