use image::RgbaImage;

use crate::engine::OcrEngine;
use crate::error::OcrError;
use crate::preprocess::preprocess;

/// Reads the promocode out of a template image.
///
/// Runs [`preprocess`] over the raster, hands the result to `engine`, and
/// strips surrounding whitespace from whatever comes back. `None` means the
/// engine found no text — the common case for images that merely look like
/// templates.
///
/// # Errors
///
/// - [`OcrError::InvalidImageDimensions`] — the image cannot contain the
///   template crop region; the engine is never invoked.
/// - [`OcrError::Backend`] — the engine itself failed.
pub async fn extract_code<E>(engine: &E, image: &RgbaImage) -> Result<Option<String>, OcrError>
where
    E: OcrEngine + ?Sized,
{
    let prepared = preprocess(image)?;
    let raw = engine.recognize(&prepared).await?;
    let code = raw.trim();
    if code.is_empty() {
        Ok(None)
    } else {
        Ok(Some(code.to_string()))
    }
}
