use image::{imageops, GrayImage, Luma, RgbaImage};

use crate::error::OcrError;

/// Grayscale value at or above which a pixel counts as code text.
const BRIGHT_THRESHOLD: u8 = 200;

/// Absolute pixel rectangle of the code text band, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Selects the crop rectangle for a template image of the given dimensions.
///
/// The templates come in two resolutions; images at least 720px on both axes
/// carry the code in a lower band than smaller renders. `right` saturates at
/// zero for very narrow images, which [`preprocess`] then rejects.
#[must_use]
pub fn crop_rect(width: u32, height: u32) -> CropRect {
    let right = width.saturating_sub(80);
    if height >= 720 && width >= 720 {
        CropRect {
            left: 100,
            top: 440,
            right,
            bottom: 540,
        }
    } else {
        CropRect {
            left: 100,
            top: 310,
            right,
            bottom: 410,
        }
    }
}

/// Cuts the code band out of a template image and flattens it to
/// black-and-white for OCR.
///
/// The crop follows [`crop_rect`]; the result is grayscaled and thresholded
/// so that pixels with luma ≥ 200 become white and everything else black,
/// which maximizes contrast between code text and template background.
/// The input image is never modified.
///
/// # Errors
///
/// Returns [`OcrError::InvalidImageDimensions`] when the image cannot
/// contain the crop rectangle. The geometry is all-or-nothing: a rectangle
/// that does not fit is an error, never silently clamped.
pub fn preprocess(img: &RgbaImage) -> Result<GrayImage, OcrError> {
    let (width, height) = img.dimensions();
    let rect = crop_rect(width, height);
    if rect.right <= rect.left || rect.bottom > height {
        return Err(OcrError::InvalidImageDimensions { width, height });
    }

    let cropped = imageops::crop_imm(
        img,
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
    )
    .to_image();
    let gray = imageops::grayscale(&cropped);
    Ok(binarize(&gray))
}

/// Maps every pixel to pure black or pure white at the fixed threshold.
///
/// Idempotent: 255 stays white and 0 stays black on a second application.
fn binarize(img: &GrayImage) -> GrayImage {
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let value = if pixel[0] >= BRIGHT_THRESHOLD {
            255u8
        } else {
            0u8
        };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}
