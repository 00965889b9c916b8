use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("image {width}x{height} is smaller than the template crop region")]
    InvalidImageDimensions { width: u32, height: u32 },

    #[error("OCR backend unavailable: {reason}")]
    Backend { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
