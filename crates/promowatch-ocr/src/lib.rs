//! Promocode extraction from template images.
//!
//! Promocodes are rendered as text at a fixed vertical band inside known
//! template layouts. [`preprocess`] cuts that band out and flattens it to
//! black-and-white; an [`OcrEngine`] reads the text; [`extract_code`] ties
//! the two together.

pub mod engine;
pub mod error;
pub mod extract;
pub mod preprocess;

pub use engine::{OcrEngine, TesseractEngine};
pub use error::OcrError;
pub use extract::extract_code;
pub use preprocess::{crop_rect, preprocess, CropRect};
