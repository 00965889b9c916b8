use image::RgbaImage;
use reqwest::Client;

use crate::error::ScrapeError;

/// Downloads and decodes a post image.
///
/// The format is sniffed from the bytes, not the URL — platform CDNs serve
/// both JPEG and PNG under opaque paths.
///
/// # Errors
///
/// - [`ScrapeError::Http`] — request failure or non-2xx status.
/// - [`ScrapeError::Image`] — the body is not a decodable image.
pub async fn download_image(client: &Client, url: &str) -> Result<RgbaImage, ScrapeError> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    let decoded = image::load_from_memory(&bytes)?;
    Ok(decoded.to_rgba8())
}
