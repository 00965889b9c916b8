use image::RgbaImage;

/// Platform a post was collected from.
///
/// Also fixes the order platforms are scraped and announced in, so repeated
/// passes over the same data behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Twitter,
    Instagram,
    Facebook,
}

impl Platform {
    /// All platforms in scrape order.
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Instagram, Platform::Facebook];
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Twitter => write!(f, "twitter"),
            Platform::Instagram => write!(f, "instagram"),
            Platform::Facebook => write!(f, "facebook"),
        }
    }
}

/// The most recent post fetched from one platform, normalized to a common
/// shape.
#[derive(Clone)]
pub struct Post {
    /// Platform this post came from.
    pub platform: Platform,
    /// Display name of the posting account.
    pub author: String,
    /// Post body or caption. May be empty.
    pub text: String,
    /// Decoded raster of the attached image, if the post had one.
    pub image: Option<RgbaImage>,
    /// Canonical permalink of the post.
    pub url: String,
    /// Direct URL of the attached image, present exactly when `image` is.
    pub image_url: Option<String>,
}

impl std::fmt::Debug for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Post")
            .field("platform", &self.platform)
            .field("author", &self.author)
            .field("text", &self.text)
            .field(
                "image",
                &self
                    .image
                    .as_ref()
                    .map(|img| format!("{}x{}", img.width(), img.height())),
            )
            .field("url", &self.url)
            .field("image_url", &self.image_url)
            .finish()
    }
}

/// A post that passed the keyword gate together with the code read out of
/// its image.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub post: Post,
    /// Trimmed, non-empty OCR output. Case-sensitive.
    pub code: String,
}
