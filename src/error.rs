//! Error types for the listing pipeline
//!
//! Every failure is terminal for its request and is rendered straight back
//! to the chat: a variant's `Display` text is the exact reply the user sees.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a single listing request
#[derive(Error, Debug)]
pub enum Error {
    /// The incoming text is not an accepted Play Store listing URL
    #[error("Invalid Play Store URL. Please provide a valid URL (e.g., https://play.google.com/store/apps/details?id=org.telegram.messenger).")]
    InvalidUrl,

    /// The listing page responded with a non-200 status
    #[error("Failed to load page. Status code: {0}")]
    FetchFailed(u16),

    /// The page carries no `og:image` meta element
    #[error("Thumbnail not found on the page.")]
    ThumbnailMetaMissing,

    /// The `og:image` meta element has an empty content attribute
    #[error("Image URL not found.")]
    ThumbnailUrlEmpty,

    /// Downloading the thumbnail bytes failed
    #[error("Failed to download thumbnail: {0}")]
    ImageDownloadFailed(String),

    /// The downloaded bytes are not a decodable image
    #[error("Failed to decode thumbnail image: {0}")]
    ImageDecodeFailed(String),

    /// Catch-all for failures outside the kinds above
    #[error("{0}")]
    Unexpected(String),
}
