//! Playcard
//!
//! A Telegram bot that turns a Google Play Store listing URL into a preview
//! card: the listing page is scraped for the app name, short description,
//! version and thumbnail, and the thumbnail is composited onto a fixed
//! 1200x600 canvas with rounded corners before being sent back as a photo
//! with a caption.
//!
//! The pipeline is linear and per-request: fetch page, extract fields,
//! download thumbnail, compose card, reply. Nothing outlives a single
//! request and no state is shared between requests.
//!
//! # Example
//!
//! ```no_run
//! use playcard::{Config, ListingExtractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let extractor = ListingExtractor::new(&config)?;
//! let listing = extractor
//!     .fetch("https://play.google.com/store/apps/details?id=org.telegram.messenger")?;
//! println!("Name: {} v{}", listing.name, listing.version);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

// Listing page fetch + field extraction
pub mod listing;

// Thumbnail decode/resize/mask/encode
pub mod compose;

// Transport-agnostic text -> reply dispatch
pub mod pipeline;

// Minimal Telegram Bot API client
pub mod telegram;

// Long-poll loop wiring the transport to the pipeline
pub mod bot;

pub use bot::Bot;
pub use listing::{ListingExtractor, ListingMetadata};
pub use pipeline::{Pipeline, Reply};

/// Configuration for the listing pipeline
///
/// Created once at startup and passed into the pipeline and transport
/// constructors; there is no mutable global. The defaults match the hosted
/// Play Store: a browser-like user agent (the listing pages serve reduced
/// markup to unknown agents) and a 10 second timeout on every outbound call.
///
/// # Examples
///
/// ```
/// let cfg = playcard::Config::default();
/// assert_eq!(cfg.timeout_ms, 10_000);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// User agent string sent with every outbound HTTP request
    pub user_agent: String,
    /// Timeout for listing and thumbnail fetches in milliseconds
    pub timeout_ms: u64,
    /// Output card dimensions
    pub canvas: Canvas,
    /// JPEG quality of the composed card
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Linux; Android 11) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/100.0.0.0 Mobile Safari/537.36"
                .to_string(),
            timeout_ms: 10_000,
            canvas: Canvas::default(),
            jpeg_quality: 95,
        }
    }
}

/// Card canvas dimensions
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.canvas.width, 1200);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.jpeg_quality, 95);
        assert!(config.user_agent.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_canvas() {
        let canvas = Canvas {
            width: 800,
            height: 400,
        };
        assert_eq!(canvas.width, 800);
        assert_eq!(canvas.height, 400);
    }
}
