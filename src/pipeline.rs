//! Transport-agnostic request handling: incoming text in, reply out.
//!
//! Every incoming message maps to at most one [`Reply`]; the transport layer
//! decides how to deliver it. Failures anywhere in the pipeline become the
//! error's user-facing text, never a crash.

use crate::compose;
use crate::listing::{self, ListingExtractor, ListingMetadata};
use crate::{Canvas, Config, Error, Result};

/// Greeting sent for the start/help commands.
pub const GREETING: &str = "Hello! I am a Telegram bot that downloads and modifies app \
    thumbnails from the Play Store. Send me a Play Store URL (e.g., \
    https://play.google.com/store/apps/details?id=org.telegram.messenger).";

/// Reply for updates that carry no usable text.
pub const NOT_TEXT: &str = "Please send a valid Play Store URL as text.";

/// Outcome of handling one incoming message.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Send the composed card with its caption
    Photo {
        image: Vec<u8>,
        caption: String,
        file_name: String,
    },
    /// Send plain text (the greeting or a failure description)
    Text(String),
}

/// The fetch -> parse -> download -> compose pipeline for one request.
pub struct Pipeline {
    extractor: ListingExtractor,
    canvas: Canvas,
    jpeg_quality: u8,
}

impl Pipeline {
    /// Build a pipeline from the process configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            extractor: ListingExtractor::new(config)?,
            canvas: config.canvas,
            jpeg_quality: config.jpeg_quality,
        })
    }

    /// Map one incoming text message to its reply.
    ///
    /// Returns `None` for commands the bot does not handle, mirroring a
    /// dispatcher that only routes the start command and plain text.
    pub fn handle_text(&self, text: &str) -> Option<Reply> {
        let text = text.trim();
        if let Some(command) = text.strip_prefix('/') {
            let name = command
                .split(|c: char| c == ' ' || c == '@')
                .next()
                .unwrap_or("");
            return match name {
                "start" | "help" => Some(Reply::Text(GREETING.to_string())),
                _ => None,
            };
        }
        Some(match self.process_listing(text) {
            Ok(reply) => reply,
            Err(e) => Reply::Text(e.to_string()),
        })
    }

    /// Run the full pipeline for one listing URL.
    pub fn process_listing(&self, url: &str) -> Result<Reply> {
        listing::validate_url(url)?;
        let meta = self.extractor.fetch(url)?;
        let thumbnail_url = meta
            .thumbnail_url
            .as_deref()
            .ok_or(Error::ThumbnailMetaMissing)?;
        let raw = self.extractor.download_thumbnail(thumbnail_url)?;
        let image = compose::compose(&raw, self.canvas, self.jpeg_quality)?;
        Ok(Reply::Photo {
            image,
            caption: caption(&meta),
            file_name: format!("{}.jpg", listing::app_id(url)),
        })
    }
}

/// Caption rendered under the card, with light emphasis markup.
pub fn caption(listing: &ListingMetadata) -> String {
    format!(
        "**{}** **v{}**\n\n** {}**",
        listing.name, listing.version, listing.description
    )
}
