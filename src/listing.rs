//! Listing page fetch and field extraction.
//!
//! This is the first half of the pipeline: an HTTP GET with a browser-like
//! user agent, then a handful of targeted pulls out of the returned HTML.
//! Extraction is best-effort by design. The Play Store serves obfuscated
//! markup, so the version heuristic in particular degrades to `"Unknown"`
//! rather than erroring when the page structure shifts.

use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};

use crate::{Config, Error, Result};

/// URL prefix every accepted listing request must carry.
pub const PLAY_STORE_PREFIX: &str = "https://play.google.com/store/apps/details?id=";

/// Longest description kept in the caption before truncation.
const DESCRIPTION_LIMIT: usize = 100;

/// Fields extracted from one listing page.
///
/// Created fresh per request and discarded once the reply is sent.
#[derive(Debug, Clone)]
pub struct ListingMetadata {
    /// Display name taken from the page title
    pub name: String,
    /// Short description, truncated to 100 characters
    pub description: String,
    /// Best-effort version string, `"Unknown"` when the page gives none
    pub version: String,
    /// `og:image` URL when the page carries one
    pub thumbnail_url: Option<String>,
}

/// Validate that `url` is an accepted listing URL.
///
/// Runs before any network call; anything without the fixed prefix is
/// rejected outright.
pub fn validate_url(url: &str) -> Result<()> {
    if url.starts_with(PLAY_STORE_PREFIX) {
        Ok(())
    } else {
        Err(Error::InvalidUrl)
    }
}

/// Extract the app id from the URL's `id` query parameter.
///
/// Falls back to `"app"` when no id is present. The id is only used for
/// derived naming (the uploaded photo's file name), never for lookups.
pub fn app_id(url: &str) -> String {
    let re = Regex::new(r"id=([A-Za-z0-9._]+)").unwrap();
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "app".to_string())
}

/// Fetches listing pages and thumbnails over blocking HTTP.
pub struct ListingExtractor {
    client: Client,
    user_agent: String,
}

impl ListingExtractor {
    /// Build an extractor from the pipeline configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Fetch the listing page and extract its fields.
    ///
    /// The caller is expected to have run [`validate_url`] on incoming text
    /// already; the fetch itself takes any URL so tests can point it at a
    /// local fixture server.
    pub fn fetch(&self, url: &str) -> Result<ListingMetadata> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.clone())
            .send()
            .map_err(|e| Error::Unexpected(format!("Network error: {}", e)))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::FetchFailed(status));
        }

        let body = response
            .text()
            .map_err(|e| Error::Unexpected(format!("Network error: {}", e)))?;

        extract_listing(&body)
    }

    /// Download the thumbnail bytes with the same headers and timeout.
    pub fn download_thumbnail(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.clone())
            .send()
            .map_err(|e| Error::ImageDownloadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ImageDownloadFailed(format!(
                "status code {}",
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::ImageDownloadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Extract name, description, version and thumbnail URL from listing HTML.
pub fn extract_listing(html: &str) -> Result<ListingMetadata> {
    let document = Html::parse_document(html);

    let title_sel = Selector::parse("title").unwrap();
    let name = document
        .select(&title_sel)
        .next()
        .map(|title| {
            let text = title.text().collect::<String>();
            match text.split_once(" - ") {
                Some((first, _)) => first.to_string(),
                None => text,
            }
        })
        .unwrap_or_else(|| "Unknown App".to_string());

    let meta_sel = Selector::parse("meta").unwrap();
    let description = document
        .select(&meta_sel)
        .find(|meta| meta.value().attr("name") == Some("description"))
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or("No description available.");
    let description = truncate_description(description);

    let version = extract_version(&document);

    let thumbnail_url = match document
        .select(&meta_sel)
        .find(|meta| meta.value().attr("property") == Some("og:image"))
    {
        Some(meta) => {
            let content = meta.value().attr("content").unwrap_or("");
            if content.is_empty() {
                return Err(Error::ThumbnailUrlEmpty);
            }
            Some(content.to_string())
        }
        None => None,
    };

    Ok(ListingMetadata {
        name,
        description,
        version,
        thumbnail_url,
    })
}

/// Keep the first 100 characters and mark the cut with an ellipsis.
fn truncate_description(raw: &str) -> String {
    if raw.chars().count() > DESCRIPTION_LIMIT {
        let mut truncated: String = raw.chars().take(DESCRIPTION_LIMIT).collect();
        truncated.push_str("...");
        truncated
    } else {
        raw.to_string()
    }
}

/// Best-effort version scan over the page's container elements.
///
/// Walks `<div>` elements in document order. A container whose text holds
/// `"Current Version"` is followed by a sibling holding the value; some
/// layouts instead put the value in an element whose class name mentions
/// "version". The first element satisfying either rule wins.
fn extract_version(document: &Html) -> String {
    let div_sel = Selector::parse("div").unwrap();
    for div in document.select(&div_sel) {
        let text = div.text().collect::<String>();
        if text.contains("Current Version") {
            if let Some(sibling) = next_sibling_element(&div) {
                return sibling.text().collect::<String>().trim().to_string();
            }
        }
        if let Some(class) = div.value().attr("class") {
            if class.to_lowercase().contains("version") {
                return text.trim().to_string();
            }
        }
    }
    "Unknown".to_string()
}

/// Next sibling that is an element, skipping text and comment nodes.
fn next_sibling_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(head: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head>{}</head><body>{}</body></html>",
            head, body
        )
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url(
            "https://play.google.com/store/apps/details?id=org.telegram.messenger"
        )
        .is_ok());
        assert!(matches!(
            validate_url("https://example.com/store/apps/details?id=x"),
            Err(Error::InvalidUrl)
        ));
        assert!(matches!(
            validate_url("play.google.com/store/apps/details?id=x"),
            Err(Error::InvalidUrl)
        ));
    }

    #[test]
    fn test_app_id_extraction() {
        assert_eq!(
            app_id("https://play.google.com/store/apps/details?id=org.telegram.messenger"),
            "org.telegram.messenger"
        );
        assert_eq!(
            app_id("https://play.google.com/store/apps/details?id=com.foo_bar.app2&hl=en"),
            "com.foo_bar.app2"
        );
        assert_eq!(app_id("https://play.google.com/store/apps/details"), "app");
    }

    #[test]
    fn test_name_from_title() {
        let html = page("<title>Telegram - Apps on Google Play</title>", "");
        let listing = extract_listing(&html).unwrap();
        assert_eq!(listing.name, "Telegram");
    }

    #[test]
    fn test_name_splits_on_first_separator() {
        let html = page("<title>Foo - Bar - Baz</title>", "");
        let listing = extract_listing(&html).unwrap();
        assert_eq!(listing.name, "Foo");
    }

    #[test]
    fn test_name_missing_title() {
        let listing = extract_listing(&page("", "")).unwrap();
        assert_eq!(listing.name, "Unknown App");
    }

    #[test]
    fn test_description_default() {
        let listing = extract_listing(&page("", "")).unwrap();
        assert_eq!(listing.description, "No description available.");
    }

    #[test]
    fn test_description_at_limit_is_unmodified() {
        let exact = "d".repeat(100);
        let html = page(
            &format!(r#"<meta name="description" content="{}">"#, exact),
            "",
        );
        let listing = extract_listing(&html).unwrap();
        assert_eq!(listing.description, exact);
    }

    #[test]
    fn test_description_over_limit_is_truncated() {
        let long = "d".repeat(101);
        let html = page(
            &format!(r#"<meta name="description" content="{}">"#, long),
            "",
        );
        let listing = extract_listing(&html).unwrap();
        assert_eq!(listing.description.len(), 103);
        assert_eq!(listing.description, format!("{}...", "d".repeat(100)));
    }

    #[test]
    fn test_version_from_current_version_sibling() {
        let html = page(
            "",
            "<div><div>Current Version</div><div> 9.8.7 </div></div>",
        );
        let listing = extract_listing(&html).unwrap();
        assert_eq!(listing.version, "9.8.7");
    }

    #[test]
    fn test_version_from_class_name() {
        let html = page("", r#"<div class="AppVersionBadge"> 1.2.3 </div>"#);
        let listing = extract_listing(&html).unwrap();
        assert_eq!(listing.version, "1.2.3");
    }

    #[test]
    fn test_version_earlier_element_wins() {
        // The class-rule element comes first in document order, so it wins
        // even though a "Current Version" label appears later.
        let html = page(
            "",
            r#"<div class="version-chip">2.0.0</div>
               <div><div>Current Version</div><div>9.9.9</div></div>"#,
        );
        let listing = extract_listing(&html).unwrap();
        assert_eq!(listing.version, "2.0.0");
    }

    #[test]
    fn test_version_sentinel() {
        let listing = extract_listing(&page("", "<div>nothing here</div>")).unwrap();
        assert_eq!(listing.version, "Unknown");
    }

    #[test]
    fn test_thumbnail_url_present() {
        let html = page(
            r#"<meta property="og:image" content="https://cdn.example/icon.png">"#,
            "",
        );
        let listing = extract_listing(&html).unwrap();
        assert_eq!(
            listing.thumbnail_url.as_deref(),
            Some("https://cdn.example/icon.png")
        );
    }

    #[test]
    fn test_thumbnail_meta_absent() {
        let listing = extract_listing(&page("", "")).unwrap();
        assert!(listing.thumbnail_url.is_none());
    }

    #[test]
    fn test_thumbnail_url_empty() {
        let html = page(r#"<meta property="og:image" content="">"#, "");
        assert!(matches!(
            extract_listing(&html),
            Err(Error::ThumbnailUrlEmpty)
        ));
    }
}
