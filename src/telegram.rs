//! Minimal Telegram Bot API client.
//!
//! Covers exactly the three methods the bot needs: long-polled `getUpdates`,
//! `sendMessage` and a multipart `sendPhoto`. The card is uploaded straight
//! from memory, so no temporary file ever exists. Anything else the Bot API
//! offers is out of scope here.

use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde::Deserialize;

use crate::{Error, Result};

const API_BASE: &str = "https://api.telegram.org";

/// Long-poll wait passed to `getUpdates`, in seconds.
const POLL_TIMEOUT_S: u64 = 50;

/// HTTP client timeout; must sit above the long-poll wait.
const HTTP_TIMEOUT_S: u64 = 60;

/// Envelope every Bot API response is wrapped in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// One long-poll update. Only message updates are modelled; anything else
/// deserializes with `message: None` and is skipped by the dispatch loop.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Blocking Bot API client bound to one bot token.
pub struct BotClient {
    client: Client,
    base: String,
}

impl BotClient {
    /// Create a client for the hosted Bot API.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base(format!("{}/bot{}", API_BASE, token))
    }

    /// Create a client against an explicit base URL (used by tests).
    pub fn with_base(base: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_S))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base, method)
    }

    /// Long-poll for updates past `offset`.
    pub fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let response = self
            .client
            .get(self.url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_TIMEOUT_S.to_string()),
            ])
            .send()
            .map_err(|e| Error::Unexpected(format!("getUpdates failed: {}", e)))?;
        Ok(handle_response(response)?.unwrap_or_default())
    }

    /// Send a plain-text reply with link previews disabled.
    pub fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("sendMessage"))
            .form(&[
                ("chat_id", chat_id.to_string()),
                ("text", text.to_string()),
                ("disable_web_page_preview", "true".to_string()),
            ])
            .send()
            .map_err(|e| Error::Unexpected(format!("sendMessage failed: {}", e)))?;
        handle_response::<serde_json::Value>(response)?;
        Ok(())
    }

    /// Upload the card from memory and send it with its caption.
    pub fn send_photo(
        &self,
        chat_id: i64,
        image: Vec<u8>,
        file_name: &str,
        caption: &str,
    ) -> Result<()> {
        let photo = multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .map_err(|e| Error::Unexpected(format!("sendPhoto failed: {}", e)))?;
        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", photo);

        let response = self
            .client
            .post(self.url("sendPhoto"))
            .multipart(form)
            .send()
            .map_err(|e| Error::Unexpected(format!("sendPhoto failed: {}", e)))?;
        handle_response::<serde_json::Value>(response)?;
        Ok(())
    }
}

/// Check the HTTP status and the envelope's `ok` flag, yielding the payload.
fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<Option<T>> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| Error::Unexpected(format!("Telegram API read failed: {}", e)))?;
    let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
        Error::Unexpected(format!(
            "Telegram API returned malformed JSON ({}): {}",
            status, e
        ))
    })?;
    if !parsed.ok {
        return Err(Error::Unexpected(format!(
            "Telegram API error ({}): {}",
            status,
            parsed
                .description
                .unwrap_or_else(|| "no description".to_string())
        )));
    }
    Ok(parsed.result)
}
