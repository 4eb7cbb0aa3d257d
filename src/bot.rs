//! Long-poll dispatch loop tying the transport to the pipeline.
//!
//! Each update is handled to completion before the next is taken, so the
//! pipeline never runs concurrently with itself. Transport failures are
//! logged and skipped; they never take the loop down.

use std::thread;
use std::time::Duration;

use log::warn;

use crate::pipeline::{Pipeline, Reply, NOT_TEXT};
use crate::telegram::{BotClient, Update};
use crate::{Config, Result};

/// Pause before retrying after a failed `getUpdates` call.
const POLL_RETRY: Duration = Duration::from_secs(1);

/// One transport client plus one pipeline; no state is shared between
/// requests beyond the update offset.
pub struct Bot {
    api: BotClient,
    pipeline: Pipeline,
}

impl Bot {
    /// Build a bot from its token and the process configuration.
    pub fn new(token: &str, config: &Config) -> Result<Self> {
        Ok(Self {
            api: BotClient::new(token)?,
            pipeline: Pipeline::new(config)?,
        })
    }

    /// As [`Bot::new`], but against an explicit Bot API base URL.
    pub fn with_api_base(base: String, config: &Config) -> Result<Self> {
        Ok(Self {
            api: BotClient::with_base(base)?,
            pipeline: Pipeline::new(config)?,
        })
    }

    /// Poll for updates forever, handling each message to completion
    /// before the next is fetched.
    pub fn run(&self) {
        let mut offset: i64 = 0;
        loop {
            let updates = match self.api.get_updates(offset) {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("getUpdates failed: {}", e);
                    thread::sleep(POLL_RETRY);
                    continue;
                }
            };
            for update in updates {
                offset = offset.max(update.update_id + 1);
                self.handle_update(update);
            }
        }
    }

    fn handle_update(&self, update: Update) {
        let message = match update.message {
            Some(message) => message,
            None => return,
        };
        let chat_id = message.chat.id;

        let reply = match message.text.as_deref() {
            Some(text) => match self.pipeline.handle_text(text) {
                Some(reply) => reply,
                // Unhandled command; stay silent like the original dispatcher.
                None => return,
            },
            None => Reply::Text(NOT_TEXT.to_string()),
        };

        if let Err(e) = self.send_reply(chat_id, reply) {
            warn!("Failed to reply to chat {}: {}", chat_id, e);
        }
    }

    fn send_reply(&self, chat_id: i64, reply: Reply) -> Result<()> {
        match reply {
            Reply::Text(text) => self.api.send_message(chat_id, &text),
            Reply::Photo {
                image,
                caption,
                file_name,
            } => self.api.send_photo(chat_id, image, &file_name, &caption),
        }
    }
}
