//! Message parser - Parses raw text into structured messages

use crate::domain::entities::{Content, Message, User};

/// Parses incoming text into Message objects
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        Message::new(chat_id, self.parse_content(&text))
            .with_sender_opt(sender)
    }

    /// Split `<prefix><name> <args…>` into a command; anything else is text.
    pub fn parse_content(&self, text: &str) -> Content {
        let text = text.trim();
        if text.is_empty() {
            return Content::Empty;
        }

        let cmd_text = if let Some(rest) = text.strip_prefix('/') {
            rest
        } else if let Some(rest) = self.strip_custom_prefix(text) {
            rest
        } else {
            return Content::Text(text.to_string());
        };

        // Split command and arguments
        let mut parts = cmd_text.split_whitespace();
        let Some(name) = parts.next() else {
            return Content::Text(text.to_string());
        };
        let args = parts.map(|s| s.to_string()).collect();

        Content::Command { name: name.to_string(), args }
    }

    fn strip_custom_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.command_prefix.is_empty() {
            return None;
        }
        text.strip_prefix(self.command_prefix.as_str())
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}
