use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{NO_SUBJECT, REPLY_PREFIX, UNKNOWN_SENDER};

/// `local-part@domain` where the domain holds at least one dot.
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+").expect("valid address regex")
});

/// An entry of the fetched inbox listing. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Backend-assigned identifier, stable for the whole session
    pub id: String,
    /// Free-form `From` value, often `Name <addr>`
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Email {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            subject: subject.into(),
        }
    }

    /// Address a reply to this email should go to
    pub fn reply_address(&self) -> &str {
        recipient_address(&self.sender)
    }

    pub fn reply_subject(&self) -> String {
        format!("{}{}", REPLY_PREFIX, self.subject)
    }

    /// Two-line listing entry, `position` is 1-based
    pub fn listing(&self, position: usize) -> String {
        format!(
            "[{}] From: {}\n    Subject: {}",
            position, self.sender, self.subject
        )
    }
}

fn default_sender() -> String {
    UNKNOWN_SENDER.to_string()
}

fn default_subject() -> String {
    NO_SUBJECT.to_string()
}

/// A message handed to the service for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// Build the reply to `original` carrying `body`
    pub fn reply_to(original: &Email, body: &str) -> Self {
        Self {
            to: original.reply_address().to_string(),
            subject: original.reply_subject(),
            body: body.to_string(),
        }
    }
}

/// Extract the first address-shaped substring of a sender string.
///
/// Falls back to the whole sender verbatim when nothing looks like an address,
/// so a malformed header still produces a recipient the service can judge.
pub fn recipient_address(sender: &str) -> &str {
    ADDRESS_RE
        .find(sender)
        .map(|m| m.as_str())
        .unwrap_or(sender)
}
