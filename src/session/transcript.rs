//! Append-only record of the chat, for rendering and replay

use chrono::{DateTime, Local};
use serde::Serialize;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Originator {
    User,
    System,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Strictly increasing, never reused within a process
    pub id: u64,
    pub originator: Originator,
    /// May span several lines; one logical entry regardless
    pub text: String,
    pub at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    /// Append an entry and return its sequence id
    pub fn push(&mut self, originator: Originator, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        let text = text.into();
        tracing::trace!(id, ?originator, "transcript: {}", text);
        self.messages.push(Message {
            id,
            originator,
            text,
            at: Local::now(),
        });
        id
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> u64 {
        self.push(Originator::User, text)
    }

    pub fn push_system(&mut self, text: impl Into<String>) -> u64 {
        self.push(Originator::System, text)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Entries appended after the one with id `after`
    pub fn since(&self, after: u64) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.id > after)
    }

    #[allow(dead_code)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_id(&self) -> u64 {
        self.next_id
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop all entries. The id counter keeps running.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut t = Transcript::default();
        let a = t.push_user("show emails");
        let b = t.push_system("Found 0 emails");
        let c = t.push_system("done");
        assert!(a < b && b < c);
        assert_eq!(t.len(), 3);
        assert_eq!(t.last().map(|m| m.id), Some(c));
    }

    #[test]
    fn test_multiline_is_one_entry() {
        let mut t = Transcript::default();
        t.push_system("Summary:\nline one\nline two");
        assert_eq!(t.len(), 1);
        assert_eq!(t.messages()[0].text.lines().count(), 3);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut t = Transcript::default();
        let before = t.push_system("first");
        t.clear();
        assert!(t.is_empty());
        let after = t.push_system("second");
        assert!(after > before);
    }

    #[test]
    fn test_since() {
        let mut t = Transcript::default();
        let first = t.push_user("a");
        t.push_system("b");
        t.push_system("c");
        let texts: Vec<_> = t.since(first).map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert_eq!(t.since(t.last_id()).count(), 0);
    }

    #[test]
    fn test_json_export() {
        let mut t = Transcript::default();
        t.push_user("send");
        let json = t.to_json().unwrap();
        assert!(json.contains("\"originator\": \"user\""));
        assert!(json.contains("\"text\": \"send\""));
    }
}
