//! Per-login chat session state
//!
//! The session is an explicit value: the interpreter takes it, updates it and
//! hands it back, and the caller keeps it between turns.

pub mod transcript;

pub use transcript::{Message, Originator, Transcript};

use crate::mail::Email;

#[derive(Debug, Clone, Default)]
pub struct Session {
    auth_token: String,
    /// Insertion order is list position; users see it 1-based
    emails: Vec<Email>,
    /// Always a valid index into `emails` when set
    selected: Option<usize>,
    /// Only kept while a selection exists
    draft_reply: Option<String>,
    transcript: Transcript,
}

impl Session {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            ..Self::default()
        }
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    #[allow(dead_code)]
    pub fn is_authenticated(&self) -> bool {
        !self.auth_token.is_empty()
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn email(&self, index: usize) -> Option<&Email> {
        self.emails.get(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_email(&self) -> Option<&Email> {
        self.selected.and_then(|i| self.emails.get(i))
    }

    pub fn draft_reply(&self) -> Option<&str> {
        self.draft_reply.as_deref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Replace the listing wholesale.
    ///
    /// The selection follows its email by id; if that email is gone the
    /// selection and any draft for it are dropped.
    pub fn replace_emails(&mut self, emails: Vec<Email>) {
        let selected_id = self.selected_email().map(|e| e.id.clone());
        self.emails = emails;
        self.selected = selected_id.and_then(|id| self.emails.iter().position(|e| e.id == id));
        if self.selected.is_none() {
            self.draft_reply = None;
        }
    }

    /// Mark `index` as the active email. Returns false if it does not exist.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.emails.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Select `index` and store a draft reply for it
    pub fn set_draft(&mut self, index: usize, draft: String) -> bool {
        if !self.select(index) {
            return false;
        }
        self.draft_reply = Some(draft);
        true
    }

    /// Clear the draft and the selection after a successful send
    pub fn finish_draft(&mut self) {
        self.draft_reply = None;
        self.selected = None;
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn remove_email(&mut self, index: usize) -> Option<Email> {
        if index >= self.emails.len() {
            return None;
        }
        let removed = self.emails.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => {
                self.draft_reply = None;
                None
            }
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Some(removed)
    }

    /// Reset everything for logout. Transcript ids keep increasing.
    pub fn logout(&mut self) {
        self.auth_token.clear();
        self.emails.clear();
        self.selected = None;
        self.draft_reply = None;
        self.transcript.clear();
    }
}
