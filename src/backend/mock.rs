//! Scripted in-memory backend for interpreter tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use super::{BackendError, BackendResult, MailBackend};
use crate::mail::{Email, OutgoingEmail};

/// A call the interpreter made, with the arguments it passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    List,
    Summarize(String),
    Reply(String),
    Send(OutgoingEmail),
    Delete(String),
}

/// Answers with the configured inbox and canned text unless a failure was queued.
#[derive(Default)]
pub struct MockBackend {
    inbox: Vec<Email>,
    calls: Mutex<Vec<BackendCall>>,
    failures: Mutex<VecDeque<BackendError>>,
    tokens: Mutex<Vec<String>>,
    gate: Option<Gate>,
}

/// Holds every call open until released
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl MockBackend {
    pub fn new(inbox: Vec<Email>) -> Self {
        Self {
            inbox,
            ..Self::default()
        }
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// The next call fails with `error`
    pub fn fail_next(&self, error: BackendError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    async fn record(&self, token: &str, call: BackendCall) -> BackendResult<()> {
        self.calls.lock().unwrap().push(call);
        self.tokens.lock().unwrap().push(token.to_string());
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub fn summary_for(id: &str) -> String {
    format!("Summary of {id}.\nSecond line.")
}

pub fn reply_for(id: &str) -> String {
    format!("Thanks for {id}, will do.")
}

impl MailBackend for MockBackend {
    async fn list_emails(&self, token: &str) -> BackendResult<Vec<Email>> {
        self.record(token, BackendCall::List).await?;
        Ok(self.inbox.clone())
    }

    async fn summarize_email(&self, token: &str, email_id: &str) -> BackendResult<String> {
        self.record(token, BackendCall::Summarize(email_id.to_string()))
            .await?;
        Ok(summary_for(email_id))
    }

    async fn generate_reply(&self, token: &str, email_id: &str) -> BackendResult<String> {
        self.record(token, BackendCall::Reply(email_id.to_string()))
            .await?;
        Ok(reply_for(email_id))
    }

    async fn send_email(&self, token: &str, email: &OutgoingEmail) -> BackendResult<()> {
        self.record(token, BackendCall::Send(email.clone())).await
    }

    async fn delete_email(&self, token: &str, email_id: &str) -> BackendResult<()> {
        self.record(token, BackendCall::Delete(email_id.to_string()))
            .await
    }
}
