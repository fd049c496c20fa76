//! The mail service the interpreter drives
//!
//! Reading, sending, deleting and AI generation all happen behind this seam.
//! The interpreter only sees these five operations.

pub mod http;
#[cfg(test)]
pub mod mock;

use std::future::Future;

use thiserror::Error;

use crate::mail::{Email, OutgoingEmail};

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The service answered and reported a failure
    #[error("{0}")]
    Rejected(String),

    /// Connection, timeout or body transfer failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with something we cannot interpret
    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Authenticated email service operations. Every call carries the session token.
pub trait MailBackend: Send + Sync {
    fn list_emails(&self, token: &str) -> impl Future<Output = BackendResult<Vec<Email>>> + Send;

    fn summarize_email(
        &self,
        token: &str,
        email_id: &str,
    ) -> impl Future<Output = BackendResult<String>> + Send;

    fn generate_reply(
        &self,
        token: &str,
        email_id: &str,
    ) -> impl Future<Output = BackendResult<String>> + Send;

    fn send_email(
        &self,
        token: &str,
        email: &OutgoingEmail,
    ) -> impl Future<Output = BackendResult<()>> + Send;

    fn delete_email(
        &self,
        token: &str,
        email_id: &str,
    ) -> impl Future<Output = BackendResult<()>> + Send;
}
