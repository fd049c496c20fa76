//! Application-wide constants and fixed user-facing strings
//!
//! Centralizes tunables and transcript wording so tests and drivers agree on them.

/// Default base URL of the assistant service.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout in seconds, enforced by the HTTP transport.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the auth token (takes priority over stored tokens).
pub const ENV_TOKEN: &str = "MAILCHAT_TOKEN";

/// Environment variable overriding `backend.url` from the config file.
pub const ENV_BACKEND_URL: &str = "MAILCHAT_BACKEND_URL";

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "mailchat";

/// Label used when the service fails without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Sender shown for list entries without a `From` header.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Subject shown for list entries without a `Subject` header.
pub const NO_SUBJECT: &str = "(No Subject)";

/// Prefix prepended to the original subject when replying.
pub const REPLY_PREFIX: &str = "Re: ";

// === Transcript wording ===

pub const COMMAND_SUMMARY: &str =
    r#"Commands: "show emails", "summarize [#]", "reply [#]", "send", "delete [#]""#;

pub const MSG_EMAIL_NOT_FOUND: &str = r#"Email not found. Try "show emails" first."#;

pub const MSG_SELECT_FIRST: &str = r#"Select email first. Try "show emails" then "reply [#]""#;

pub const MSG_NO_DRAFT: &str = r#"No reply to send. Try "reply [#]" first."#;
