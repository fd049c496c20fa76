//! HTTP client for the assistant service

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{BackendError, BackendResult, MailBackend};
use crate::config::BackendConfig;
use crate::constants::UNKNOWN_ERROR;
use crate::mail::{Email, OutgoingEmail};

/// Talks to the service over its JSON API with a bearer token
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    emails: Vec<Email>,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: Option<String>,
}

#[derive(Deserialize)]
struct ReplyResponse {
    reply: Option<String>,
}

/// Signed-in user as reported by the service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserProfile {
    pub fn display(&self) -> Option<&str> {
        self.name.as_deref().or(self.email.as_deref())
    }
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mailchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Where the user starts the service's login flow
    pub fn login_url(&self) -> String {
        self.url("/auth/google/login")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Profile of the token's owner, used for the greeting
    pub async fn profile(&self, token: &str) -> BackendResult<UserProfile> {
        tracing::debug!("GET /me");
        let response = self
            .client
            .get(self.url("/me"))
            .bearer_auth(token)
            .send()
            .await?;
        decode(read_json(response).await?)
    }
}

impl MailBackend for HttpBackend {
    async fn list_emails(&self, token: &str) -> BackendResult<Vec<Email>> {
        tracing::debug!("GET /read-emails");
        let response = self
            .client
            .get(self.url("/read-emails"))
            .bearer_auth(token)
            .send()
            .await?;

        let list: ListResponse = decode(read_json(response).await?)?;
        Ok(list.emails)
    }

    async fn summarize_email(&self, token: &str, email_id: &str) -> BackendResult<String> {
        tracing::debug!(email_id, "POST /summarize-email");
        let response = self
            .client
            .post(self.url("/summarize-email"))
            .query(&[("email_id", email_id)])
            .bearer_auth(token)
            .send()
            .await?;

        let body: SummaryResponse = decode(read_json(response).await?)?;
        body.summary
            .ok_or_else(|| BackendError::Malformed("response has no summary".to_string()))
    }

    async fn generate_reply(&self, token: &str, email_id: &str) -> BackendResult<String> {
        tracing::debug!(email_id, "POST /generate-reply");
        let response = self
            .client
            .post(self.url("/generate-reply"))
            .query(&[("email_id", email_id)])
            .bearer_auth(token)
            .send()
            .await?;

        let body: ReplyResponse = decode(read_json(response).await?)?;
        body.reply
            .ok_or_else(|| BackendError::Malformed("response has no reply".to_string()))
    }

    async fn send_email(&self, token: &str, email: &OutgoingEmail) -> BackendResult<()> {
        tracing::debug!(to = %email.to, subject = %email.subject, "POST /send-email");
        let response = self
            .client
            .post(self.url("/send-email"))
            .bearer_auth(token)
            .json(email)
            .send()
            .await?;

        expect_success(read_json(response).await?)
    }

    async fn delete_email(&self, token: &str, email_id: &str) -> BackendResult<()> {
        tracing::debug!(email_id, "POST /delete-email");
        let response = self
            .client
            .post(self.url("/delete-email"))
            .bearer_auth(token)
            .json(&json!({ "email_id": email_id }))
            .send()
            .await?;

        expect_success(read_json(response).await?)
    }
}

/// Read a JSON body, turning service-reported failures into `Rejected`.
///
/// A body carrying `error` is a rejection whatever the status; a non-2xx
/// status without a JSON body is a rejection quoting the raw text.
async fn read_json(response: Response) -> BackendResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => {
            if has_field(&value, "error") || !status.is_success() {
                tracing::warn!(%status, "Service rejected request");
                return Err(BackendError::Rejected(failure_text(&value)));
            }
            Ok(value)
        }
        Err(e) if status.is_success() => Err(BackendError::Malformed(e.to_string())),
        Err(_) => {
            tracing::warn!(%status, "Service failed without a JSON body");
            let text = text.trim();
            Err(BackendError::Rejected(if text.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                format!("HTTP {}: {}", status.as_u16(), text)
            }))
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> BackendResult<T> {
    serde_json::from_value(value).map_err(|e| BackendError::Malformed(e.to_string()))
}

/// `{"success": true}` or a rejection naming why not
fn expect_success(value: Value) -> BackendResult<()> {
    if value.get("success").and_then(Value::as_bool) == Some(true) {
        Ok(())
    } else {
        Err(BackendError::Rejected(failure_text(&value)))
    }
}

fn has_field(value: &Value, field: &str) -> bool {
    value.get(field).is_some_and(|v| !v.is_null())
}

/// Best-effort reason: `error`, then `message`, then a generic label
fn failure_text(value: &Value) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|field| value.get(*field))
        .find_map(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn backend(server: &mockito::Server) -> HttpBackend {
        HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_failure_text_precedence() {
        assert_eq!(
            failure_text(&json!({"error": "boom", "message": "ignored"})),
            "boom"
        );
        assert_eq!(failure_text(&json!({"message": "Email sent!"})), "Email sent!");
        assert_eq!(failure_text(&json!({"error": null})), "Unknown error");
        assert_eq!(failure_text(&json!({"error": {"code": 7}})), r#"{"code":7}"#);
        assert_eq!(failure_text(&json!({})), "Unknown error");
    }

    #[test]
    fn test_expect_success() {
        assert!(expect_success(json!({"success": true, "message": "ok"})).is_ok());
        match expect_success(json!({"success": false, "message": "quota"})) {
            Err(BackendError::Rejected(reason)) => assert_eq!(reason, "quota"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_login_url_trims_slash() {
        let backend = HttpBackend::new("http://svc.local/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.login_url(), "http://svc.local/auth/google/login");
    }

    #[tokio::test]
    async fn test_list_emails() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/read-emails")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"emails": [
                    {"id": "m1", "sender": "Jane <jane@ex.co>", "subject": "Hi", "snippet": "..."},
                    {"id": "m2"}
                ]}"#,
            )
            .create_async()
            .await;

        let emails = backend(&server).list_emails("tok").await.unwrap();
        mock.assert_async().await;

        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0], Email::new("m1", "Jane <jane@ex.co>", "Hi"));
        assert_eq!(emails[1].sender, "Unknown");
        assert_eq!(emails[1].subject, "(No Subject)");
    }

    #[tokio::test]
    async fn test_list_without_emails_field_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/read-emails")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let emails = backend(&server).list_emails("tok").await.unwrap();
        assert!(emails.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_is_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/read-emails")
            .with_status(401)
            .with_body(r#"{"error": "Unauthorized"}"#)
            .create_async()
            .await;

        match backend(&server).list_emails("bad").await {
            Err(BackendError::Rejected(reason)) => assert_eq!(reason, "Unauthorized"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summarize_sends_email_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/summarize-email")
            .match_query(Matcher::UrlEncoded("email_id".into(), "m1".into()))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"summary": "Lunch on Friday."}"#)
            .create_async()
            .await;

        let summary = backend(&server).summarize_email("tok", "m1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(summary, "Lunch on Friday.");
    }

    #[tokio::test]
    async fn test_summarize_missing_field_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/summarize-email")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let err = backend(&server).summarize_email("tok", "m1").await.unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_generate_reply_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate-reply")
            .match_query(Matcher::UrlEncoded("email_id".into(), "m2".into()))
            .with_status(400)
            .with_body(r#"{"error": "'payload'"}"#)
            .create_async()
            .await;

        match backend(&server).generate_reply("tok", "m2").await {
            Err(BackendError::Rejected(reason)) => assert_eq!(reason, "'payload'"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_email_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send-email")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(json!({
                "to": "jane@ex.co",
                "subject": "Re: Hi",
                "body": "Sounds good."
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "message": "Email sent!"}"#)
            .create_async()
            .await;

        let email = OutgoingEmail {
            to: "jane@ex.co".into(),
            subject: "Re: Hi".into(),
            body: "Sounds good.".into(),
        };
        backend(&server).send_email("tok", &email).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_plain_text_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/delete-email")
            .match_body(Matcher::Json(json!({"email_id": "m3"})))
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        match backend(&server).delete_email("tok", "m3").await {
            Err(BackendError::Rejected(reason)) => assert_eq!(reason, "HTTP 502: Bad Gateway"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_success_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/delete-email")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = backend(&server).delete_email("tok", "m3").await.unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_profile() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/me")
            .with_status(200)
            .with_body(r#"{"email": "me@ex.co", "name": null, "picture": null}"#)
            .create_async()
            .await;

        let profile = backend(&server).profile("tok").await.unwrap();
        assert_eq!(profile.display(), Some("me@ex.co"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let backend = HttpBackend::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = backend.list_emails("tok").await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
    }
}
