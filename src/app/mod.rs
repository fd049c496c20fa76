//! Command interpreter - turns chat lines into backend calls and session updates

mod actions;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::backend::MailBackend;
use crate::command::{help_text, parse_intent};
use crate::constants::COMMAND_SUMMARY;
use crate::session::Session;

/// Runs one command at a time against a session
pub struct Interpreter<B> {
    backend: B,
    /// Emit "Fetching..." style messages before backend calls
    show_progress: bool,
}

impl<B: MailBackend> Interpreter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Interpret one line of input and return the updated session.
    ///
    /// Never fails: every outcome, including transport errors, ends up as a
    /// system message. State is only changed once a backend answer has been
    /// fully parsed and confirmed.
    pub async fn handle_command(&self, raw: &str, mut session: Session) -> Session {
        self.run_command(raw, &mut session).await;
        session
    }

    /// In-place form of [`Interpreter::handle_command`]
    pub async fn run_command(&self, raw: &str, session: &mut Session) {
        let input = raw.trim();
        if input.is_empty() {
            return;
        }

        session.transcript_mut().push_user(raw);
        let intent = parse_intent(input);
        tracing::debug!(?intent, "Parsed command");

        if let Err(e) = self.execute(intent, session).await {
            tracing::warn!("Command failed: {}", e);
            session.transcript_mut().push_system(format!("Error: {}", e));
        }
    }

    /// Append the greeting shown when a session starts
    pub fn greet(&self, session: &mut Session, user: Option<&str>) {
        let text = match user {
            Some(user) => format!("Welcome, {}! {}", user, COMMAND_SUMMARY),
            None => format!("Welcome! {}", COMMAND_SUMMARY),
        };
        session.transcript_mut().push_system(text);
    }

    pub(crate) fn help(&self, session: &mut Session) {
        session.transcript_mut().push_system(help_text());
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssistantError {
    /// Another command is still waiting on the backend
    #[error("A command is already in progress")]
    Busy,
}

/// Owns the session and admits at most one command at a time.
///
/// The session lock doubles as the busy flag: it is taken before the first
/// backend call and released once all state changes for the command are done.
pub struct Assistant<B> {
    interpreter: Interpreter<B>,
    session: Mutex<Session>,
}

impl<B: MailBackend> Assistant<B> {
    pub fn new(interpreter: Interpreter<B>, session: Session) -> Self {
        Self {
            interpreter,
            session: Mutex::new(session),
        }
    }

    pub fn interpreter(&self) -> &Interpreter<B> {
        &self.interpreter
    }

    /// Run one command. Rejected without any effect while another is in flight.
    pub async fn submit(&self, raw: &str) -> Result<(), AssistantError> {
        let Ok(mut guard) = self.session.try_lock() else {
            tracing::debug!("Ignoring command while busy: {}", raw);
            return Err(AssistantError::Busy);
        };

        self.interpreter.run_command(raw, &mut guard).await;
        Ok(())
    }

    #[allow(dead_code)]
    pub fn is_busy(&self) -> bool {
        self.session.try_lock().is_err()
    }

    /// Read the session between commands
    pub async fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.session.lock().await;
        f(&guard)
    }

    pub async fn greet(&self, user: Option<&str>) {
        let mut guard = self.session.lock().await;
        self.interpreter.greet(&mut guard, user);
    }

    /// End the session, resetting all state
    pub async fn logout(&self) {
        let mut guard = self.session.lock().await;
        guard.logout();
        tracing::info!("Session logged out");
    }
}
