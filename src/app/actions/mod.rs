//! Per-intent command handlers
//!
//! - `email`: listing and deletion
//! - `ai`: summaries and reply drafts
//! - `compose`: sending the draft
//!
//! Each handler checks its preconditions first and makes no backend call when
//! they fail. Service rejections become a message here; transport and decoding
//! errors are returned and reported once by the caller.

mod ai;
mod compose;
mod email;

use crate::backend::{BackendResult, MailBackend};
use crate::command::Intent;
use crate::session::Session;

use super::Interpreter;

impl<B: MailBackend> Interpreter<B> {
    pub(super) async fn execute(
        &self,
        intent: Intent,
        session: &mut Session,
    ) -> BackendResult<()> {
        match intent {
            Intent::ListEmails => self.list_emails(session).await,
            Intent::Summarize(position) => self.summarize(session, position).await,
            Intent::Reply(position) => self.draft_reply(session, position).await,
            Intent::Send => self.send_draft(session).await,
            Intent::Delete(position) => self.delete(session, position).await,
            Intent::Unknown => {
                self.help(session);
                Ok(())
            }
        }
    }

    fn progress(&self, session: &mut Session, text: &str) {
        if self.show_progress {
            session.transcript_mut().push_system(text);
        }
    }
}

/// Explicit position, else `fallback`, with the id of the email it names.
/// `None` when no such email exists.
fn resolve_target(
    session: &Session,
    explicit: Option<usize>,
    fallback: Option<usize>,
) -> Option<(usize, String)> {
    let index = explicit.or(fallback)?;
    session.email(index).map(|email| (index, email.id.clone()))
}
