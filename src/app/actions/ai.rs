//! AI summaries and reply drafts

use crate::backend::{BackendError, BackendResult, MailBackend};
use crate::constants::{MSG_EMAIL_NOT_FOUND, MSG_SELECT_FIRST};
use crate::session::Session;

use super::super::Interpreter;
use super::resolve_target;

impl<B: MailBackend> Interpreter<B> {
    /// Summarize the given position, or the first email when none was named.
    /// Unlike reply and delete, this ignores the current selection.
    pub(super) async fn summarize(
        &self,
        session: &mut Session,
        position: Option<usize>,
    ) -> BackendResult<()> {
        let Some((index, id)) = resolve_target(session, position, Some(0)) else {
            session.transcript_mut().push_system(MSG_EMAIL_NOT_FOUND);
            return Ok(());
        };

        self.progress(session, "Summarizing...");
        match self.backend.summarize_email(session.auth_token(), &id).await {
            Ok(summary) => {
                session.select(index);
                session
                    .transcript_mut()
                    .push_system(format!("Summary:\n{}", summary));
            }
            Err(BackendError::Rejected(reason)) => {
                session
                    .transcript_mut()
                    .push_system(format!("Summary failed: {}", reason));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Draft a reply to the given position, or to the selection
    pub(super) async fn draft_reply(
        &self,
        session: &mut Session,
        position: Option<usize>,
    ) -> BackendResult<()> {
        let Some((index, id)) = resolve_target(session, position, session.selected()) else {
            session.transcript_mut().push_system(MSG_SELECT_FIRST);
            return Ok(());
        };

        self.progress(session, "Generating reply...");
        match self.backend.generate_reply(session.auth_token(), &id).await {
            Ok(reply) => {
                let message = format!("Reply ready:\n{}\n\nType \"send\" to send it.", reply);
                session.set_draft(index, reply);
                tracing::info!(email_id = %id, "Drafted reply");
                session.transcript_mut().push_system(message);
            }
            Err(BackendError::Rejected(reason)) => {
                session
                    .transcript_mut()
                    .push_system(format!("Reply failed: {}", reason));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
