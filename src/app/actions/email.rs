//! Inbox listing and deletion

use crate::backend::{BackendError, BackendResult, MailBackend};
use crate::constants::MSG_EMAIL_NOT_FOUND;
use crate::session::Session;

use super::super::Interpreter;
use super::resolve_target;

impl<B: MailBackend> Interpreter<B> {
    pub(super) async fn list_emails(&self, session: &mut Session) -> BackendResult<()> {
        self.progress(session, "Fetching your emails...");

        let emails = match self.backend.list_emails(session.auth_token()).await {
            Ok(emails) => emails,
            Err(BackendError::Rejected(reason)) => {
                session
                    .transcript_mut()
                    .push_system(format!("Failed to fetch emails: {}", reason));
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Fetched {} emails", emails.len());
        let listing: Vec<String> = emails
            .iter()
            .enumerate()
            .map(|(i, email)| email.listing(i + 1))
            .collect();
        session.replace_emails(emails);

        let transcript = session.transcript_mut();
        transcript.push_system(format!("Found {} emails", listing.len()));
        for entry in listing {
            transcript.push_system(entry);
        }
        Ok(())
    }

    /// Delete the given position, or the selection when none was named
    pub(super) async fn delete(
        &self,
        session: &mut Session,
        position: Option<usize>,
    ) -> BackendResult<()> {
        let Some((index, id)) = resolve_target(session, position, session.selected()) else {
            session.transcript_mut().push_system(MSG_EMAIL_NOT_FOUND);
            return Ok(());
        };

        self.progress(session, "Deleting email...");
        match self.backend.delete_email(session.auth_token(), &id).await {
            Ok(()) => {
                session.remove_email(index);
                tracing::info!(email_id = %id, "Deleted email at position {}", index + 1);
                session.transcript_mut().push_system("Email deleted!");
            }
            Err(BackendError::Rejected(reason)) => {
                session
                    .transcript_mut()
                    .push_system(format!("Delete failed: {}", reason));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
