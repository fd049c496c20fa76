//! Sending the drafted reply

use crate::backend::{BackendError, BackendResult, MailBackend};
use crate::constants::MSG_NO_DRAFT;
use crate::mail::OutgoingEmail;
use crate::session::Session;

use super::super::Interpreter;

impl<B: MailBackend> Interpreter<B> {
    /// Send the draft to the selected email's sender.
    /// On failure the draft and selection stay so the user can retry.
    pub(super) async fn send_draft(&self, session: &mut Session) -> BackendResult<()> {
        let outgoing = match (session.draft_reply(), session.selected_email()) {
            (Some(draft), Some(original)) => OutgoingEmail::reply_to(original, draft),
            _ => {
                session.transcript_mut().push_system(MSG_NO_DRAFT);
                return Ok(());
            }
        };

        self.progress(session, "Sending email...");
        match self.backend.send_email(session.auth_token(), &outgoing).await {
            Ok(()) => {
                session.finish_draft();
                tracing::info!(to = %outgoing.to, "Sent reply");
                session.transcript_mut().push_system(format!(
                    "Email sent successfully!\nTo: {}\nSubject: {}",
                    outgoing.to, outgoing.subject
                ));
            }
            Err(BackendError::Rejected(reason)) => {
                session
                    .transcript_mut()
                    .push_system(format!("Send failed: {}", reason));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
