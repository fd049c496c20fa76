//! Line-oriented drivers over an [`Assistant`]: interactive stdin and script files

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::app::{Assistant, AssistantError};
use crate::backend::MailBackend;
use crate::session::{Message, Originator};

/// Words handled by the driver itself, never sent to the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    Quit,
    Logout,
}

impl DriverCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "quit" | "exit" | "q" => Some(Self::Quit),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }
}

/// How the interactive session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Logout,
}

/// Render one transcript entry for the terminal
pub fn render(message: &Message) -> String {
    match message.originator {
        Originator::User => format!("> {}", message.text),
        Originator::System => message.text.clone(),
    }
}

/// Tracks which transcript entries have been shown
struct Printer {
    last_shown: u64,
}

impl Printer {
    fn new() -> Self {
        Self { last_shown: 0 }
    }

    /// Collect new entries, skipping echoes of what the user just typed
    async fn pending<B: MailBackend>(&mut self, assistant: &Assistant<B>) -> Vec<String> {
        let last_shown = self.last_shown;
        let (lines, last_id) = assistant
            .with_session(|s| {
                let lines = s
                    .transcript()
                    .since(last_shown)
                    .filter(|m| m.originator == Originator::System)
                    .map(render)
                    .collect::<Vec<_>>();
                (lines, s.transcript().last_id())
            })
            .await;
        self.last_shown = last_id;
        lines
    }
}

/// Read commands from stdin until EOF or a driver word
pub async fn run_interactive<B: MailBackend>(assistant: &Assistant<B>) -> Result<Exit> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printer = Printer::new();

    loop {
        for line in printer.pending(assistant).await {
            stdout.write_all(format!("{}\n\n", line).as_bytes()).await?;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            return Ok(Exit::Quit);
        };

        match DriverCommand::parse(&line) {
            Some(DriverCommand::Quit) => return Ok(Exit::Quit),
            Some(DriverCommand::Logout) => {
                assistant.logout().await;
                return Ok(Exit::Logout);
            }
            None => {}
        }

        if let Err(AssistantError::Busy) = assistant.submit(&line).await {
            stdout
                .write_all(b"Still working on the previous command...\n")
                .await?;
        }
    }
}

/// Run every command line of `script` in order.
///
/// Blank lines and lines starting with `#` are skipped. Returns the number of
/// commands submitted.
pub async fn run_script<B: MailBackend>(assistant: &Assistant<B>, script: &str) -> Result<usize> {
    let mut submitted = 0;
    for line in script.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if DriverCommand::parse(line).is_some() {
            tracing::debug!("Skipping driver command in script: {}", line);
            continue;
        }
        assistant.submit(line).await?;
        submitted += 1;
    }
    Ok(submitted)
}

/// Full transcript as terminal text, user lines included
pub async fn transcript_text<B: MailBackend>(assistant: &Assistant<B>) -> String {
    assistant
        .with_session(|s| {
            s.transcript()
                .messages()
                .iter()
                .map(render)
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .await
}

pub async fn write_transcript_json<B: MailBackend>(
    assistant: &Assistant<B>,
    path: &Path,
) -> Result<()> {
    let json = assistant
        .with_session(|s| s.transcript().to_json())
        .await
        .context("Failed to serialize transcript")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write transcript: {}", path.display()))?;
    Ok(())
}
