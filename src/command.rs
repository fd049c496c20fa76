//! Intent classification for free-text chat commands
//!
//! Matching is case-insensitive and substring based, so "please show my emails"
//! works as well as "show emails". Rules are evaluated top to bottom and the
//! first match wins; the order is part of the contract.

use std::sync::LazyLock;

use regex::Regex;

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));

/// Position used for digit runs that cannot name an email (`0`, overflow).
/// No list is ever this long, so it always fails the existence check.
pub const INVALID_POSITION: usize = usize::MAX;

/// Classified meaning of one line of input.
///
/// Positions are 0-based; `None` means the input carried no number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ListEmails,
    Summarize(Option<usize>),
    Reply(Option<usize>),
    Send,
    Delete(Option<usize>),
    Unknown,
}

/// Help information for a command
#[derive(Debug, Clone)]
pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
}

struct Rule {
    matches: fn(&str) -> bool,
    intent: fn(&str) -> Intent,
}

const RULES: &[Rule] = &[
    Rule {
        matches: |s| s.contains("show") && s.contains("email"),
        intent: |_| Intent::ListEmails,
    },
    Rule {
        matches: |s| s.contains("summarize"),
        intent: |s| Intent::Summarize(position_argument(s)),
    },
    Rule {
        matches: |s| s.contains("reply"),
        intent: |s| Intent::Reply(position_argument(s)),
    },
    Rule {
        matches: |s| s.contains("send"),
        intent: |_| Intent::Send,
    },
    Rule {
        matches: |s| s.contains("delete"),
        intent: |s| Intent::Delete(position_argument(s)),
    },
];

/// Parse a line of chat input into an Intent
pub fn parse_intent(input: &str) -> Intent {
    let normalized = input.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&normalized))
        .map(|rule| (rule.intent)(&normalized))
        .unwrap_or(Intent::Unknown)
}

/// First run of decimal digits, read as a 1-based position and returned 0-based
fn position_argument(input: &str) -> Option<usize> {
    let digits = DIGITS_RE.find(input)?;
    let position = digits
        .as_str()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .unwrap_or(INVALID_POSITION);
    Some(position)
}

/// Get all available commands for help display
pub fn available_commands() -> Vec<CommandHelp> {
    vec![
        CommandHelp {
            name: "show emails",
            description: "Fetch your latest emails",
        },
        CommandHelp {
            name: "summarize [#]",
            description: "Summarize an email (defaults to the first)",
        },
        CommandHelp {
            name: "reply [#]",
            description: "Draft a reply (defaults to the selected email)",
        },
        CommandHelp {
            name: "send",
            description: "Send the drafted reply",
        },
        CommandHelp {
            name: "delete [#]",
            description: "Delete an email (defaults to the selected email)",
        },
    ]
}

/// Multi-line help shown for unrecognized input
pub fn help_text() -> String {
    let mut text = String::from(crate::constants::COMMAND_SUMMARY);
    for cmd in available_commands() {
        text.push_str(&format!("\n  {:<14} {}", cmd.name, cmd.description));
    }
    text
}
