//! Console formatting for interactive chat

use colored::Colorize;
use relay_domain::{Message, Role};

/// Formats replies and histories for terminal display
pub struct ConsoleFormatter {
    color: bool,
}

impl ConsoleFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Prefix shown before each assistant reply.
    pub fn reply(&self, reply: &str) -> String {
        let label = Self::label(Role::Assistant);
        if self.color {
            format!("{} {}", label.green().bold(), reply)
        } else {
            format!("{label} {reply}")
        }
    }

    pub fn error(&self, message: &str) -> String {
        if self.color {
            format!("{} {}", "Error:".red().bold(), message)
        } else {
            format!("Error: {message}")
        }
    }

    /// One line per message, numbered by sequence.
    pub fn history(&self, messages: &[Message]) -> String {
        if messages.is_empty() {
            return "(no messages yet)".to_string();
        }
        messages
            .iter()
            .map(|m| {
                let label = format!("{:>4} {}", m.seq, Self::label(m.role));
                let label = match (self.color, m.role) {
                    (false, _) => label,
                    (true, Role::User) => label.cyan().to_string(),
                    (true, Role::Assistant) => label.green().to_string(),
                };
                format!("{label} {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn label(role: Role) -> &'static str {
        match role {
            Role::User => "You:",
            Role::Assistant => "Bot:",
        }
    }
}
