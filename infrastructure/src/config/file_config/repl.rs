//! Interactive chat configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};

/// Settings for `--chat` mode.
///
/// # Example
///
/// ```toml
/// [repl]
/// show_progress = false
/// history_file = "~/.local/share/chat-relay/history.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show a spinner while waiting for a reply
    pub show_progress: bool,
    /// Colored prompt and replies
    pub color: bool,
    /// Path to the line-editor history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            color: true,
            history_file: None,
        }
    }
}
