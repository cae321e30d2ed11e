//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! (`RetryPolicy`, `SessionLimits`, `ContextBudget`) at startup.

mod context_budget;
mod provider;
mod repl;
mod retry;
mod server;
mod sessions;

pub use context_budget::FileContextBudgetConfig;
pub use provider::FileProviderConfig;
pub use repl::FileReplConfig;
pub use retry::FileRetryConfig;
pub use server::FileServerConfig;
pub use sessions::FileSessionsConfig;

use relay_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener
    pub server: FileServerConfig,
    /// Completion API
    pub provider: FileProviderConfig,
    /// History forwarded per request
    pub context_budget: FileContextBudgetConfig,
    /// Session store bounds
    pub sessions: FileSessionsConfig,
    /// Retry and deadline for completion calls
    pub retry: FileRetryConfig,
    /// Interactive chat mode
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Warnings have a safe fallback; errors mean the relay cannot start.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.provider.validate());
        issues.extend(self.context_budget.to_context_budget().1);
        issues.extend(self.retry.to_retry_policy().1);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
host = "127.0.0.1"
port = 8080
cors = false

[provider]
api_key_env = "GROQ_API_KEY"
model = "llama-3.3-70b-versatile"
max_tokens = 512

[context_budget]
max_messages = 8

[sessions]
max_sessions = 100
strict_reads = true

[retry]
max_retries = 1
timeout_secs = 10

[repl]
show_progress = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert!(!config.server.cors);
        assert_eq!(config.provider.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.provider.max_tokens, Some(512));
        assert_eq!(
            config.provider.parse_model().0,
            relay_domain::Model::Llama33_70bVersatile
        );
        assert_eq!(config.context_budget.max_messages, 8);
        assert_eq!(config.context_budget.max_chars, 24_000);
        assert_eq!(config.sessions.max_sessions, 100);
        assert!(config.sessions.strict_reads);
        assert_eq!(config.retry.max_retries, 1);
        assert!(!config.repl.show_progress);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_issues_from_all_sections() {
        let mut config = FileConfig::default();
        config.provider.model = String::new();
        config.retry.timeout_secs = 0;
        config.context_budget.max_messages = 0;
        config.context_budget.max_chars = 0;

        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| !i.is_error()));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config: FileConfig = toml::from_str("[server]\nworkers = 4\n").unwrap();
        assert_eq!(config.server, FileServerConfig::default());
    }
}
