//! Completion provider configuration from TOML (`[provider]` section)

use relay_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};

/// OpenAI-compatible completion API settings (Groq by default).
///
/// # Example
///
/// ```toml
/// [provider]
/// api_key_env = "GROQ_API_KEY"
/// base_url = "https://api.groq.com/openai/v1"
/// model = "llama-3.3-70b-versatile"
/// temperature = 0.7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key (default: "API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead).
    pub api_key: Option<String>,
    /// Base URL of the API; `/chat/completions` is appended.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Optional cap on reply tokens.
    pub max_tokens: Option<u32>,
    /// Optional sampling temperature.
    pub temperature: Option<f32>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: Model::default().to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl FileProviderConfig {
    /// API key from the configured environment variable, falling back to
    /// the inline `api_key`. Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    /// Parse the model, falling back to the default for an empty value.
    pub fn parse_model(&self) -> (Model, Vec<ConfigIssue>) {
        if self.model.trim().is_empty() {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::EmptyValue {
                    field: "provider.model".to_string(),
                },
                format!(
                    "provider.model is empty, falling back to '{}'",
                    Model::default()
                ),
            );
            return (Model::default(), vec![issue]);
        }
        let Ok(model) = self.model.parse::<Model>();
        (model, vec![])
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_model().1;
        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "provider.base_url".to_string(),
                },
                "provider.base_url must not be empty",
            ));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidValue {
                        field: "provider.temperature".to_string(),
                        value: t.to_string(),
                    },
                    format!("provider.temperature {t} is outside 0.0..=2.0 and may be rejected"),
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults_target_groq() {
        let config = FileProviderConfig::default();
        assert_eq!(config.api_key_env, "API_KEY");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert!(config.base_url.contains("groq.com"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_inline_key_used_when_env_missing() {
        let config = FileProviderConfig {
            api_key_env: "CHAT_RELAY_TEST_UNSET_KEY_VAR".to_string(),
            api_key: Some("inline".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("inline"));

        let blank = FileProviderConfig {
            api_key: Some("  ".to_string()),
            ..config
        };
        assert_eq!(blank.resolve_api_key(), None);
    }

    #[test]
    fn test_empty_model_falls_back() {
        let config = FileProviderConfig {
            model: " ".to_string(),
            ..Default::default()
        };
        let (model, issues) = config.parse_model();
        assert_eq!(model, Model::default());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_empty_base_url_is_error() {
        let config = FileProviderConfig {
            base_url: String::new(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
