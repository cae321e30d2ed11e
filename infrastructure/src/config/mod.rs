//! Configuration file loading for chat-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PORT` and `CHAT_RELAY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./chat-relay.toml` or `./.chat-relay.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chat-relay/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileContextBudgetConfig, FileProviderConfig, FileReplConfig, FileRetryConfig,
    FileServerConfig, FileSessionsConfig,
};
pub use loader::ConfigLoader;
