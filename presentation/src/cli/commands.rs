//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chat-relay
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(author, version, about = "Session-aware relay between chat front-ends and an LLM completion API")]
#[command(long_about = r#"
Chat Relay forwards chat messages to an OpenAI-compatible completion API
(Groq by default), keeping a separate history per session and sending a
bounded window of that history with every request.

By default it serves an HTTP API:
  POST /chat                         {"message": "...", "session_id": "..."}
  GET  /chat/{session_id}/history
  GET  /health

The API key is read from the environment variable named by
provider.api_key_env (default: API_KEY).

Configuration files are loaded from (in priority order):
1. PORT, CHAT_RELAY_<SECTION>__<KEY>   Environment overrides
2. --config <path>                     Explicit config file
3. ./chat-relay.toml                   Project-level config
4. ~/.config/chat-relay/config.toml    Global config

Example:
  chat-relay --port 8080
  chat-relay --chat -m llama-3.3-70b-versatile
"#)]
pub struct Cli {
    /// Start interactive chat mode instead of the HTTP server
    #[arg(short, long)]
    pub chat: bool,

    /// Interface to bind (overrides server.host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to bind (overrides server.port and PORT)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Completion model (overrides provider.model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators in chat mode
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Default log filter for the verbosity level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
