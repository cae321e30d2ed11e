//! CLI entrypoint for Chat Relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use relay_application::{CompletionGateway, RelayChatUseCase, SessionStore};
use relay_domain::ConfigIssue;
use relay_infrastructure::{ConfigLoader, FileConfig, OpenAiCompatibleGateway, ResilientGateway};
use relay_presentation::{ChatRepl, ChatServer, Cli};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);

    report_issues(&config.validate())?;

    info!("Starting Chat Relay");

    // === Dependency Injection ===
    let (model, _) = config.provider.parse_model();
    let (budget, _) = config.context_budget.to_context_budget();
    let (retry, _) = config.retry.to_retry_policy();
    let limits = config.sessions.to_session_limits();

    let Some(api_key) = config.provider.resolve_api_key() else {
        bail!(
            "No API key found. Set the {} environment variable or provider.api_key in the config file.",
            config.provider.api_key_env
        );
    };

    let http = OpenAiCompatibleGateway::new(&config.provider.base_url, api_key)
        .with_max_tokens(config.provider.max_tokens)
        .with_temperature(config.provider.temperature)
        .with_request_timeout(retry.timeout);
    let gateway: Arc<dyn CompletionGateway> =
        Arc::new(ResilientGateway::new(Arc::new(http), retry));

    let use_case = RelayChatUseCase::new(Arc::new(SessionStore::new(limits)), gateway)
        .with_model(model)
        .with_budget(budget);

    if cli.chat {
        let mut repl = ChatRepl::new(use_case)
            .with_progress(config.repl.show_progress && !cli.quiet)
            .with_color(config.repl.color);
        if let Some(path) = &config.repl.history_file {
            repl = repl.with_history_file(Some(expand_home(path)));
        }
        repl.run().await?;
        return Ok(());
    }

    let addr = config.server.bind_addr();
    ChatServer::new(use_case)
        .with_cors(config.server.cors)
        .run(&addr)
        .await
        .with_context(|| format!("server on {addr} failed"))?;

    Ok(())
}

/// Command-line flags override every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(model) = &cli.model {
        config.provider.model = model.clone();
    }
}

/// Log every issue; fail if any of them is an error.
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        if issue.is_error() {
            error!("{}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("configuration has {errors} error(s)");
    }
    Ok(())
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
