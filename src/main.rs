mod render;
mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use omnibot_core::config::AppConfig;
use omnibot_core::{Dispatcher, FallbackTable, Orchestrator};
use render::TerminalRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "omnibot",
    about = "Chat client for the omnibot video, weather, EV, image, and crypto API",
    version,
    author
)]
struct Cli {
    /// Path to config file (default: ~/.config/omnibot/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL (e.g. http://localhost:8000/api)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Host the client reports as its origin; non-local hosts enable demo fallbacks
    #[arg(long, global = true)]
    origin_host: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive chat (default)
    Chat,

    /// Send a single message and print the reply
    Ask {
        /// The message to send
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Start the demo backend server
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize default configuration file
    Init,
    /// Print config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "omnibot=info,warn".into()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config.
    let mut config = match &cli.config {
        Some(path) if path.exists() => AppConfig::load_from(path)?,
        Some(path) => {
            tracing::warn!("No config at {}, using defaults", path.display());
            AppConfig::default()
        }
        None => AppConfig::load()?,
    };

    // Apply CLI overrides.
    if let Some(api_base) = &cli.api_base {
        config.client.api_base = api_base.clone();
    }
    if let Some(host) = &cli.origin_host {
        config.client.origin_host = Some(host.clone());
    }
    if let Some(secs) = cli.timeout {
        config.client.timeout_secs = secs;
    }

    tracing::debug!(
        "endpoint: {}, origin: {}, timeout: {}s",
        config.client.api_base,
        config.client.resolved_origin_host(),
        config.client.timeout_secs,
    );

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            omnibot_server::serve(config.server).await?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, &config, cli.config.as_deref())?;
        }
        Some(Commands::Ask { message }) => {
            ask(&config, &message.join(" ")).await?;
        }
        Some(Commands::Chat) | None => {
            repl::run(config).await?;
        }
    }

    Ok(())
}

async fn ask(config: &AppConfig, message: &str) -> Result<()> {
    let fallbacks = FallbackTable::standard()?;
    let dispatcher = Dispatcher::new(&config.client, fallbacks.clone())?;
    let renderer = TerminalRenderer::stdout();
    print!("{}", render::user_line(message.trim(), renderer.color()));
    let mut orchestrator = Orchestrator::new(renderer, Arc::new(dispatcher), fallbacks);

    let outcome = orchestrator.on_send(message).await;
    tracing::debug!("Turn finished: {:?}", outcome);
    Ok(())
}

fn handle_config_command(
    action: Option<ConfigAction>,
    config: &AppConfig,
    explicit_path: Option<&std::path::Path>,
) -> Result<()> {
    let path = explicit_path
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);
    match action {
        Some(ConfigAction::Show) | None => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        Some(ConfigAction::Init) => {
            if path.exists() {
                println!("Config already exists at: {}", path.display());
            } else {
                config.save_to(&path)?;
                println!("Created default config at: {}", path.display());
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", path.display());
        }
    }
    Ok(())
}
