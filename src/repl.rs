use crate::render::TerminalRenderer;
use anyhow::Result;
use omnibot_core::config::AppConfig;
use omnibot_core::fallback::SUGGESTIONS;
use omnibot_core::orchestrator::ReplySource;
use omnibot_core::{Dispatcher, FallbackTable, Orchestrator, TurnOutcome};
use rustyline::error::ReadlineError;
use rustyline::{Config as RlConfig, DefaultEditor};
use std::sync::Arc;

const BANNER: &str = r#"
  ╔═══════════════════════════════════════════╗
  ║             omnibot v0.1.0                ║
  ║   Videos, weather, EV charging, images,   ║
  ║   and crypto prices from one prompt       ║
  ╚═══════════════════════════════════════════╝

  Type your message and press Enter to chat.
  Commands:
    /examples      — Show example requests
    /health        — Check the backend
    /config        — Show current config
    /help          — Show this help
    /exit          — Quit
"#;

/// Run the interactive REPL.
pub async fn run(config: AppConfig) -> Result<()> {
    println!("{}", BANNER);
    println!("  Endpoint: {}", config.client.api_base);

    let fallbacks = FallbackTable::standard()?;
    let dispatcher = Arc::new(Dispatcher::new(&config.client, fallbacks.clone())?);
    if dispatcher.fallback_enabled() {
        println!("  Demo replies are used when the backend is unreachable.");
    }
    println!();

    let mut orchestrator =
        Orchestrator::new(TerminalRenderer::stdout(), dispatcher.clone(), fallbacks);

    let rl_config = RlConfig::builder().auto_add_history(true).build();
    let history_path = AppConfig::data_dir().join("repl_history.txt");
    let mut rl = DefaultEditor::with_config(rl_config)?;
    if config.repl.history {
        let _ = rl.load_history(&history_path);
    }

    let prompt = "\x1b[1;32myou\x1b[0m \x1b[1;32m❯\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                if input.starts_with('/') {
                    let handled = handle_command(input, &dispatcher, &config).await?;
                    if !handled {
                        break; // /exit
                    }
                    continue;
                }

                match orchestrator.on_send(input).await {
                    TurnOutcome::Answered {
                        category,
                        source: ReplySource::Fallback,
                    } => tracing::debug!("Answered {} from demo data", category),
                    TurnOutcome::Recovered { category } => {
                        tracing::debug!("Recovered {} turn with canned reply", category)
                    }
                    _ => {}
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    if config.repl.history {
        if let Some(parent) = history_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let _ = rl.save_history(&history_path);
    }

    tracing::debug!(
        "Session ended after {} transcript entries",
        orchestrator.renderer().transcript().len()
    );
    Ok(())
}

/// Handle a slash command. Returns `true` to continue the loop, `false` to exit.
async fn handle_command(input: &str, dispatcher: &Dispatcher, config: &AppConfig) -> Result<bool> {
    let cmd = input.split_whitespace().next().unwrap_or(input);

    match cmd {
        "/exit" | "/quit" | "/q" => {
            println!("Goodbye!");
            return Ok(false);
        }
        "/examples" => {
            println!("  You can try:");
            for suggestion in SUGGESTIONS {
                println!("    • {}", suggestion);
            }
        }
        "/health" => match dispatcher.health().await {
            Ok(status) => println!("  Backend is up: {}", status),
            Err(e) => println!("\x1b[0;31m  Backend unavailable: {}\x1b[0m", e),
        },
        "/config" => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        "/help" | "/?" => {
            println!("  /examples      — Show example requests");
            println!("  /health        — Check the backend");
            println!("  /config        — Show current config");
            println!("  /help          — Show this help");
            println!("  /exit          — Quit");
        }
        _ => {
            println!(
                "Unknown command: {}. Type /help for available commands.",
                cmd
            );
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Dispatcher, AppConfig) {
        let config = AppConfig::default();
        let dispatcher = Dispatcher::new(&config.client, FallbackTable::standard().unwrap()).unwrap();
        (dispatcher, config)
    }

    #[tokio::test]
    async fn test_exit_commands_stop_the_loop() {
        let (dispatcher, config) = fixture();
        for cmd in ["/exit", "/quit", "/q"] {
            assert!(!handle_command(cmd, &dispatcher, &config).await.unwrap(), "{cmd}");
        }
    }

    #[tokio::test]
    async fn test_other_commands_continue() {
        let (dispatcher, config) = fixture();
        for cmd in ["/examples", "/config", "/help", "/?", "/bogus", "/examples extra words"] {
            assert!(handle_command(cmd, &dispatcher, &config).await.unwrap(), "{cmd}");
        }
    }
}
