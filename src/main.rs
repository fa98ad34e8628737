//! mini-copilot - Entry Point
//!
//! Loads configuration, builds the language-model and calendar clients, and
//! runs an interactive chat loop on stdin.

use mini_copilot::chat::{ChatSession, CopilotContext};
use mini_copilot::core::config::AppConfig;
use mini_copilot::core::error::Result;

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mini-copilot")]
#[command(about = "Manage an Outlook calendar by chatting with it")]
struct Args {
    /// TOML configuration file (defaults plus environment when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use an in-memory calendar instead of Microsoft Graph
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Log filter directive, overrides RUST_LOG and the configured filter
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::prepare(args.config.as_deref(), args.offline)?;

    init_tracing(args.log_filter.as_deref(), &config.logging.filter);
    match &args.config {
        Some(path) => tracing::info!(path = %path.display(), "Loaded configuration"),
        None => tracing::info!("No configuration file, using defaults and environment"),
    }
    tracing::info!(backend = ?config.calendar.backend, model = %config.llm.model, "mini-copilot starting...");

    // Service calls are async; turns are driven one at a time from the loop
    let rt = Runtime::new()?;

    let context = CopilotContext::from_config(&config)?;
    let mut session = ChatSession::new(&context);

    println!("\n=== MINI COPILOT ===");
    println!("Ask about your calendar in plain language.");
    println!();
    println!("Commands:");
    println!("  /clear          - Start a new conversation");
    println!("  /history        - Show the conversation so far");
    println!("  /odsl           - Show executed commands");
    println!("  /save <path>    - Write the conversation to a JSON file");
    println!("  quit / q        - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "/clear" {
            session.clear();
            println!("Conversation cleared.");
            continue;
        }

        if input == "/history" {
            display_history(&session);
            continue;
        }

        if input == "/odsl" {
            display_executed_commands(&session);
            continue;
        }

        if let Some(path) = input.strip_prefix("/save") {
            let path = path.trim();
            if path.is_empty() {
                println!("Usage: /save <path>");
            } else {
                match save_transcript(&session, Path::new(path)) {
                    Ok(()) => println!("Saved conversation to {}", path),
                    Err(e) => println!("Could not save conversation: {}", e),
                }
            }
            continue;
        }

        match rt.block_on(session.send_message(input)) {
            Ok(reply) => {
                println!();
                println!("{}", reply.trim_end());
                println!();
            }
            Err(e) if e.is_user_correctable() => {
                tracing::warn!(error = %e, "Turn failed");
                println!("I couldn't act on that ({}). Please rephrase.", e);
            }
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                println!("Error: {}", e);
            }
        }
    }

    tracing::info!(turns = session.history().len(), "mini-copilot exiting");
    Ok(())
}

/// Precedence: `--log-filter`, then `RUST_LOG`, then the configured filter
fn init_tracing(cli_filter: Option<&str>, configured: &str) {
    let filter = match cli_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn display_history(session: &ChatSession<'_>) {
    let history = session.history();
    if history.is_empty() {
        println!("(no messages)");
        return;
    }
    for action in history.entries() {
        println!(
            "[{}] {:<9} intent={} {}",
            action.timestamp.format("%H:%M:%S"),
            action.speaker.as_role(),
            action.intent,
            action.message.trim_end()
        );
    }
}

fn display_executed_commands(session: &ChatSession<'_>) {
    let commands = session.executed_commands();
    if commands.is_empty() {
        println!("(no commands executed)");
        return;
    }
    for (i, command) in commands.iter().enumerate() {
        println!("{:>3}. {}", i + 1, command);
    }
}

fn save_transcript(session: &ChatSession<'_>, path: &Path) -> Result<()> {
    let json = session.history().to_json()?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Saved transcript");
    Ok(())
}
