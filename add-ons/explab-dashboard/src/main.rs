//! **explab**: experiment tracking from the terminal.
//!
//! ## Usage
//!
//! ```text
//! explab list                         — table of all experiments (default)
//! explab show <id>                    — status + conversation of one experiment
//! explab create <prompt> [--ai-client C] [--model M | --model C:M]
//! explab watch <id>                   — follow an experiment until Ctrl-C
//! explab config                       — print the effective configuration
//! explab --help
//! ```
//!
//! Configure via `EXPLAB_CONFIG` / `config/explab.toml` or `EXPLAB__*` env vars.

mod args;
mod render;

use chrono::Utc;
use explab_core::{
    spawn_detail_poller, ClientConfig, DetailOutcome, ExperimentClient, ExperimentId, SharedView,
    ViewState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when set and non-empty, otherwise `info`.
fn log_directive(rust_log: Option<String>) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_directive(
            std::env::var("RUST_LOG").ok(),
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, ".env not loaded; using process environment");
    }

    let argv: Vec<String> = std::env::args().collect();
    let sub = argv.get(1).map(|s| s.as_str()).unwrap_or("list");

    let result = match sub {
        "list" | "ls" => run_list().await,
        "show" => run_show(args::parse_id(argv.get(2))).await,
        "create" => run_create(&argv[2..]).await,
        "watch" => run_watch(args::parse_id(argv.get(2))).await,
        "config" => run_config(),
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        other => Err(format!(
            "Unknown subcommand '{}'. Use: explab list | show <id> | create <prompt> | watch <id> | config",
            other
        )),
    };

    if let Err(e) = result {
        eprintln!("explab {}: {}", sub, e);
        std::process::exit(1);
    }
}

fn print_help() {
    println!("explab v{}", VERSION);
    println!();
    println!("Usage: explab [COMMAND]");
    println!();
    println!("Commands:");
    println!("  list                 Table of all experiments (default)");
    println!("  show <id>            Status and conversation of one experiment");
    println!("  create <prompt>      Start an experiment; --ai-client C, --model M (or --model C:M)");
    println!("  watch <id>           Poll an experiment and print new messages until Ctrl-C");
    println!("  config               Print the effective configuration");
    println!("  help                 Print this help message");
    println!();
    println!("Configuration: EXPLAB_CONFIG or config/explab.toml, overridden by EXPLAB__* env vars.");
}

fn load_config() -> Result<ClientConfig, String> {
    ClientConfig::load().map_err(|e| format!("Config: {}", e))
}

fn build_client() -> Result<(ClientConfig, Arc<ExperimentClient>, Arc<SharedView>), String> {
    let config = load_config()?;
    let view = Arc::new(SharedView::new());
    let client = ExperimentClient::from_config(&config, view.clone()).map_err(|e| e.to_string())?;
    Ok((config, Arc::new(client), view))
}

async fn run_list() -> Result<(), String> {
    let (config, client, _view) = build_client()?;
    let experiments = client.refresh_list().await.map_err(|e| e.to_string())?;

    println!();
    println!(
        "  explab v{}  —  {}  —  {}",
        VERSION,
        config.api_base_url,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    if experiments.is_empty() {
        println!("  No experiments yet. Start one with `explab create <prompt>`.");
    } else {
        println!("{}", render::experiments_table(&experiments));
    }
    println!();
    Ok(())
}

/// Lists, then selects `id` so the selection is always a backend-issued id.
async fn select(client: &ExperimentClient, id: ExperimentId) -> Result<(), String> {
    client.refresh_list().await.map_err(|e| e.to_string())?;
    match client.select_experiment(id).await.map_err(|e| e.to_string())? {
        DetailOutcome::Rendered(_) => Ok(()),
        other => Err(format!("no detail rendered for #{} ({:?})", id, other)),
    }
}

fn print_detail(id: ExperimentId, view: &SharedView) {
    let state = view.snapshot();
    let status = state.status.as_deref().unwrap_or("unknown");
    println!();
    println!("  Experiment #{}  —  status: {}", id, status);
    println!("  {}", "─".repeat(60));
    if state.transcript.is_empty() {
        println!("  (no messages yet)");
    } else {
        println!("{}", state.transcript);
    }
    println!();
}

async fn run_show(id: Result<ExperimentId, String>) -> Result<(), String> {
    let id = id?;
    let (_config, client, view) = build_client()?;
    select(&client, id).await?;
    print_detail(id, &view);
    Ok(())
}

async fn run_create(rest: &[String]) -> Result<(), String> {
    let request = args::parse_create_args(rest)?;
    let (_config, client, view) = build_client()?;
    let id = client.create_experiment(&request).await.map_err(|e| e.to_string())?;

    println!("Created experiment #{} ({} / {})", id, request.ai_client, request.model);
    print_detail(id, &view);
    if let Some(err) = view.snapshot().error {
        eprintln!("warning: {} failed: {}", err.operation, err.message);
    }
    println!("Follow it with `explab watch {}`.", id);
    Ok(())
}

async fn run_watch(id: Result<ExperimentId, String>) -> Result<(), String> {
    let id = id?;
    let (config, client, view) = build_client()?;
    let mut updates = view.subscribe();
    select(&client, id).await?;

    let mut shown = updates.borrow_and_update().clone();
    println!("Watching experiment #{} every {} ms (Ctrl-C to stop)", id, config.poll_interval().as_millis());
    for line in render::watch_delta(&ViewState::default(), &shown) {
        println!("{}", line);
    }

    let poller = spawn_detail_poller(client.clone(), config.poll_interval());
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = updates.borrow_and_update().clone();
                for line in render::watch_delta(&shown, &next) {
                    println!("[{}] {}", Utc::now().format("%H:%M:%S"), line);
                }
                shown = next;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("CTRL-C received; stopping watch");
                break;
            }
        }
    }
    poller.stop().await;
    Ok(())
}

fn run_config() -> Result<(), String> {
    let config = load_config()?;
    let rendered = config.to_toml().map_err(|e| format!("Config: {}", e))?;
    print!("{}", rendered);
    Ok(())
}
