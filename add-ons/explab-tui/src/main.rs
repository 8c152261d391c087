//! explab-tui: keyboard-driven experiment tracker.
//! Backend traffic: explab_core::ExperimentClient; logs go to logs/explab-tui.log.

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use explab_core::{spawn_detail_poller, ClientConfig, ExperimentClient, SharedView};
use explab_tui::{ui, Action, App};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "explab-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    guard
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    let _log_guard = init_logging();
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, ".env not loaded; using process environment");
    }

    let config = ClientConfig::load()?;
    let runtime = Runtime::new()?;
    let _rt = runtime.enter();

    let view = Arc::new(SharedView::new());
    let client = Arc::new(ExperimentClient::from_config(&config, view.clone())?);

    {
        let client = Arc::clone(&client);
        runtime.spawn(async move {
            let _ = client.refresh_list().await;
        });
    }
    let poller = spawn_detail_poller(Arc::clone(&client), config.poll_interval());

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = run(&mut terminal, &runtime, &client, &view);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    runtime.block_on(poller.stop());
    tracing::info!("explab-tui exited");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    runtime: &Runtime,
    client: &Arc<ExperimentClient>,
    view: &SharedView,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::default();

    loop {
        let state = view.snapshot();
        let selected = client.current_experiment_id();
        app.follow_selection(&state, selected);
        terminal.draw(|f| ui::draw(f, &app, &state, selected))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let client = Arc::clone(client);
        match app.handle_key(key, &state) {
            Action::None => {}
            Action::Quit => break,
            Action::RefreshList => {
                runtime.spawn(async move {
                    let _ = client.refresh_list().await;
                });
            }
            Action::Select(id) => {
                runtime.spawn(async move {
                    let _ = client.select_experiment(id).await;
                });
            }
            Action::Create(request) => {
                runtime.spawn(async move {
                    let _ = client.create_experiment(&request).await;
                });
            }
        }
    }
    Ok(())
}
