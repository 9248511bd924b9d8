mod auth;
mod config;
mod controller;
mod logging;
mod model;
mod util;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use config::Config;
use controller::AppController;
use model::{AppModel, GatewayClient};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== Song Requests Client Starting ===");

    let config = Config::load()?;
    tracing::debug!(gateway = %config.gateway_url, search = %config.search_url, "Configuration loaded");

    let session = auth::perform_oauth_flow(&config).await?;

    let gateway = Arc::new(GatewayClient::new(
        config.gateway_url.clone(),
        config.search_url.clone(),
    ));
    let model = Arc::new(Mutex::new(AppModel::new()));
    let controller = AppController::new(model.clone(), gateway, session);

    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.load_playlist_ids().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller.clone(), config.hidden_domain.as_deref()).await;

    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Song Requests Client shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    hidden_domain: Option<&str>,
) -> Result<()> {
    loop {
        let should_quit = {
            let model_guard = model.lock().await;
            terminal.draw(|f| AppView::render(f, &model_guard, hidden_domain))?;
            model_guard.should_quit()
        };

        if should_quit {
            break;
        }

        // Short poll keeps background updates visible
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
