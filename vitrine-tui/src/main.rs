//! VITRINE TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use vitrine_tui::api_client::ApiClient;
use vitrine_tui::config::TuiConfig;
use vitrine_tui::error::TuiError;
use vitrine_tui::keys::{map_key, Action};
use vitrine_tui::state::{App, Request};
use vitrine_tui::views::render_view;

const INPUT_POLL: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    let api = ApiClient::new(&config)?;
    let mut app = App::new(config);

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let initial = app.initial_request();
    terminal.draw(|f| render_view(f, &app))?;
    run_request(&api, &mut app, initial).await;

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let CrosstermEvent::Key(key) = event::read()? else {
            continue;
        };
        let Some(action) = map_key(key, app.input_mode) else {
            continue;
        };
        if action == Action::Quit {
            break;
        }
        if let Some(request) = app.handle_action(action) {
            terminal.draw(|f| render_view(f, &app))?;
            run_request(&api, &mut app, request).await;
        }
    }

    Ok(())
}

async fn run_request(api: &ApiClient, app: &mut App, request: Request) {
    match request {
        Request::LoadItems(query) => app.on_items_loaded(api.list_items(&query).await),
        Request::LoadItem(id) => app.on_item_loaded(api.get_item(id).await),
        Request::LoadStats => app.on_stats_loaded(api.stats().await),
        Request::RefreshStats => app.on_stats_refreshed(api.refresh_stats().await),
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restores the terminal on every exit path.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}
