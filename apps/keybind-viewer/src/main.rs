#![allow(dead_code)]
//! Keybind Viewer - Browse and search keybind files.
//!
//! Features:
//! - One tab per keybind file, Tab to cycle
//! - Search across every file at once with highlighted matches
//! - Hyprland `bind =` lines shown alongside plain `key=binding` files

mod app;
mod config;
mod keybinds;
mod logging;
mod provider;
mod search;
mod ui;

use anyhow::Result;
use app::{App, Control};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use provider::FsProvider;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{io, time::Duration};

fn main() -> Result<()> {
    // Reported before raw mode; the viewer still runs without a log file.
    let _log_guard = match Config::log_dir() {
        Some(dir) => match logging::init(&dir) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("keybind-viewer: logging disabled, {}: {}", dir.display(), err);
                None
            }
        },
        None => {
            eprintln!("keybind-viewer: logging disabled, no data directory");
            None
        }
    };

    let config = Config::load();
    let loader = keybinds::spawn_loader(FsProvider::new(&config.sources));
    let mut app = App::with_loader(config, loader);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "keybind viewer exited with an error");
    }
    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.poll_loader();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if app.handle_key(key) == Control::Exit {
                    tracing::info!("exit requested");
                    return Ok(());
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                if let Some(index) = ui::tab_at(app, area, mouse.column, mouse.row) {
                    app.select_tab(index);
                }
            }
            _ => {}
        }
    }
}
