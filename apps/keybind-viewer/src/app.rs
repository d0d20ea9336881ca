//! Application state and logic.

use crate::config::Config;
use crate::keybinds::KeybindFile;
use crate::search::{self, SearchHit};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::TableState;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Rows moved by PageUp/PageDown.
const PAGE_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Tab strip plus the selected file's keybinds.
    Tabs,
    /// Flattened matches across all files.
    Results,
    /// A search that matched nothing.
    NoResults,
}

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

pub struct App {
    pub config: Config,
    pub files: Vec<KeybindFile>,
    pub selected_file: usize,
    pub search: String,
    pub table_state: TableState,
    loader: Option<Receiver<Vec<KeybindFile>>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            files: Vec::new(),
            selected_file: 0,
            search: String::new(),
            table_state: TableState::default(),
            loader: None,
        }
    }

    /// Start with an empty collection that fills in once `loader` delivers.
    pub fn with_loader(config: Config, loader: Receiver<Vec<KeybindFile>>) -> Self {
        let mut app = Self::new(config);
        app.loader = Some(loader);
        app
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_some()
    }

    /// Install loaded files if the loader has finished.
    pub fn poll_loader(&mut self) {
        let Some(rx) = &self.loader else {
            return;
        };
        match rx.try_recv() {
            Ok(files) => {
                self.loader = None;
                self.set_files(files);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("keybind loader exited without a result");
                self.loader = None;
            }
        }
    }

    pub fn set_files(&mut self, files: Vec<KeybindFile>) {
        self.files = files;
        if self.selected_file >= self.files.len() {
            self.selected_file = 0;
        }
        self.reset_cursor();
    }

    pub fn selected(&self) -> Option<&KeybindFile> {
        self.files.get(self.selected_file)
    }

    /// Advance to the next tab, wrapping after the last one.
    pub fn cycle_tab(&mut self) {
        if self.files.is_empty() {
            return;
        }
        self.selected_file = if self.selected_file + 1 >= self.files.len() {
            0
        } else {
            self.selected_file + 1
        };
        self.reset_cursor();
    }

    pub fn cycle_tab_back(&mut self) {
        if self.files.is_empty() {
            return;
        }
        self.selected_file = if self.selected_file == 0 {
            self.files.len() - 1
        } else {
            self.selected_file - 1
        };
        self.reset_cursor();
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.files.len() && index != self.selected_file {
            self.selected_file = index;
            self.reset_cursor();
        }
    }

    pub fn is_searching(&self) -> bool {
        !self.search.is_empty()
    }

    pub fn hits(&self) -> Vec<SearchHit<'_>> {
        if self.is_searching() {
            search::filter(&self.files, &self.search)
        } else {
            Vec::new()
        }
    }

    pub fn view(&self) -> View {
        if !self.is_searching() {
            View::Tabs
        } else if self.hits().is_empty() {
            View::NoResults
        } else {
            View::Results
        }
    }

    fn row_count(&self) -> usize {
        match self.view() {
            View::Tabs => self.selected().map_or(0, |f| f.keybinds.len()),
            View::Results => self.hits().len(),
            View::NoResults => 0,
        }
    }

    fn reset_cursor(&mut self) {
        self.table_state = TableState::default();
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match self.table_state.selected() {
            Some(current) => current as isize + delta,
            // First move lands on the top row.
            None => delta.max(1) - 1,
        };
        let next = next.clamp(0, rows as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    fn set_search(&mut self, search: String) {
        self.search = search;
        self.reset_cursor();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Control::Exit,
            KeyCode::Char('c') if ctrl => return Control::Exit,
            KeyCode::Char('u') if ctrl => self.set_search(String::new()),
            KeyCode::Tab => self.cycle_tab(),
            KeyCode::BackTab => self.cycle_tab_back(),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(PAGE_ROWS as isize),
            KeyCode::PageUp => self.move_cursor(-(PAGE_ROWS as isize)),
            KeyCode::Home => self.move_cursor(isize::MIN / 2),
            KeyCode::End => self.move_cursor(isize::MAX / 2),
            KeyCode::Backspace => {
                let mut search = std::mem::take(&mut self.search);
                search.pop();
                self.set_search(search);
            }
            KeyCode::Char(c) if !ctrl => {
                let mut search = std::mem::take(&mut self.search);
                search.push(c);
                self.set_search(search);
            }
            _ => {}
        }
        Control::Continue
    }
}
