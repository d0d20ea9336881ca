//! UI rendering for keybind viewer.

use crate::app::{App, View};
use crate::search::{Highlighter, SearchHit};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub search: Rect,
    pub tabs: Option<Rect>,
    pub body: Rect,
    pub status: Option<Rect>,
}

pub fn layout(app: &App, area: Rect) -> Areas {
    let show_status = app.config.display.show_status_bar;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(if show_status { 1 } else { 0 }),
        ])
        .split(area);

    let (tabs, body) = if app.view() == View::Tabs {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(chunks[1]);
        (Some(split[0]), split[1])
    } else {
        (None, chunks[1])
    };

    Areas {
        search: chunks[0],
        tabs,
        body,
        status: show_status.then_some(chunks[2]),
    }
}

/// Tab index under a terminal cell, if the tab strip is showing.
///
/// Mirrors the `Tabs` widget's layout: one space of padding on each side of
/// a title and a one-column divider between titles.
pub fn tab_at(app: &App, area: Rect, column: u16, row: u16) -> Option<usize> {
    let tabs = layout(app, area).tabs?;
    let inner = tabs.inner(Margin::new(1, 1));
    if row != inner.y || column < inner.x || column >= inner.right() {
        return None;
    }

    let mut x = inner.x;
    for (i, file) in app.files.iter().enumerate() {
        let width = u16::try_from(Line::from(file.name.as_str()).width())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        if column >= x && column < x.saturating_add(width) {
            return Some(i);
        }
        x = x.saturating_add(width).saturating_add(1);
        if x >= inner.right() {
            break;
        }
    }
    None
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout(app, f.area());

    draw_search(f, app, areas.search);

    match app.view() {
        View::Tabs => {
            if let Some(tabs) = areas.tabs {
                draw_tabs(f, app, tabs);
            }
            draw_file(f, app, areas.body);
        }
        View::Results => draw_results(f, app, areas.body),
        View::NoResults => draw_no_results(f, app, areas.body),
    }

    if let Some(status) = areas.status {
        draw_status(f, status);
    }
}

fn draw_search(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.search.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled("Search keybinds...", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(app.search.as_str()),
        ])
    };

    let search = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keybind Viewer ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(search, area);

    // The search box always has focus.
    let typed = u16::try_from(Line::from(app.search.as_str()).width()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(3)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2));
    f.set_cursor_position((x, area.y.saturating_add(1)));
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app.files.iter().map(|file| Line::from(file.name.as_str())).collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Files "))
        .select(app.selected_file)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
    f.render_widget(tabs, area);
}

fn draw_file(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(file) = app.files.get(app.selected_file) else {
        let message = if app.is_loading() {
            "Loading keybind files..."
        } else {
            "No keybind files found"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let rows: Vec<Row> = file
        .keybinds
        .iter()
        .map(|kb| Row::new(vec![Cell::from(kb.key.as_str()), Cell::from(kb.binding.as_str())]))
        .collect();
    let title = format!(" {} ({} keybinds) ", file.name, file.keybinds.len());

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(header_row(&["Key", "Binding"]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(cursor_style());
    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_results(f: &mut Frame, app: &mut App, area: Rect) {
    let mut state = std::mem::take(&mut app.table_state);
    let highlighter = Highlighter::new(&app.search);
    let match_style = Style::default()
        .fg(app.config.display.highlight_color())
        .add_modifier(Modifier::BOLD);

    let hits = app.hits();
    let count = hits.len();
    let rows: Vec<Row> = hits
        .iter()
        .map(|hit: &SearchHit| {
            Row::new(vec![
                Cell::from(highlighted_line(&highlighter, hit.file_name, match_style)),
                Cell::from(highlighted_line(&highlighter, hit.key, match_style)),
                Cell::from(highlighted_line(&highlighter, hit.binding, match_style)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(45),
            Constraint::Percentage(35),
        ],
    )
    .header(header_row(&["File Name", "Key", "Binding"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(match_title(count)),
    )
    .row_highlight_style(cursor_style());

    f.render_stateful_widget(table, area, &mut state);
    app.table_state = state;
}

fn draw_no_results(f: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No results for",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("'{}'", app.search),
            Style::default().fg(app.config.display.highlight_color()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "No filenames, actions, or keybinds match",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let panel = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn draw_status(f: &mut Frame, area: Rect) {
    let status = Paragraph::new("Type to search  Tab: Next file  ↑/↓: Scroll  Ctrl+U: Clear  Esc: Quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, area);
}

fn highlighted_line<'a>(highlighter: &Highlighter, text: &'a str, style: Style) -> Line<'a> {
    Line::from(
        highlighter
            .segments(text)
            .into_iter()
            .map(|seg| {
                if seg.highlighted {
                    Span::styled(seg.text, style)
                } else {
                    Span::raw(seg.text)
                }
            })
            .collect::<Vec<_>>(),
    )
}

fn match_title(count: usize) -> String {
    if count == 1 {
        " 1 match ".to_string()
    } else {
        format!(" {} matches ", count)
    }
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.iter().copied().map(Cell::from).collect::<Vec<_>>())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .bottom_margin(1)
}

fn cursor_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}
