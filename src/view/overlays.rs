//! Overlay rendering (notifications, dialogs, help popup)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::model::{AppModel, RequestField};
use super::utils::centered_rect;

fn dialog_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Black))
}

pub fn render_notification(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;

    let line_count = message.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup_area = centered_rect(area, popup_width, 2 + line_count);

    frame.render_widget(Clear, popup_area);

    let widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(dialog_block(" Alert (Esc to dismiss) ", Color::Red));

    frame.render_widget(widget, popup_area);
}

fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:>8}: "), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{value}{cursor}"), style),
    ])
}

pub fn render_new_playlist_dialog(frame: &mut Frame, model: &AppModel) {
    let popup_area = centered_rect(frame.area(), 50, 5);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        input_line("Name", &model.new_playlist_id, true),
        Line::from(Span::styled(
            "Enter to create, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let dialog = Paragraph::new(lines).block(dialog_block(" New Playlist ", Color::Cyan));
    frame.render_widget(dialog, popup_area);
}

pub fn render_request_dialog(frame: &mut Frame, model: &AppModel, field: RequestField) {
    let popup_area = centered_rect(frame.area(), 64, 20);
    frame.render_widget(Clear, popup_area);

    let title = format!(" Request Song for {} ", model.selected_id().unwrap_or_default());
    let block = dialog_block(&title, Color::Cyan);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title + artist
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Search box
            Constraint::Min(0),    // Results
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let form = Paragraph::new(vec![
        input_line("Title", &model.request.title, field == RequestField::Title),
        input_line("Artist", &model.request.artist, field == RequestField::Artist),
    ]);
    frame.render_widget(form, chunks[0]);

    let search = Paragraph::new(input_line(
        "Search",
        &model.search.search_string,
        field == RequestField::Search,
    ));
    frame.render_widget(search, chunks[2]);

    render_search_results(frame, chunks[3], model, field == RequestField::Results);

    let hints = Paragraph::new("Tab next field  Enter submit (or pick result)  Esc close")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, chunks[4]);
}

fn render_search_results(frame: &mut Frame, area: Rect, model: &AppModel, is_focused: bool) {
    let results = &model.search.results;
    let cursor = model.ui_state.result_cursor;

    let items: Vec<ListItem> = results
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let style = if i == cursor && is_focused {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{} - {}", song.title, song.artist)).style(style)
        })
        .collect();

    let title = if model.search.fetching.is_busy() {
        " Results (searching...) ".to_string()
    } else {
        format!(" Results ({}) ", results.len())
    };
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(border_style)
            .title(title),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(cursor));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = [
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Switch pane"),
        ("↑ / ↓", "Move highlight"),
        ("Enter", "Select playlist"),
        ("", ""),
        ("", "── Requests ──"),
        ("A", "Request a song"),
        ("N", "New playlist"),
        ("R", "Refresh playlist"),
        ("", ""),
        ("", "── Request dialog ──"),
        ("Tab", "Title / Artist / Search / Results"),
        ("Enter", "Submit, or pick a result"),
        ("Esc", "Close"),
        ("", ""),
        ("", "── General ──"),
        ("H / ?", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_area = centered_rect(area, 62, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(dialog_block(" Help (H or Esc to close) ", Color::Cyan))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
