//! Playlist entries table and notes panel

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, AppModel, EntryStatus, PlaylistEntry};
use super::utils::{display_submitter, time_ago, truncate_string};

const EMPTY_PLAYLIST_HINT: &str =
    "There are no songs in this playlist yet, press 'a' to request one.";
const NO_NOTES: &str = "There are no notes to display at this time.";

pub fn status_style(status: &EntryStatus) -> Style {
    match status {
        EntryStatus::Pending => Style::default().fg(Color::Yellow),
        EntryStatus::Approved => Style::default().fg(Color::Green),
        EntryStatus::Rejected => Style::default().fg(Color::Red),
        EntryStatus::Other(_) => Style::default(),
    }
}

pub fn render_main_content(frame: &mut Frame, area: Rect, model: &AppModel, hidden_domain: Option<&str>) {
    let is_focused = model.ui_state.active_section == ActiveSection::Entries;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let Some(selected_id) = model.selected_id() else {
        let content = Paragraph::new("Select a playlist on the left, or press 'n' to create one")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
        frame.render_widget(content, area);
        return;
    };

    let mut title = format!(" {} ", selected_id.to_uppercase());
    if model.fetching_playlist.is_busy() {
        title.push_str("(loading) ");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    let entries = model.selected_playlist().map(Vec::as_slice).unwrap_or_default();
    if entries.is_empty() {
        let text = if model.fetching_playlist.is_busy() {
            "Loading..."
        } else {
            EMPTY_PLAYLIST_HINT
        };
        let hint = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Entries
            Constraint::Length(5), // Notes of the highlighted entry
        ])
        .split(area);

    let content_width = chunks[0].width.saturating_sub(4) as usize;
    let items = render_entry_items(
        entries,
        model.ui_state.entry_cursor,
        is_focused,
        content_width,
        hidden_domain,
    );

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default());

    let mut list_state = ListState::default();
    list_state.select(Some(model.ui_state.entry_cursor + 1)); // +1 for header

    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    render_notes(frame, chunks[1], model.entry_under_cursor());
}

fn render_entry_items(
    entries: &[PlaylistEntry],
    selected_index: usize,
    is_focused: bool,
    content_width: usize,
    hidden_domain: Option<&str>,
) -> Vec<ListItem<'static>> {
    let submitted_width = 16;
    let status_width = 10;
    let fixed_width = submitted_width + 3 + 3 + 3 + 3 + status_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let by_width = remaining_width / 4;
    let title_width = (remaining_width.saturating_sub(by_width) * 55) / 100;
    let artist_width = remaining_width
        .saturating_sub(by_width)
        .saturating_sub(title_width);

    let mut items: Vec<ListItem<'static>> = vec![
        ListItem::new(format!(
            "{:<submitted_width$}   {:<by_width$}   {:<title_width$}   {:<artist_width$}   {}",
            "Submitted", "By", "Title", "Artist", "Status",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    let now = Utc::now();
    items.extend(entries.iter().enumerate().map(|(i, entry)| {
        let row_style = if i == selected_index && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if i == selected_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let submitted = truncate_string(&time_ago(&entry.submitted_on, now), submitted_width);
        let by = truncate_string(display_submitter(&entry.submitted_by, hidden_domain), by_width);
        let title = truncate_string(&entry.title, title_width);
        let artist = truncate_string(&entry.artist, artist_width);

        ListItem::new(Line::from(vec![
            Span::styled(format!("{submitted}   {by}   {title}   {artist}   "), row_style),
            Span::styled(entry.status.clone(), status_style(&entry.status_kind())),
        ]))
    }));

    items
}

fn render_notes(frame: &mut Frame, area: Rect, entry: Option<&PlaylistEntry>) {
    let (text, style) = match entry {
        Some(entry) if !entry.notes.is_empty() => (entry.notes.clone(), Style::default()),
        _ => (
            NO_NOTES.to_string(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
    };

    let notes = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Notes ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(notes, area);
}
