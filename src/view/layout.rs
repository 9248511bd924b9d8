//! Layout rendering (top bar, playlist sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, AppModel};

pub fn render_top_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Title + selection
            Constraint::Length(16), // Activity
        ])
        .split(area);

    let selection = match model.selected_id() {
        Some(id) => Span::styled(id.to_string(), Style::default().fg(Color::Green)),
        None => Span::styled("No playlist selected", Style::default().fg(Color::DarkGray)),
    };
    let title = Paragraph::new(Line::from(vec![
        Span::styled("Song Requests", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  ·  "),
        selection,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(title, chunks[0]);

    let busy = model.fetching_playlist_ids.is_busy()
        || model.fetching_playlist.is_busy()
        || model.search.fetching.is_busy();
    let (text, style) = if busy {
        ("⟳ Loading...", Style::default().fg(Color::Yellow))
    } else {
        ("● Idle", Style::default().fg(Color::DarkGray))
    };
    let activity = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(activity, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let ui_state = &model.ui_state;
    let is_focused = ui_state.active_section == ActiveSection::Playlists;
    let selected = model.selected_id();

    let playlist_items: Vec<ListItem> = model
        .playlist_ids()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let is_selected = selected == Some(id.as_str());
            let style = if i == ui_state.playlist_cursor && is_focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if is_selected { "▶ " } else { "  " };
            ListItem::new(format!("{marker}{id}")).style(style)
        })
        .collect();

    let title = if model.fetching_playlist_ids.is_busy() {
        " Playlists (loading) "
    } else {
        " Playlists "
    };
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let playlists = List::new(playlist_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1))
                .border_style(border_style),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.playlist_cursor));

    frame.render_stateful_widget(playlists, area, &mut list_state);
}

/// One-line key hints under the main area
pub fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(" ↑↓ move  Enter select  a request song  n new playlist  r refresh  h help  q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, area);
}
