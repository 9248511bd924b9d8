//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared formatting helpers (relative time, truncation, popups)
//! - `layout`: Main layout structure (top bar, playlist sidebar, hints)
//! - `content`: Playlist entries and notes
//! - `overlays`: Notifications, dialogs and help

mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{AppModel, Dialog};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, model: &AppModel, hidden_domain: Option<&str>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + activity
                Constraint::Min(0),    // Sidebar + entries
                Constraint::Length(1), // Key hints
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], model);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25), // Playlists
                Constraint::Percentage(75), // Entries
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], model);
        content::render_main_content(frame, main_chunks[1], model, hidden_domain);
        layout::render_hints(frame, chunks[2]);

        match model.ui_state.dialog {
            Dialog::None => {}
            Dialog::NewPlaylist => overlays::render_new_playlist_dialog(frame, model),
            Dialog::RequestSong(field) => overlays::render_request_dialog(frame, model, field),
            Dialog::Help => overlays::render_help_popup(frame),
        }

        // Notifications sit above everything else
        if let Some(message) = model.current_notification() {
            overlays::render_notification(frame, message);
        }
    }
}
