//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::MutexGuard;

use crate::model::{ActiveSection, AppModel, Dialog, RequestField};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let mut model = self.model.lock().await;

        // Notifications block all other interactions
        if model.current_notification().is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.dismiss_notification();
            }
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            model.set_should_quit(true);
            return Ok(());
        }

        let dialog = model.ui_state.dialog;
        match dialog {
            Dialog::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                    model.close_dialog();
                }
                Ok(())
            }
            Dialog::NewPlaylist => {
                self.handle_new_playlist_key(model, key);
                Ok(())
            }
            Dialog::RequestSong(field) => {
                self.handle_request_key(model, field, key).await;
                Ok(())
            }
            Dialog::None => {
                self.handle_main_key(model, key);
                Ok(())
            }
        }
    }

    fn handle_main_key(&self, mut model: MutexGuard<'_, AppModel>, key: KeyEvent) {
        let section = model.ui_state.active_section;

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                model.ui_state.active_section = section.next();
            }
            KeyCode::Up | KeyCode::Down => {
                let down = key.code == KeyCode::Down;
                match section {
                    ActiveSection::Playlists => model.move_playlist_cursor(down),
                    ActiveSection::Entries => model.move_entry_cursor(down),
                }
            }
            KeyCode::Enter if section == ActiveSection::Playlists => {
                if let Some(playlist_id) = model.playlist_under_cursor() {
                    model.ui_state.active_section = ActiveSection::Entries;
                    drop(model);
                    self.spawn_action(|controller| async move {
                        controller.select_playlist(&playlist_id).await;
                    });
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.spawn_action(|controller| async move {
                    controller.refresh_selected().await;
                });
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                model.new_playlist_id.clear();
                model.open_dialog(Dialog::NewPlaylist);
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                if model.selected_id().is_some() {
                    model.open_dialog(Dialog::RequestSong(RequestField::Title));
                }
            }
            KeyCode::Char('h') | KeyCode::Char('?') => {
                model.open_dialog(Dialog::Help);
            }
            _ => {}
        }
    }

    fn handle_new_playlist_key(&self, mut model: MutexGuard<'_, AppModel>, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => model.close_dialog(),
            KeyCode::Enter => {
                model.close_dialog();
                drop(model);
                self.spawn_action(|controller| async move {
                    controller.create_playlist().await;
                });
            }
            KeyCode::Backspace => {
                model.new_playlist_id.pop();
            }
            KeyCode::Char(c) => model.new_playlist_id.push(c),
            _ => {}
        }
    }

    async fn handle_request_key(
        &self,
        mut model: MutexGuard<'_, AppModel>,
        field: RequestField,
        key: KeyEvent,
    ) {
        match key.code {
            KeyCode::Esc => model.close_dialog(),
            KeyCode::Tab => model.open_dialog(Dialog::RequestSong(field.next())),
            KeyCode::BackTab => model.open_dialog(Dialog::RequestSong(field.prev())),
            KeyCode::Up | KeyCode::Down if field == RequestField::Results => {
                model.move_result_cursor(key.code == KeyCode::Down);
            }
            KeyCode::Enter if field == RequestField::Results => {
                if let Some(song) = model.pick_search_result() {
                    tracing::debug!(title = %song.title, artist = %song.artist, "Search result picked");
                    model.open_dialog(Dialog::RequestSong(RequestField::Title));
                }
            }
            KeyCode::Enter => {
                model.close_dialog();
                drop(model);
                self.spawn_action(|controller| async move {
                    controller.submit_song_request().await;
                });
            }
            KeyCode::Backspace | KeyCode::Char(_) => {
                let edit = |text: &mut String| match key.code {
                    KeyCode::Char(c) => text.push(c),
                    _ => {
                        text.pop();
                    }
                };
                match field {
                    RequestField::Title => edit(&mut model.request.title),
                    RequestField::Artist => edit(&mut model.request.artist),
                    RequestField::Search => {
                        let mut text = model.search.search_string.clone();
                        edit(&mut text);
                        drop(model);
                        self.update_search(text).await;
                    }
                    RequestField::Results => {}
                }
            }
            _ => {}
        }
    }
}
