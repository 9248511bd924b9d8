//! Main application model with state management
//!
//! All mutation happens through these methods while the controller holds the
//! model lock; network calls never run under that lock.

use std::collections::HashMap;

use super::types::{Dialog, LoadCounter, Playlist, PlaylistEntry, Song, UiState};

/// Transient state of the song picker
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    pub search_string: String,
    pub results: Vec<Song>,
    pub fetching: LoadCounter,
}

/// Main application model containing all state
#[derive(Debug, Default)]
pub struct AppModel {
    pub ui_state: UiState,
    playlist_ids: Vec<String>,
    pub fetching_playlist_ids: LoadCounter,
    selected_id: Option<String>,
    playlists: HashMap<String, Playlist>,
    pub fetching_playlist: LoadCounter,
    /// Sequence number of the most recently issued fetch per playlist id
    latest_request: HashMap<String, u64>,
    next_request: u64,
    pub search: SearchState,
    /// Request form fields
    pub request: Song,
    pub new_playlist_id: String,
    should_quit: bool,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Playlist ids & selection
    // ========================================================================

    pub fn playlist_ids(&self) -> &[String] {
        &self.playlist_ids
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Replace the id list. A selection that is no longer listed is dropped.
    pub fn set_playlist_ids(&mut self, ids: Vec<String>) {
        self.playlist_ids = ids;

        let vanished = self
            .selected_id
            .as_ref()
            .is_some_and(|selected| !self.playlist_ids.contains(selected));
        if vanished {
            let dropped = self.selected_id.take();
            tracing::debug!(playlist_id = ?dropped, "Selected playlist vanished from id list");
        }

        let len = self.playlist_ids.len();
        let ui = &mut self.ui_state;
        ui.playlist_cursor = ui.playlist_cursor.min(len.saturating_sub(1));
    }

    /// Select a listed playlist. Returns true when the selection changed.
    pub fn select_playlist(&mut self, playlist_id: &str) -> bool {
        let Some(index) = self.playlist_ids.iter().position(|id| id == playlist_id) else {
            tracing::warn!(playlist_id, "Ignoring selection of unknown playlist");
            return false;
        };

        self.ui_state.playlist_cursor = index;
        if self.selected_id.as_deref() == Some(playlist_id) {
            return false;
        }

        self.selected_id = Some(playlist_id.to_string());
        self.ui_state.entry_cursor = 0;
        true
    }

    pub fn playlist_under_cursor(&self) -> Option<String> {
        self.playlist_ids.get(self.ui_state.playlist_cursor).cloned()
    }

    // ========================================================================
    // Playlist cache
    // ========================================================================

    /// Record that a fetch for `playlist_id` is being issued
    pub fn issue_playlist_request(&mut self, playlist_id: &str) -> u64 {
        self.next_request += 1;
        self.latest_request
            .insert(playlist_id.to_string(), self.next_request);
        self.next_request
    }

    /// Overwrite the cache slot unless a newer fetch for the same id was issued
    /// after this one. Returns whether the entries were stored.
    pub fn store_playlist(&mut self, playlist_id: &str, request: u64, entries: Playlist) -> bool {
        let latest = self.latest_request.get(playlist_id).copied().unwrap_or(0);
        if request < latest {
            tracing::debug!(playlist_id, request, latest, "Discarding stale playlist response");
            return false;
        }

        self.playlists.insert(playlist_id.to_string(), entries);
        if self.selected_id.as_deref() == Some(playlist_id) {
            let len = self.playlists[playlist_id].len();
            self.ui_state.entry_cursor = self.ui_state.entry_cursor.min(len.saturating_sub(1));
        }
        true
    }

    #[cfg(test)]
    pub fn cached_playlist(&self, playlist_id: &str) -> Option<&Playlist> {
        self.playlists.get(playlist_id)
    }

    /// Entries of the selected playlist, if it has been fetched
    pub fn selected_playlist(&self) -> Option<&Playlist> {
        self.selected_id
            .as_deref()
            .and_then(|id| self.playlists.get(id))
    }

    pub fn entry_under_cursor(&self) -> Option<&PlaylistEntry> {
        self.selected_playlist()
            .and_then(|entries| entries.get(self.ui_state.entry_cursor))
    }

    // ========================================================================
    // Search & request form
    // ========================================================================

    pub fn set_search_string(&mut self, text: String) {
        self.search.search_string = text;
        self.ui_state.result_cursor = 0;
    }

    /// Store results for `term` unless the search text has moved on since
    pub fn set_search_results(&mut self, term: &str, results: Vec<Song>) -> bool {
        if self.search.search_string != term {
            tracing::debug!(term, current = %self.search.search_string, "Discarding outdated search results");
            return false;
        }
        self.search.results = results;
        self.ui_state.result_cursor = 0;
        true
    }

    pub fn clear_search_results(&mut self) {
        self.search.results.clear();
        self.ui_state.result_cursor = 0;
    }

    /// Copy the highlighted search result into the request form
    pub fn pick_search_result(&mut self) -> Option<Song> {
        let song = self.search.results.get(self.ui_state.result_cursor)?.clone();
        self.request = song.clone();
        Some(song)
    }

    // ========================================================================
    // Cursors
    // ========================================================================

    pub fn move_playlist_cursor(&mut self, down: bool) {
        let len = self.playlist_ids.len();
        step(&mut self.ui_state.playlist_cursor, len, down);
    }

    pub fn move_entry_cursor(&mut self, down: bool) {
        let len = self.selected_playlist().map_or(0, Vec::len);
        step(&mut self.ui_state.entry_cursor, len, down);
    }

    pub fn move_result_cursor(&mut self, down: bool) {
        let len = self.search.results.len();
        step(&mut self.ui_state.result_cursor, len, down);
    }

    // ========================================================================
    // Dialogs, notifications, lifecycle
    // ========================================================================

    pub fn open_dialog(&mut self, dialog: Dialog) {
        self.ui_state.dialog = dialog;
    }

    pub fn close_dialog(&mut self) {
        self.ui_state.dialog = Dialog::None;
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Queued notification");
        self.ui_state.notifications.push_back(message);
    }

    pub fn current_notification(&self) -> Option<&str> {
        self.ui_state.notifications.front().map(String::as_str)
    }

    pub fn dismiss_notification(&mut self) {
        self.ui_state.notifications.pop_front();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }
}

fn step(cursor: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *cursor = 0;
    } else if down {
        *cursor = (*cursor + 1).min(len - 1);
    } else {
        *cursor = cursor.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> PlaylistEntry {
        PlaylistEntry {
            title: title.to_string(),
            artist: "Artist".to_string(),
            ..PlaylistEntry::default()
        }
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selection_must_be_listed() {
        let mut model = AppModel::new();
        model.set_playlist_ids(ids(&["pop", "rock"]));

        assert!(!model.select_playlist("jazz"));
        assert_eq!(model.selected_id(), None);

        assert!(model.select_playlist("rock"));
        assert_eq!(model.selected_id(), Some("rock"));
        assert_eq!(model.ui_state.playlist_cursor, 1);

        // Re-selecting is not a change
        assert!(!model.select_playlist("rock"));
    }

    #[test]
    fn test_selection_dropped_when_id_disappears() {
        let mut model = AppModel::new();
        model.set_playlist_ids(ids(&["pop", "rock"]));
        model.select_playlist("rock");

        model.set_playlist_ids(ids(&["pop"]));
        assert_eq!(model.selected_id(), None);
        assert_eq!(model.ui_state.playlist_cursor, 0);
    }

    #[test]
    fn test_cache_slots_are_independent() {
        let mut model = AppModel::new();
        let a = model.issue_playlist_request("a");
        let b = model.issue_playlist_request("b");

        assert!(model.store_playlist("b", b, vec![entry("B1")]));
        assert!(model.store_playlist("a", a, vec![entry("A1"), entry("A2")]));

        assert_eq!(model.cached_playlist("a").unwrap().len(), 2);
        assert_eq!(model.cached_playlist("b").unwrap()[0].title, "B1");
    }

    #[test]
    fn test_stale_response_for_same_id_is_discarded() {
        let mut model = AppModel::new();
        let first = model.issue_playlist_request("pop");
        let second = model.issue_playlist_request("pop");

        assert!(model.store_playlist("pop", second, vec![entry("new")]));
        assert!(!model.store_playlist("pop", first, vec![entry("old")]));
        assert_eq!(model.cached_playlist("pop").unwrap()[0].title, "new");
    }

    #[test]
    fn test_cache_overwrite_is_wholesale() {
        let mut model = AppModel::new();
        let first = model.issue_playlist_request("pop");
        model.store_playlist("pop", first, vec![entry("one"), entry("two")]);
        let second = model.issue_playlist_request("pop");
        model.store_playlist("pop", second, vec![entry("three")]);

        let titles: Vec<_> = model
            .cached_playlist("pop")
            .unwrap()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["three"]);
    }

    #[test]
    fn test_outdated_search_results_are_ignored() {
        let mut model = AppModel::new();
        model.set_search_string("tay".to_string());

        assert!(!model.set_search_results("ta", vec![Song::new("x", "y")]));
        assert!(model.search.results.is_empty());

        assert!(model.set_search_results("tay", vec![Song::new("Love Story", "Taylor Swift")]));
        assert_eq!(model.search.results.len(), 1);
    }

    #[test]
    fn test_pick_search_result_fills_form() {
        let mut model = AppModel::new();
        model.set_search_string("tay".to_string());
        model.set_search_results(
            "tay",
            vec![Song::new("Love Story", "Taylor Swift"), Song::new("22", "Taylor Swift")],
        );
        model.move_result_cursor(true);

        let picked = model.pick_search_result().unwrap();
        assert_eq!(picked.title, "22");
        assert_eq!(model.request, Song::new("22", "Taylor Swift"));
    }

    #[test]
    fn test_notifications_queue_in_order() {
        let mut model = AppModel::new();
        model.notify("first");
        model.notify("second");
        assert_eq!(model.current_notification(), Some("first"));
        model.dismiss_notification();
        assert_eq!(model.current_notification(), Some("second"));
        model.dismiss_notification();
        assert_eq!(model.current_notification(), None);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut model = AppModel::new();
        model.move_playlist_cursor(true);
        assert_eq!(model.ui_state.playlist_cursor, 0);

        model.set_playlist_ids(ids(&["a", "b"]));
        model.move_playlist_cursor(true);
        model.move_playlist_cursor(true);
        assert_eq!(model.ui_state.playlist_cursor, 1);
        model.move_playlist_cursor(false);
        model.move_playlist_cursor(false);
        assert_eq!(model.ui_state.playlist_cursor, 0);
    }
}
