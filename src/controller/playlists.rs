//! Playlist ids, selection, refresh and song requests

use crate::model::{GatewayError, Playlist, Song};

use super::AppController;

const MISSING_TITLE_WARNING: &str = "Song request must include a title";

impl AppController {
    /// Initial load after sign-in: fetch the ids and select the first one.
    ///
    /// A failure leaves the list empty and is only logged.
    pub async fn load_playlist_ids(&self) {
        self.model.lock().await.fetching_playlist_ids.begin();

        let result = self.gateway.get_playlist_ids(&self.session).await;

        let first = {
            let mut model = self.model.lock().await;
            model.fetching_playlist_ids.end();
            match result {
                Ok(ids) => {
                    tracing::info!(count = ids.len(), "Playlist ids loaded");
                    let first = ids.first().cloned();
                    model.set_playlist_ids(ids);
                    first
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load playlist ids");
                    None
                }
            }
        };

        if let Some(first) = first {
            self.select_playlist(&first).await;
        }
    }

    /// Change the selection and fetch the newly selected playlist
    pub async fn select_playlist(&self, playlist_id: &str) {
        let changed = self.model.lock().await.select_playlist(playlist_id);
        if changed {
            tracing::debug!(playlist_id, "Playlist selected");
            self.fetch_playlist(playlist_id).await;
        }
    }

    pub async fn refresh_selected(&self) {
        let selected = self.model.lock().await.selected_id().map(str::to_string);
        if let Some(playlist_id) = selected {
            self.fetch_playlist(&playlist_id).await;
        }
    }

    /// Fetch one playlist and overwrite its cache slot
    pub async fn fetch_playlist(&self, playlist_id: &str) {
        let request = {
            let mut model = self.model.lock().await;
            model.fetching_playlist.begin();
            model.issue_playlist_request(playlist_id)
        };

        let result = self.gateway.get_playlist(&self.session, playlist_id).await;

        let mut model = self.model.lock().await;
        match result {
            Ok(entries) => {
                let count = entries.len();
                if model.store_playlist(playlist_id, request, entries) {
                    tracing::info!(playlist_id, count, "Playlist loaded");
                }
            }
            Err(e) => {
                tracing::error!(playlist_id, error = %e, "Failed to load playlist");
                model.notify(Self::format_error(&e));
            }
        }
        model.fetching_playlist.end();
    }

    /// Create the playlist named in the form, reload the ids and select it
    pub async fn create_playlist(&self) {
        let playlist_id = {
            let mut model = self.model.lock().await;
            model.fetching_playlist_ids.begin();
            model.new_playlist_id.trim().to_string()
        };

        let result = self.create_and_reload_ids(&playlist_id).await;

        let created = {
            let mut model = self.model.lock().await;
            model.fetching_playlist_ids.end();
            match result {
                Ok(ids) => {
                    tracing::info!(playlist_id, "Playlist created");
                    model.set_playlist_ids(ids);
                    model.new_playlist_id.clear();
                    true
                }
                Err(e) => {
                    tracing::error!(playlist_id, error = %e, "Failed to create playlist");
                    model.notify(Self::format_error(&e));
                    false
                }
            }
        };

        if created {
            self.select_playlist(&playlist_id).await;
        }
    }

    async fn create_and_reload_ids(&self, playlist_id: &str) -> Result<Vec<String>, GatewayError> {
        self.gateway.new_playlist(&self.session, playlist_id).await?;
        self.gateway.get_playlist_ids(&self.session).await
    }

    /// Submit the request form to the selected playlist, then reload it.
    ///
    /// A blank title only warns; the request is still sent.
    pub async fn submit_song_request(&self) {
        let (playlist_id, song) = {
            let mut model = self.model.lock().await;
            let Some(playlist_id) = model.selected_id().map(str::to_string) else {
                return;
            };
            let song = model.request.clone();
            if song.title.trim().is_empty() {
                model.notify(MISSING_TITLE_WARNING);
            }
            model.fetching_playlist.begin();
            (playlist_id, song)
        };

        let result = self.submit_and_reload(&playlist_id, &song).await;

        let mut model = self.model.lock().await;
        match result {
            Ok((request, entries)) => {
                tracing::info!(playlist_id, title = %song.title, artist = %song.artist, "Song request submitted");
                model.store_playlist(&playlist_id, request, entries);
            }
            Err(e) => {
                tracing::error!(playlist_id, error = %e, "Failed to submit song request");
                model.notify(Self::format_error(&e));
            }
        }
        model.fetching_playlist.end();
    }

    async fn submit_and_reload(
        &self,
        playlist_id: &str,
        song: &Song,
    ) -> Result<(u64, Playlist), GatewayError> {
        self.gateway
            .add_song_request(&self.session, playlist_id, &song.artist, &song.title)
            .await?;

        let request = self.model.lock().await.issue_playlist_request(playlist_id);
        let entries = self.gateway.get_playlist(&self.session, playlist_id).await?;
        Ok((request, entries))
    }
}
