//! Core type definitions for the application

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A song candidate, either from search results or typed in by the user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Case-insensitive identity used for de-duplication
    pub fn dedup_key(&self) -> String {
        format!("{}|{}", self.artist.to_lowercase(), self.title.to_lowercase())
    }
}

/// Moderation state of a submitted request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl EntryStatus {
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Other(raw.to_string()),
        }
    }
}

/// A song request as recorded by the backend
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistEntry {
    pub title: String,
    pub artist: String,
    pub submitted_on: String,
    pub submitted_by: String,
    pub status: String,
    pub notes: String,
}

impl PlaylistEntry {
    pub fn status_kind(&self) -> EntryStatus {
        EntryStatus::classify(&self.status)
    }
}

pub type Playlist = Vec<PlaylistEntry>;

/// In-flight counter for a resource that may be fetched by several tasks at once
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadCounter(u32);

impl LoadCounter {
    pub fn begin(&mut self) {
        self.0 += 1;
    }

    pub fn end(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn is_busy(&self) -> bool {
        self.0 > 0
    }

    #[cfg(test)]
    pub fn count(&self) -> u32 {
        self.0
    }
}

/// Which pane of the main screen has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    Playlists,
    Entries,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Playlists => ActiveSection::Entries,
            ActiveSection::Entries => ActiveSection::Playlists,
        }
    }
}

/// Field of the request dialog that receives typed characters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RequestField {
    #[default]
    Title,
    Artist,
    Search,
    Results,
}

impl RequestField {
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Artist,
            Self::Artist => Self::Search,
            Self::Search => Self::Results,
            Self::Results => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Results,
            Self::Artist => Self::Title,
            Self::Search => Self::Artist,
            Self::Results => Self::Search,
        }
    }
}

/// Modal dialog currently open, if any
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    None,
    NewPlaylist,
    RequestSong(RequestField),
    Help,
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub active_section: ActiveSection,
    /// Highlighted row in the playlist sidebar (not necessarily the selection)
    pub playlist_cursor: usize,
    pub entry_cursor: usize,
    pub result_cursor: usize,
    pub dialog: Dialog,
    /// Blocking notifications, oldest first
    pub notifications: VecDeque<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification_is_case_insensitive() {
        assert_eq!(EntryStatus::classify("Pending"), EntryStatus::Pending);
        assert_eq!(EntryStatus::classify("  APPROVED "), EntryStatus::Approved);
        assert_eq!(EntryStatus::classify("rejected"), EntryStatus::Rejected);
        assert_eq!(
            EntryStatus::classify("On hold"),
            EntryStatus::Other("On hold".to_string())
        );
    }

    #[test]
    fn test_entry_deserializes_with_missing_fields() {
        let entry: PlaylistEntry = serde_json::from_str(
            r#"{"title":"Shake It Off","artist":"Taylor Swift","submittedBy":"a@b.org","status":"pending"}"#,
        )
        .unwrap();
        assert_eq!(entry.title, "Shake It Off");
        assert_eq!(entry.submitted_by, "a@b.org");
        assert_eq!(entry.submitted_on, "");
        assert_eq!(entry.notes, "");
        assert_eq!(entry.status_kind(), EntryStatus::Pending);
    }

    #[test]
    fn test_load_counter_never_underflows() {
        let mut counter = LoadCounter::default();
        counter.begin();
        counter.begin();
        counter.end();
        assert!(counter.is_busy());
        counter.end();
        counter.end();
        assert!(!counter.is_busy());
        assert_eq!(counter.count(), 0);
    }
}
