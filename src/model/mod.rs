//! Model module - Application state and data types
//!
//! - `types`: Songs, playlist entries, counters and UI state
//! - `error`: Gateway error taxonomy
//! - `envelope`: Backend request/response envelope
//! - `gateway_client`: Backend and song search client
//! - `app_model`: Main application model with state management methods

mod types;
mod error;
mod envelope;
mod gateway_client;
mod app_model;

pub use types::{ActiveSection, Dialog, EntryStatus, Playlist, PlaylistEntry, RequestField, Song};

pub use error::GatewayError;

pub use gateway_client::{GatewayClient, RequestsGateway};

pub use app_model::AppModel;
