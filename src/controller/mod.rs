//! Controller module - Application logic and event handling
//!
//! This module reacts to user actions by calling the gateway and merging the
//! results back into the model. It is organized into submodules by
//! responsibility:
//!
//! - `input`: Key event handling
//! - `playlists`: Playlist ids, selection, refresh and song requests
//! - `search`: Debounced song search

mod input;
mod playlists;
mod search;


use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::auth::Session;
use crate::model::{AppModel, GatewayError, RequestsGateway};
use crate::util::task::TaskManager;

/// Quiet period before a typed search term is sent to the provider
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    gateway: Arc<dyn RequestsGateway>,
    session: Session,
    tasks: Arc<Mutex<TaskManager>>,
    search_delay: Duration,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        gateway: Arc<dyn RequestsGateway>,
        session: Session,
    ) -> Self {
        Self {
            model,
            gateway,
            session,
            tasks: Arc::new(Mutex::new(TaskManager::new())),
            search_delay: SEARCH_DEBOUNCE,
        }
    }

    /// Run an operation in the background so the UI loop keeps drawing
    pub(crate) fn spawn_action<F, Fut>(&self, action: F)
    where
        F: FnOnce(AppController) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(action(self.clone()));
    }

    pub(crate) fn format_error(error: &GatewayError) -> String {
        format!("Error: {error}")
    }

    pub async fn shutdown(&self) {
        self.tasks.lock().await.abort_all();
    }
}
