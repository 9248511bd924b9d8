//! Debounced song search

use super::AppController;

const SEARCH_TASK: &str = "search";

impl AppController {
    /// React to a change of the search box.
    ///
    /// Empty text clears the results at once. Anything else replaces the
    /// pending search and fires after the debounce delay.
    pub async fn update_search(&self, text: String) {
        {
            let mut model = self.model.lock().await;
            model.set_search_string(text.clone());
            if text.is_empty() {
                model.clear_search_results();
            }
        }

        let mut tasks = self.tasks.lock().await;
        if text.is_empty() {
            tasks.abort(SEARCH_TASK);
            return;
        }

        let controller = self.clone();
        tasks.spawn_delayed(SEARCH_TASK, self.search_delay, async move {
            controller.run_search(text).await;
        });
    }

    async fn run_search(&self, term: String) {
        self.model.lock().await.search.fetching.begin();

        let result = self.gateway.search_songs(&term).await;

        let mut model = self.model.lock().await;
        match result {
            Ok(songs) => {
                model.set_search_results(&term, songs);
            }
            Err(e) => {
                tracing::error!(term, error = %e, "Song search failed");
                model.notify(Self::format_error(&e));
            }
        }
        model.search.fetching.end();
    }
}
