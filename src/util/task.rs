//! Keyed background tasks where a new task supersedes the previous one

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<&'static str, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `task` under `key`, aborting whatever was running there before
    pub fn spawn(&mut self, key: &'static str, task: JoinHandle<()>) {
        if let Some(previous) = self.tasks.insert(key, task) {
            previous.abort();
        }
    }

    /// Run `task` after `delay` unless superseded or aborted first.
    ///
    /// Only the wait is cancellable: once the delay elapses the task is
    /// detached and runs to completion.
    pub fn spawn_delayed<F>(&mut self, key: &'static str, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });
        self.spawn(key, handle);
    }

    pub fn abort(&mut self, key: &str) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_superseded_delayed_task_never_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut tasks = TaskManager::new();

        for _ in 0..3 {
            let runs = runs.clone();
            tasks.spawn_delayed("search", Duration::from_millis(500), async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_cancels_pending_task() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut tasks = TaskManager::new();

        let counter = runs.clone();
        tasks.spawn_delayed("search", Duration::from_millis(500), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tasks.abort("search");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
