use std::future::Future;

use log::debug;
use tokio_util::sync::CancellationToken;

/// Lifetime of one mounted view. Continuations run through [`TaskScope::run`] are
/// dropped unfinished once the scope is torn down, so a completion that arrives after
/// teardown never reaches the store.
#[derive(Debug, Clone, Default)]
pub struct TaskScope {
    token: CancellationToken,
}

impl TaskScope {
    pub fn new() -> Self {
        TaskScope::default()
    }

    /// Drives `fut` to completion unless the scope is torn down first.
    /// Returns `None` when it was cancelled or never started.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.token.is_cancelled() {
            debug!("Scope already torn down, not starting task");
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("Task dropped on teardown");
                None
            }
            out = fut => Some(out),
        }
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
#[path = "tests/tasks.rs"]
mod tests;
