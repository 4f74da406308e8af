use postlab_core::{CoreResult, Dispatcher};
use postlab_store::{SqlStore, StoreTx};
use std::sync::Arc;

/// Sequences validation, persistence and dispatch for every entity operation.
///
/// Built once at process start from a store handle and a dispatcher and
/// shared between request handlers. Holds no mutable state of its own.
#[derive(Clone)]
pub struct Orchestrator {
    pub(crate) store: SqlStore,
    pub(crate) dispatcher: Arc<dyn Dispatcher>,
}

impl Orchestrator {
    pub fn new(store: SqlStore, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &SqlStore {
        &self.store
    }
}

/// Commit on success, roll back on failure; the operation's error wins over a rollback error.
pub(crate) async fn finish<T>(tx: StoreTx, result: CoreResult<T>, operation: &'static str) -> CoreResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if err.is_client_error() {
                tracing::debug!(operation, error = %err, "rolling back");
            } else {
                tracing::warn!(operation, error = %err, "rolling back");
            }
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(operation, error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").field("store", &self.store).finish_non_exhaustive()
    }
}
