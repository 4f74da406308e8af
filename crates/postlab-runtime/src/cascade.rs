//! Cascading deletes. Children go first, inside one transaction, and the
//! parent's existence is checked before anything is removed.

use crate::orchestrator::{finish, Orchestrator};
use postlab_core::{CascadeSummary, CoreError, CoreResult, Entity};
use postlab_store::StoreTx;

impl Orchestrator {
    /// Delete a request with its responses and params.
    pub async fn delete_request(&self, id: i64) -> CoreResult<CascadeSummary> {
        let mut tx = self.store.begin().await?;
        let result = cascade_request(&mut tx, id).await;
        let summary = finish(tx, result, "delete_request").await?;
        tracing::info!(request_id = id, ?summary, "request deleted");
        Ok(summary)
    }

    /// Delete a collection with every request under it and their children.
    pub async fn delete_collection(&self, id: i64) -> CoreResult<CascadeSummary> {
        let mut tx = self.store.begin().await?;
        let result = cascade_collection(&mut tx, id).await;
        let summary = finish(tx, result, "delete_collection").await?;
        tracing::info!(collection_id = id, ?summary, "collection deleted");
        Ok(summary)
    }
}

async fn cascade_request(tx: &mut StoreTx, id: i64) -> CoreResult<CascadeSummary> {
    if !tx.request_exists(id).await? {
        return Err(CoreError::not_found(Entity::Request, id));
    }

    let ids = [id];
    let responses = tx.delete_responses_for_requests(&ids).await?;
    let params = tx.delete_params_for_requests(&ids).await?;
    let requests = tx.delete_request(id).await?;
    if requests == 0 {
        return Err(CoreError::not_found(Entity::Request, id));
    }

    Ok(CascadeSummary { collections: 0, requests, params, responses })
}

async fn cascade_collection(tx: &mut StoreTx, id: i64) -> CoreResult<CascadeSummary> {
    if !tx.collection_exists(id).await? {
        return Err(CoreError::not_found(Entity::Collection, id));
    }

    let mut summary = CascadeSummary::default();
    let request_ids = tx.request_ids_in_collection(id).await?;
    if !request_ids.is_empty() {
        summary.responses = tx.delete_responses_for_requests(&request_ids).await?;
        summary.params = tx.delete_params_for_requests(&request_ids).await?;
        summary.requests = tx.delete_requests_in_collection(id).await?;
    }

    summary.collections = tx.delete_collection(id).await?;
    if summary.collections == 0 {
        return Err(CoreError::not_found(Entity::Collection, id));
    }
    Ok(summary)
}
