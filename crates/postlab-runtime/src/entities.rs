//! Entity reads, creates, partial updates and single-row deletes.

use crate::orchestrator::{finish, Orchestrator};
use postlab_core::{
    Collection, CoreError, CoreResult, Entity, NewParam, NewResponse, Param, ParamUpdate,
    RequestRecord, ResponseRecord, ResponseUpdate, ValidationError,
};
use postlab_store::StoreTx;

impl Orchestrator {
    // ---- collections ----

    pub async fn create_collection(&self, name: &str) -> CoreResult<Collection> {
        let id = self.store.insert_collection(name).await?;
        tracing::info!(collection_id = id, "collection created");
        Ok(Collection { id, name: name.to_string() })
    }

    /// Fails with `NotFound` when there are no collections at all.
    pub async fn list_collections(&self) -> CoreResult<Vec<Collection>> {
        let collections = self.store.list_collections().await?;
        if collections.is_empty() {
            return Err(CoreError::NotFound("No collections found".to_string()));
        }
        Ok(collections)
    }

    pub async fn get_collection(&self, id: i64) -> CoreResult<Collection> {
        self.store
            .get_collection(id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::Collection, id))
    }

    pub async fn list_collection_requests(&self, id: i64) -> CoreResult<Vec<RequestRecord>> {
        self.get_collection(id).await?;
        let requests = self.store.list_requests_by_collection(id).await?;
        if requests.is_empty() {
            return Err(CoreError::NotFound(format!("No requests found in collection {}", id)));
        }
        Ok(requests)
    }

    pub async fn update_collection_name(
        &self,
        id: i64,
        new_name: Option<String>,
    ) -> CoreResult<Collection> {
        let name = new_name.ok_or(ValidationError::EmptyUpdate)?;
        if !self.store.rename_collection(id, &name).await? {
            return Err(CoreError::not_found(Entity::Collection, id));
        }
        tracing::info!(collection_id = id, "collection renamed");
        Ok(Collection { id, name })
    }

    // ---- requests ----

    pub async fn get_request(&self, id: i64) -> CoreResult<RequestRecord> {
        self.store
            .get_request(id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::Request, id))
    }

    // ---- params ----

    pub async fn add_param(&self, param: NewParam) -> CoreResult<Param> {
        let mut tx = self.store.begin().await?;
        let result = insert_param_checked(&mut tx, &param).await;
        let id = finish(tx, result, "add_param").await?;

        Ok(Param { id, key: param.key, value: param.value, request_id: param.request_id })
    }

    /// Params of one request; `NotFound` when the request is unknown or has none.
    pub async fn list_params(&self, request_id: i64) -> CoreResult<Vec<Param>> {
        if !self.store.request_exists(request_id).await? {
            return Err(CoreError::not_found(Entity::Request, request_id));
        }
        let params = self.store.list_params(request_id).await?;
        if params.is_empty() {
            return Err(CoreError::NotFound(format!("No params found for request {}", request_id)));
        }
        Ok(params)
    }

    pub async fn update_param(&self, id: i64, update: ParamUpdate) -> CoreResult<Param> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if !self.store.update_param(id, &update).await? {
            return Err(CoreError::not_found(Entity::Param, id));
        }
        self.store
            .get_param(id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::Param, id))
    }

    pub async fn delete_param(&self, id: i64) -> CoreResult<()> {
        if !self.store.delete_param(id).await? {
            return Err(CoreError::not_found(Entity::Param, id));
        }
        Ok(())
    }

    // ---- responses ----

    pub async fn save_response(&self, response: NewResponse) -> CoreResult<ResponseRecord> {
        let mut tx = self.store.begin().await?;
        let result = insert_response_checked(&mut tx, &response).await;
        let id = finish(tx, result, "save_response").await?;

        Ok(ResponseRecord {
            id,
            request_id: response.request_id,
            body: response.body,
            status_code: response.status_code,
        })
    }

    pub async fn get_response(&self, id: i64) -> CoreResult<ResponseRecord> {
        self.store
            .get_response(id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::Response, id))
    }

    pub async fn update_response(&self, id: i64, update: ResponseUpdate) -> CoreResult<ResponseRecord> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if !self.store.update_response(id, &update).await? {
            return Err(CoreError::not_found(Entity::Response, id));
        }
        self.get_response(id).await
    }

    pub async fn delete_response(&self, id: i64) -> CoreResult<()> {
        if !self.store.delete_response(id).await? {
            return Err(CoreError::not_found(Entity::Response, id));
        }
        Ok(())
    }
}

async fn insert_param_checked(tx: &mut StoreTx, param: &NewParam) -> CoreResult<i64> {
    if !tx.request_exists(param.request_id).await? {
        return Err(CoreError::not_found(Entity::Request, param.request_id));
    }
    Ok(tx.insert_param(param.request_id, &param.key, &param.value).await?)
}

async fn insert_response_checked(tx: &mut StoreTx, response: &NewResponse) -> CoreResult<i64> {
    if !tx.request_exists(response.request_id).await? {
        return Err(CoreError::not_found(Entity::Request, response.request_id));
    }
    Ok(tx.insert_response(response.request_id, &response.body, response.status_code).await?)
}
