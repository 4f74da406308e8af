//! REST API DTOs

use postlab_core::{CascadeSummary, Collection, Param};
use serde::{Deserialize, Serialize};

/// Response envelope wrapper
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    pub data: T,
    pub metadata: ResponseMeta,
}

impl<T> ResponseEnvelope<T> {
    pub fn ok(data: T, request_id: String) -> Self {
        Self { success: true, data, metadata: ResponseMeta::new(request_id) }
    }
}

/// Response metadata
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ResponseMeta {
    pub fn new(request_id: String) -> Self {
        Self { request_id, execution_time_ms: None }
    }
}

/// POST /collections
#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
}

/// PATCH /collections/:id
#[derive(Debug, Deserialize)]
pub struct RenameCollectionRequest {
    #[serde(default)]
    pub new_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CollectionView {
    pub collection_id: i64,
    pub name: String,
}

impl From<Collection> for CollectionView {
    fn from(c: Collection) -> Self {
        Self { collection_id: c.id, name: c.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct ParamsQuery {
    pub request_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ParamView {
    pub id: i64,
    pub key: String,
    pub value: String,
}

impl From<Param> for ParamView {
    fn from(p: Param) -> Self {
        Self { id: p.id, key: p.key, value: p.value }
    }
}

/// GET /params?request_id=
#[derive(Debug, Serialize)]
pub struct ParamsListing {
    pub request_id: i64,
    pub params: Vec<ParamView>,
}

/// Result of a cascading delete
#[derive(Debug, Serialize)]
pub struct DeletedView {
    pub id: i64,
    pub deleted: CascadeSummary,
}
