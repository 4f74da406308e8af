//! Row to record mapping shared by the store and its transactions.

use crate::error::{StoreError, StoreResult};
use postlab_core::{BodyType, Collection, HttpMethod, Param, RequestRecord, ResponseRecord};
use serde_json::Value as JsonValue;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::Row;

pub(crate) const REQUEST_COLUMNS: &str = "id, url, method, body, bodytype, collection_id";
pub(crate) const PARAM_COLUMNS: &str = "id, key, value, request_id";
pub(crate) const RESPONSE_COLUMNS: &str = "id, request_id, body, status_code";

pub(crate) fn collection_from_row(row: &SqliteRow) -> StoreResult<Collection> {
    Ok(Collection { id: row.try_get("id")?, name: row.try_get("name")? })
}

pub(crate) fn request_from_row(row: &SqliteRow) -> StoreResult<RequestRecord> {
    let method: String = row.try_get("method")?;
    let method = method
        .parse::<HttpMethod>()
        .map_err(|e| StoreError::InvalidData(e.to_string()))?;

    let bodytype: Option<String> = row.try_get("bodytype")?;
    let bodytype = bodytype
        .map(|s| s.parse::<BodyType>())
        .transpose()
        .map_err(|e| StoreError::InvalidData(e.to_string()))?;

    let body: Option<Json<JsonValue>> = row.try_get("body")?;

    Ok(RequestRecord {
        id: row.try_get("id")?,
        url: row.try_get("url")?,
        method,
        body: body.map(|Json(v)| v),
        bodytype,
        collection_id: row.try_get("collection_id")?,
    })
}

pub(crate) fn param_from_row(row: &SqliteRow) -> StoreResult<Param> {
    Ok(Param {
        id: row.try_get("id")?,
        key: row.try_get("key")?,
        value: row.try_get("value")?,
        request_id: row.try_get("request_id")?,
    })
}

pub(crate) fn response_from_row(row: &SqliteRow) -> StoreResult<ResponseRecord> {
    let Json(body): Json<JsonValue> = row.try_get("body")?;
    Ok(ResponseRecord {
        id: row.try_get("id")?,
        request_id: row.try_get("request_id")?,
        body,
        status_code: row.try_get("status_code")?,
    })
}
