//! The save-and-send pipeline.
//!
//! `Validating -> Dispatching -> PersistingRequest -> PersistingResponse -> Committed`,
//! with `RolledBack` reachable from every phase after validation. Only the
//! persisting phases hold the write transaction.

use crate::orchestrator::Orchestrator;
use postlab_core::validation::{validate_body, validate_body_shape, validate_method, validate_url};
use postlab_core::{
    BodyType, CoreError, CoreResult, DispatchCall, DispatchOutcome, Entity, HttpMethod, NewRequest,
};
use postlab_store::StoreTx;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

/// Caller-supplied request definition, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub collection_id: Option<i64>,
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub body: Option<JsonValue>,
    #[serde(default)]
    pub bodytype: Option<String>,
    /// Inline query parameters, stored as Param rows
    #[serde(default)]
    pub params: Option<BTreeMap<String, String>>,
}

/// Result of a committed save-and-send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub id: i64,
    pub status: u16,
    pub method: HttpMethod,
    pub url: String,
    pub body_type: Option<BodyType>,
    pub collection_id: Option<i64>,
    pub response_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    Validating,
    PersistingRequest,
    Dispatching,
    PersistingResponse,
    Committed,
    RolledBack,
}

impl SavePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavePhase::Validating => "validating",
            SavePhase::PersistingRequest => "persisting_request",
            SavePhase::Dispatching => "dispatching",
            SavePhase::PersistingResponse => "persisting_response",
            SavePhase::Committed => "committed",
            SavePhase::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for SavePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a definition and normalise it for storage.
///
/// GET and DELETE store neither body nor body type; body methods default to `raw`.
pub fn prepare(input: &SaveRequest) -> CoreResult<NewRequest> {
    let method = validate_method(&input.method)?;
    let bodytype = input.bodytype.as_deref().map(str::parse::<BodyType>).transpose()?;
    validate_url(&input.url)?;
    validate_body(method, input.body.as_ref())?;

    let (body, bodytype) = if method.carries_body() {
        let bodytype = bodytype.unwrap_or(BodyType::Raw);
        validate_body_shape(bodytype, input.body.as_ref())?;
        (input.body.clone(), Some(bodytype))
    } else {
        (None, None)
    };

    Ok(NewRequest {
        url: input.url.clone(),
        method,
        body,
        bodytype,
        collection_id: input.collection_id,
    })
}

impl Orchestrator {
    /// Send a request definition and persist it with its params and response, all-or-nothing.
    ///
    /// Nothing is written when the collection is unknown or validation fails.
    /// The remote call runs before the write transaction opens, so a
    /// rate-limited or failed dispatch never touches storage.
    pub async fn save_and_send(&self, input: SaveRequest) -> CoreResult<SaveOutcome> {
        let started = Instant::now();

        if let Some(collection_id) = input.collection_id {
            if self.store.get_collection(collection_id).await?.is_none() {
                return Err(CoreError::not_found(Entity::Collection, collection_id));
            }
        }

        let request = prepare(&input).map_err(|err| {
            tracing::debug!(phase = %SavePhase::Validating, error = %err, "request rejected");
            err
        })?;
        let params = input.params.unwrap_or_default();

        let (status, body) = self
            .send(&request, &params)
            .await
            .map_err(|err| aborted(SavePhase::Dispatching, &request, err))?;

        let mut phase = SavePhase::PersistingRequest;
        let mut tx = self.store.begin().await.map_err(|err| aborted(phase, &request, err.into()))?;

        let outcome = match self.persist(&mut tx, &request, &params, status, &body, &mut phase).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(phase = %phase, error = %rollback_err, "rollback failed");
                }
                return Err(aborted(phase, &request, err));
            }
        };
        tx.commit().await.map_err(|err| aborted(phase, &request, err.into()))?;

        tracing::info!(
            request_id = outcome.id,
            response_id = outcome.response_id,
            status = outcome.status,
            phase = %SavePhase::Committed,
            duration_ms = started.elapsed().as_millis() as u64,
            "request saved and sent"
        );
        Ok(outcome)
    }

    async fn send(
        &self,
        request: &NewRequest,
        params: &BTreeMap<String, String>,
    ) -> CoreResult<(u16, JsonValue)> {
        let call = DispatchCall::for_request(request, params);
        match self.dispatcher.dispatch(&call).await? {
            DispatchOutcome::Completed { status, body } => Ok((status, body)),
            DispatchOutcome::RateLimited => Err(CoreError::RateLimited),
            DispatchOutcome::NetworkError(reason) => Err(CoreError::Dispatch(reason)),
        }
    }

    async fn persist(
        &self,
        tx: &mut StoreTx,
        request: &NewRequest,
        params: &BTreeMap<String, String>,
        status: u16,
        body: &JsonValue,
        phase: &mut SavePhase,
    ) -> CoreResult<SaveOutcome> {
        *phase = SavePhase::PersistingRequest;
        // The collection may have been deleted while the call was in flight
        if let Some(collection_id) = request.collection_id {
            if !tx.collection_exists(collection_id).await? {
                return Err(CoreError::not_found(Entity::Collection, collection_id));
            }
        }
        let request_id = tx.insert_request(request).await?;
        for (key, value) in params {
            tx.insert_param(request_id, key, value).await?;
        }

        *phase = SavePhase::PersistingResponse;
        let response_id = tx.insert_response(request_id, body, Some(i32::from(status))).await?;

        Ok(SaveOutcome {
            id: request_id,
            status,
            method: request.method,
            url: request.url.clone(),
            body_type: request.bodytype,
            collection_id: request.collection_id,
            response_id,
            body: request.body.clone(),
        })
    }
}

fn aborted(phase: SavePhase, request: &NewRequest, err: CoreError) -> CoreError {
    if err.is_client_error() {
        tracing::debug!(phase = %phase, error = %err, "save aborted");
    } else if matches!(err, CoreError::RateLimited | CoreError::Dispatch(_)) {
        tracing::warn!(phase = %phase, error = %err, "save aborted");
    } else {
        tracing::error!(phase = %phase, error = %err, "save aborted");
    }
    tracing::debug!(phase = %SavePhase::RolledBack, url = %request.url, "nothing persisted");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use postlab_core::ValidationError;
    use serde_json::json;

    fn input(method: &str, body: Option<JsonValue>) -> SaveRequest {
        SaveRequest {
            url: "https://api.example.com/items".to_string(),
            method: method.to_string(),
            body,
            ..Default::default()
        }
    }

    #[test]
    fn get_and_delete_store_no_body() {
        for method in ["GET", "DELETE"] {
            let mut definition = input(method, Some(json!({"ignored": true})));
            definition.bodytype = Some("form".to_string());
            let request = prepare(&definition).unwrap();
            assert_eq!(request.body, None);
            assert_eq!(request.bodytype, None);
        }
    }

    #[test]
    fn body_methods_default_to_raw() {
        let request = prepare(&input("PATCH", Some(json!({"qty": 2})))).unwrap();
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.bodytype, Some(BodyType::Raw));
        assert_eq!(request.body, Some(json!({"qty": 2})));
    }

    #[test]
    fn validation_failures_are_reported() {
        assert!(matches!(
            prepare(&input("FETCH", None)),
            Err(CoreError::Validation(ValidationError::UnsupportedMethod(_)))
        ));
        assert!(matches!(
            prepare(&input("POST", Some(json!({})))),
            Err(CoreError::Validation(ValidationError::MissingBody(HttpMethod::Post)))
        ));

        let mut form = input("POST", Some(json!(["a"])));
        form.bodytype = Some("form".to_string());
        assert!(matches!(
            prepare(&form),
            Err(CoreError::Validation(ValidationError::FormBodyNotObject))
        ));

        let mut xml = input("POST", Some(json!({"a": 1})));
        xml.bodytype = Some("xml".to_string());
        assert!(matches!(
            prepare(&xml),
            Err(CoreError::Validation(ValidationError::UnsupportedBodyType(_)))
        ));
    }

    #[test]
    fn save_request_deserializes_with_defaults() {
        let parsed: SaveRequest =
            serde_json::from_value(json!({"url": "http://localhost/x", "method": "GET"})).unwrap();
        assert_eq!(parsed.collection_id, None);
        assert_eq!(parsed.params, None);
        assert_eq!(parsed.body, None);
    }

    #[test]
    fn outcome_omits_absent_body() {
        let outcome = SaveOutcome {
            id: 1,
            status: 200,
            method: HttpMethod::Get,
            url: "http://localhost/x".to_string(),
            body_type: None,
            collection_id: None,
            response_id: 9,
            body: None,
        };
        let value = serde_json::to_value(outcome).unwrap();
        assert_eq!(value["method"], "GET");
        assert!(value.get("body").is_none());
    }
}
