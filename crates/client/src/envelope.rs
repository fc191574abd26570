//! Response envelope normalization.
//!
//! The backend wraps most responses as
//! `{ "success": true, "data": ..., "pageInfo": ... }` but a few endpoints
//! return `{ "data": ... }` or the bare entity. Every response passes
//! through [`unwrap_data`] once, at the collaborator boundary, so callers
//! only ever see the already-unwrapped payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

fn default_success() -> bool {
    true
}

/// Whether a JSON body has the envelope shape rather than being a bare
/// entity.
pub fn is_envelope(body: &Value) -> bool {
    match body.as_object() {
        Some(obj) => {
            obj.get("success").is_some_and(Value::is_boolean) || obj.contains_key("data")
        }
        None => false,
    }
}

/// Normalize a response body into its `data` payload.
///
/// - Envelope with `success: false` becomes [`ClientError::Rejected`].
/// - Envelope without `data` yields `Value::Null`.
/// - Anything that is not an envelope is returned unchanged.
pub fn unwrap_data(body: Value) -> Result<Value, ClientError> {
    if !is_envelope(&body) {
        return Ok(body);
    }
    let envelope: ApiEnvelope<Value> = serde_json::from_value(body)?;
    if !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| "request was not successful".to_string());
        return Err(ClientError::Rejected(message));
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}
