//! Acting-user resolution and body parsing shared by the internal handlers.
//!
//! Callers are trusted services: the acting user comes from the
//! `X-User-ID` header, or from a body field when the header is absent.

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::JsonApiError;

pub const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestingUserBody {
    #[serde(default)]
    pub requesting_user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Acting user; falls back to the `X-User-ID` header.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> { v.filter(|s| !s.trim().is_empty()) }

pub fn header_user(headers: &HeaderMap) -> Option<String> {
    non_empty(headers.get(USER_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string))
}

/// Header first, then the body field.
pub fn acting_user(headers: &HeaderMap, from_body: Option<String>, missing: &str) -> Result<String, JsonApiError> {
    header_user(headers)
        .or_else(|| non_empty(from_body))
        .ok_or_else(|| JsonApiError::bad_request(missing, None))
}

/// Query parameter first, then header.
pub fn listing_user(query: UserQuery, headers: &HeaderMap) -> Result<String, JsonApiError> {
    non_empty(query.user_id)
        .or_else(|| header_user(headers))
        .ok_or_else(|| JsonApiError::bad_request("User ID required", None))
}

pub fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, JsonApiError> {
    serde_json::from_slice(body).map_err(|e| JsonApiError::bad_request("Invalid Request Body", Some(e.to_string())))
}

/// Bodies that only carry a fallback user id; anything unparsable counts as empty.
pub fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_default()
}

pub fn project_id(raw: &str) -> Result<i32, JsonApiError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| JsonApiError::bad_request("Invalid project ID", Some(raw.to_string())))
}
