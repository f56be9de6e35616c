//! HTTP handlers and response envelopes
//!
//! Response shapes follow the original server's JSON contract: lookup
//! responses carry a `success` flag, the record under `data`, and a
//! `source` field saying whether the cache or the provider answered.
//! Batch responses omit unresolved codes instead of padding with nulls.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::data::Airport;
use crate::service::Source;

use super::state::AppState;

/// Maximum results returned by the autocomplete search
const SEARCH_LIMIT: usize = 10;

/// Successful single-airport lookup
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub success: bool,
    pub data: Airport,
    pub source: Source,
}

/// Error envelope for 4xx/5xx responses
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Successful batch lookup; unresolved codes are simply absent
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub data: Vec<Airport>,
}

/// Service banner returned from the root route
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub amadeus_configured: bool,
    pub cached_airports: usize,
}

/// Query parameters for the autocomplete search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}

fn failure(status: StatusCode, message: &str, error: Option<String>) -> Response {
    (
        status,
        Json(FailureResponse {
            success: false,
            message: message.to_string(),
            error,
        }),
    )
        .into_response()
}

/// `GET /` - liveness banner with configuration summary
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "aerodex airport lookup service is running".to_string(),
        amadeus_configured: state.locator.is_configured(),
        cached_airports: state.locator.cached_entries().await,
    })
}

/// `GET /api/airports/{iata}` - single airport lookup
///
/// Responds 200 with the record and its source, 404 when the provider has
/// no match, and 500 when the provider call fails.
pub async fn get_airport(State(state): State<AppState>, Path(iata): Path<String>) -> Response {
    info!(code = %iata, "Airport lookup requested");

    match state.locator.locate(&iata).await {
        Ok(Some(located)) => (
            StatusCode::OK,
            Json(LookupResponse {
                success: true,
                data: located.airport,
                source: located.source,
            }),
        )
            .into_response(),
        Ok(None) => failure(StatusCode::NOT_FOUND, "Airport not found", None),
        Err(e) => {
            error!(code = %iata, error = %e, "Airport lookup failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve airport information",
                Some(e.to_string()),
            )
        }
    }
}

/// `POST /api/airports/batch` - bulk airport lookup
///
/// The body must be `{"iataCodes": [...strings]}`; anything else is a 400,
/// checked by hand against the loose JSON value the way the original
/// validated with `Array.isArray`. Codes that fail to resolve are dropped
/// from the result rather than failing the whole batch.
pub async fn batch_airports(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let codes = match parse_batch_body(&body) {
        Some(codes) => codes,
        None => {
            return failure(
                StatusCode::BAD_REQUEST,
                "iataCodes must be an array of strings",
                None,
            )
        }
    };
    info!(codes = codes.len(), "Batch airport lookup requested");

    let data = state.locator.locate_many(&codes).await;
    (
        StatusCode::OK,
        Json(BatchResponse {
            success: true,
            data,
        }),
    )
        .into_response()
}

/// `GET /api/airports?keyword=` - keyword autocomplete
///
/// Returns a plain array of matches; short keywords yield an empty array
/// without a provider call.
pub async fn search_airports(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    match state.locator.search(&params.keyword, SEARCH_LIMIT).await {
        Ok(airports) => (StatusCode::OK, Json(airports)).into_response(),
        Err(e) => {
            error!(keyword = %params.keyword, error = %e, "Airport search failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to search airports",
                Some(e.to_string()),
            )
        }
    }
}

/// Extracts the code list from the request body, or `None` when the shape
/// is wrong
fn parse_batch_body(body: &Value) -> Option<Vec<String>> {
    body.get("iataCodes")?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}
