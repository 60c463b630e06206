//! Query execution handler

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sparqlgate_types::runtime::{error_codes, ErrorResponse, QueryRequest, QueryResponse};
use sparqlgate_types::{FailureKind, QueryOutcome};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Handler for query execution requests
pub struct QueryHandler;

impl QueryHandler {
    /// Handle GET /api/sparqlquery?endpointName=..&query=..
    ///
    /// The query string is decoded like a form body; a repeated parameter
    /// takes its last value.
    pub async fn execute_get(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
        let request = raw
            .map(|raw| parse_form(raw.as_bytes()))
            .unwrap_or_default();
        Self::run(&state, request).await
    }

    /// Handle POST /api/sparqlquery with a JSON or form-urlencoded body
    pub async fn execute_post(
        State(state): State<AppState>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let request = if is_form(&headers) {
            parse_form(&body)
        } else if body.is_empty() {
            QueryRequest::default()
        } else {
            match serde_json::from_slice::<QueryRequest>(&body) {
                Ok(request) => request,
                Err(e) => {
                    warn!("Rejected query request body: {}", e);
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::new(
                            error_codes::INVALID_REQUEST,
                            format!("Request body is not valid JSON: {}", e),
                        )),
                    )
                        .into_response();
                }
            }
        };

        Self::run(&state, request).await
    }

    async fn run(state: &AppState, request: QueryRequest) -> Response {
        if request.endpoint_name.is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::missing_param("endpointName")),
            )
                .into_response();
        }

        let request_id = Uuid::new_v4();
        info!(
            "[{}] Executing query on endpoint '{}'",
            request_id, request.endpoint_name
        );

        match state
            .gateway
            .execute(&request.endpoint_name, &request.query)
            .await
        {
            QueryOutcome::Success { data } => {
                info!("[{}] Query on '{}' succeeded", request_id, request.endpoint_name);
                (StatusCode::OK, Json(QueryResponse::new(data))).into_response()
            }
            QueryOutcome::Failure(failure) => {
                error!(
                    "[{}] Query on '{}' failed: {}",
                    request_id, request.endpoint_name, failure
                );
                let status = match failure.kind {
                    FailureKind::EndpointNotFound => StatusCode::NOT_FOUND,
                    FailureKind::TransportError | FailureKind::HttpError => StatusCode::BAD_GATEWAY,
                };
                (status, Json(ErrorResponse::from(&failure))).into_response()
            }
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

fn parse_form(body: &[u8]) -> QueryRequest {
    let mut request = QueryRequest::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "endpointName" | "endpoint_name" => request.endpoint_name = value.into_owned(),
            "query" => request.query = value.into_owned(),
            _ => {}
        }
    }
    request
}
