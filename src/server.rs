use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::Error;
use crate::pipeline::{Pipeline, Report};

pub const SUMMARIZE_PATH: &str = "/summarize_youtube";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    /// Used by `GET` requests that carry no `url` parameter
    pub default_url: Option<Arc<str>>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(SUMMARIZE_PATH, get(summarize_query).post(summarize_body))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn summarize_query(
    State(state): State<AppState>,
    query: Result<Query<SummarizeRequest>, QueryRejection>,
) -> Result<Json<Report>, Error> {
    let Query(request) = query.map_err(|e| {
        error!("Rejected query string: {e}");
        Error::InvalidReference
    })?;
    let url = request.url.or_else(|| state.default_url.as_deref().map(str::to_string));
    summarize(&state, url).await
}

async fn summarize_body(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<Report>, Error> {
    let Json(request) = body.map_err(|e| {
        error!("Rejected request body: {e}");
        Error::InvalidReference
    })?;
    summarize(&state, request.url).await
}

async fn summarize(state: &AppState, url: Option<String>) -> Result<Json<Report>, Error> {
    let url = url.ok_or(Error::InvalidReference)?;
    info!("Summarize request for {url}");

    match state.pipeline.run(&url).await {
        Ok(report) => {
            info!("Summarize request completed for {url}");
            Ok(Json(report))
        }
        Err(e) => {
            error!("Summarize request failed for {url}: {e}");
            Err(e)
        }
    }
}
