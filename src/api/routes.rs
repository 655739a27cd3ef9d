//! HTTP route handlers for Axum.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    api::types::{DrugQuery, SelectionRequest, SessionDto},
    predict::PredictionView,
    session::Session,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub async fn list_drugs(
    State(state): State<AppState>,
    Query(query): Query<DrugQuery>,
) -> Json<Vec<String>> {
    let index = &state.predictor.context().index;
    let names: Vec<String> = match query.q.as_deref().map(str::trim) {
        Some(needle) if !needle.is_empty() => {
            let needle = needle.to_lowercase();
            index
                .names()
                .filter(|name| name.to_lowercase().contains(&needle))
                .map(str::to_string)
                .collect()
        }
        _ => index.names().map(str::to_string).collect(),
    };
    Json(names)
}

/// Stateless prediction for callers that keep their own selection.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Json<PredictionView> {
    Json(state.predictor.predict_combination(request.drugs.as_slice()))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionDto>) {
    let (id, view) = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionDto { id, view }))
}

pub async fn get_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<SessionDto> {
    let handle = find_session(&state, &id).await?;
    let view = handle.lock().await.view();
    Ok(Json(SessionDto { id, view }))
}

pub async fn delete_session(Path(id): Path<String>, State(state): State<AppState>) -> StatusCode {
    if state.sessions.remove(&id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

pub async fn update_selection(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> ApiResult<SessionDto> {
    let handle = find_session(&state, &id).await?;
    let mut session = handle.lock().await;
    session.select(request.drugs);
    Ok(Json(SessionDto {
        id,
        view: session.view(),
    }))
}

pub async fn submit_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<SessionDto> {
    let handle = find_session(&state, &id).await?;
    let mut session = handle.lock().await;
    session.submit(&state.predictor);
    Ok(Json(SessionDto {
        id,
        view: session.view(),
    }))
}

pub async fn clear_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<SessionDto> {
    let handle = find_session(&state, &id).await?;
    let mut session = handle.lock().await;
    session.clear();
    Ok(Json(SessionDto {
        id,
        view: session.view(),
    }))
}

async fn find_session(
    state: &AppState,
    id: &str,
) -> Result<Arc<Mutex<Session>>, (StatusCode, String)> {
    state.sessions.get(id).await.ok_or_else(|| {
        warn!(session = %id, "unknown session");
        (StatusCode::NOT_FOUND, format!("unknown session {id}"))
    })
}
