use crate::state::AppState;
use crate::web::middleware::CurrentUser;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use madr_common::case_fold;
use madr_db::{DbError, NovelistRepo, NovelistRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct NovelistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListNovelistsQuery {
    pub name: Option<String>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

fn novelist_json(novelist: &NovelistRow) -> Value {
    json!({
        "id": novelist.id,
        "name": novelist.name,
    })
}

/// POST /romancista/
#[tracing::instrument(skip(state, _current_user, req))]
pub async fn create_novelist(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
    Json(req): Json<NovelistRequest>,
) -> impl IntoResponse {
    let name = case_fold(&req.name);

    match NovelistRepo::get_by_name(&state.pool, &name).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "Novelist already exists"})),
            )
                .into_response()
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error checking for existing novelist: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    }

    match NovelistRepo::create(&state.pool, &name).await {
        Ok(novelist) => (StatusCode::CREATED, Json(novelist_json(&novelist))).into_response(),
        Err(DbError::UniqueViolation) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Novelist already exists"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create novelist: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// GET /romancista/{id}
#[tracing::instrument(skip(state, _current_user))]
pub async fn get_novelist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    match NovelistRepo::get_by_id(&state.pool, id).await {
        Ok(Some(novelist)) => Json(novelist_json(&novelist)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Novelist id not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get novelist: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// GET /romancista/ -- list with optional name filter and pagination
#[tracing::instrument(skip(state, _current_user))]
pub async fn list_novelists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListNovelistsQuery>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    match NovelistRepo::list(&state.pool, query.name.as_deref(), query.limit, query.offset).await {
        Ok(novelists) => {
            let novelists: Vec<Value> = novelists.iter().map(novelist_json).collect();
            Json(json!({"novelists": novelists})).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list novelists: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// PATCH /romancista/{id}
#[tracing::instrument(skip(state, _current_user, req))]
pub async fn update_novelist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    _current_user: CurrentUser,
    Json(req): Json<NovelistRequest>,
) -> impl IntoResponse {
    let name = case_fold(&req.name);

    match NovelistRepo::update(&state.pool, id, &name).await {
        Ok(Some(novelist)) => Json(novelist_json(&novelist)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Novelist id not found"})),
        )
            .into_response(),
        Err(DbError::UniqueViolation) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Novelist already exists"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update novelist: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// DELETE /romancista/{id}
#[tracing::instrument(skip(state, _current_user))]
pub async fn delete_novelist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    match NovelistRepo::delete(&state.pool, id).await {
        Ok(true) => Json(json!({"message": "Novelist deleted in the MADR"})).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Novelist id not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete novelist: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}
