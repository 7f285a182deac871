use crate::state::AppState;
use crate::web::middleware::CurrentUser;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use madr_common::case_fold;
use madr_db::{BookRepo, BookRow, DbError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub year: i32,
    pub novelist_id: i64,
}

/// Partial update: absent fields are left unchanged, present fields are
/// applied even when zero or empty.
#[derive(Debug, Deserialize)]
pub struct BookUpdateRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub novelist_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub title: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

fn book_json(book: &BookRow) -> Value {
    json!({
        "id": book.id,
        "title": book.title,
        "year": book.year,
        "novelist_id": book.novelist_id,
    })
}

/// POST /livro/
#[tracing::instrument(skip(state, _current_user, req))]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    _current_user: CurrentUser,
    Json(req): Json<BookRequest>,
) -> impl IntoResponse {
    let title = case_fold(&req.title);

    match BookRepo::get_by_title(&state.pool, &title).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "Book already created"})),
            )
                .into_response()
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error checking for existing book: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    }

    match BookRepo::create(&state.pool, &title, req.year, req.novelist_id).await {
        Ok(book) => (StatusCode::CREATED, Json(book_json(&book))).into_response(),
        Err(DbError::UniqueViolation) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Book already created"})),
        )
            .into_response(),
        // The foreign key is the referential authority; a dangling
        // novelist_id surfaces as a conflict, not a distinct not-found.
        Err(DbError::ForeignKeyViolation) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Novelist id is invalid"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create book: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// GET /livro/{id}
#[tracing::instrument(skip(state, _current_user))]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    match BookRepo::get_by_id(&state.pool, id).await {
        Ok(Some(book)) => Json(book_json(&book)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Book id was not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get book: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// GET /livro/ -- list with optional title/year filters and pagination
#[tracing::instrument(skip(state, _current_user))]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBooksQuery>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    // The title filter goes through the same fold as stored titles; an
    // all-whitespace filter means no filter.
    let title = query
        .title
        .as_deref()
        .map(case_fold)
        .filter(|t| !t.is_empty());
    // The year filter matches as a substring of the year's decimal text.
    let year = query.year.map(|y| y.to_string());

    match BookRepo::list(
        &state.pool,
        title.as_deref(),
        year.as_deref(),
        query.limit,
        query.offset,
    )
    .await
    {
        Ok(books) => {
            let books: Vec<Value> = books.iter().map(book_json).collect();
            Json(json!({"books": books})).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list books: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// PATCH /livro/{id}
#[tracing::instrument(skip(state, _current_user, req))]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    _current_user: CurrentUser,
    Json(req): Json<BookUpdateRequest>,
) -> impl IntoResponse {
    let title = req.title.as_deref().map(case_fold);

    match BookRepo::update(
        &state.pool,
        id,
        title.as_deref(),
        req.year,
        req.novelist_id,
    )
    .await
    {
        Ok(Some(book)) => Json(book_json(&book)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Book id was not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update book: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// DELETE /livro/{id}
#[tracing::instrument(skip(state, _current_user))]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    match BookRepo::delete(&state.pool, id).await {
        Ok(true) => Json(json!({"message": "Book deleted successfully"})).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Book id was not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete book: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}
