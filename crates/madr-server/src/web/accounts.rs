use crate::auth::hash_password;
use crate::state::AppState;
use crate::web::middleware::CurrentUser;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use madr_common::case_fold;
use madr_db::{DbError, UserRepo, UserRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn account_json(user: &UserRow) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
    })
}

/// POST /conta/ -- register a new account (no auth required)
#[tracing::instrument(skip(state, req))]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AccountRequest>,
) -> impl IntoResponse {
    let username = case_fold(&req.username);
    let email = case_fold(&req.email);

    match UserRepo::find_by_username_or_email(&state.pool, &username, &email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "Username or Email already exist"})),
            )
                .into_response()
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error checking for existing account: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    }

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    // Two registrations racing on the same key both reach the INSERT; the
    // unique constraints decide the loser.
    match UserRepo::create(&state.pool, &username, &email, &password_hash).await {
        Ok(user) => (StatusCode::CREATED, Json(account_json(&user))).into_response(),
        Err(DbError::UniqueViolation) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Username or Email already exist"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create account: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// PUT /conta/{id} -- full update of the caller's own account
#[tracing::instrument(skip(state, current_user, req))]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    current_user: CurrentUser,
    Json(req): Json<AccountRequest>,
) -> impl IntoResponse {
    if current_user.0.id != id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "You are not allowed to change this user"})),
        )
            .into_response();
    }

    let username = case_fold(&req.username);
    let email = case_fold(&req.email);

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    match UserRepo::update(&state.pool, id, &username, &email, &password_hash).await {
        Ok(Some(user)) => Json(account_json(&user)).into_response(),
        // The principal row was resolved moments ago; losing it here means
        // a concurrent delete won.
        Ok(None) => {
            tracing::error!("Account {} vanished during update", id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
        Err(DbError::UniqueViolation) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Username or email already exists"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update account: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// DELETE /conta/{id} -- delete the caller's own account
#[tracing::instrument(skip(state, current_user))]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    if current_user.0.id != id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "You are not allowed to delete this user"})),
        )
            .into_response();
    }

    match UserRepo::delete(&state.pool, id).await {
        Ok(_) => Json(json!({"message": "Account deleted successfully"})).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete account: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}
