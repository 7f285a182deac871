use crate::auth::{create_access_token, verify_password};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use madr_common::case_fold;
use madr_db::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/token
///
/// OAuth2-style password form. The identifier may be an email or a
/// username; an unknown identifier and a wrong password fail identically.
#[tracing::instrument(skip(state, form))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let identifier = case_fold(&form.username);

    let user = match UserRepo::get_by_identifier(&state.pool, &identifier).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "User or credentials invalid"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("DB error during login: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    match verify_password(&form.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "User or credentials invalid"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Password verification error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    }

    let access_token = match create_access_token(&user.email, &state.config.auth) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to create access token: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
    .into_response()
}
