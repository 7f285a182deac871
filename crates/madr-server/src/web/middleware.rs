use crate::auth::validate_access_token;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use madr_db::{UserRepo, UserRow};
use serde_json::json;
use std::sync::Arc;

/// Extractor that validates a JWT Bearer token and resolves it to the
/// account it names. The resolved row is the authenticated principal for
/// all downstream ownership checks.
pub struct CurrentUser(pub UserRow);

/// A missing header, a bad token and an unresolvable subject all produce
/// the same response; callers learn nothing about which check failed.
fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Could not validate credentials"})),
    )
        .into_response()
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header.and_then(|val| val.strip_prefix("Bearer ")) {
            Some(t) => t,
            None => return Err(unauthorized()),
        };

        let claims = match validate_access_token(token, &state.config.auth) {
            Ok(claims) => claims,
            Err(_) => return Err(unauthorized()),
        };

        match UserRepo::get_by_email(&state.pool, &claims.sub).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(unauthorized()),
            Err(e) => {
                tracing::error!("DB error resolving token subject: {}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal server error"})),
                )
                    .into_response())
            }
        }
    }
}
