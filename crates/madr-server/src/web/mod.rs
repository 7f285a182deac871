pub mod accounts;
pub mod auth;
pub mod books;
pub mod middleware;
pub mod novelists;

use crate::state::AppState;
use axum::response::IntoResponse;
use axum::{routing::get, routing::post, routing::put, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// GET / -- public welcome endpoint
async fn root() -> impl IntoResponse {
    Json(json!({"message": "Seja bem-vindo(a) ao Meu Acervo Digital de Romances"}))
}

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        // Auth
        .route("/auth/token", post(auth::login))
        // Accounts
        .route("/conta/", post(accounts::create_account))
        .route(
            "/conta/{id}",
            put(accounts::update_account).delete(accounts::delete_account),
        )
        // Novelists
        .route(
            "/romancista/",
            post(novelists::create_novelist).get(novelists::list_novelists),
        )
        .route(
            "/romancista/{id}",
            get(novelists::get_novelist)
                .patch(novelists::update_novelist)
                .delete(novelists::delete_novelist),
        )
        // Books
        .route("/livro/", post(books::create_book).get(books::list_books))
        .route(
            "/livro/{id}",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
