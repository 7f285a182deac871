use anyhow::{Context, Result};
use madr_common::case_fold;
use madr_db::{create_pool, run_migrations, UserRepo};
use madr_server::auth::hash_password;
use madr_server::config::load_config;
use madr_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting MADR server");

    // Load configuration
    let config_path =
        std::env::var("MADR_CONFIG").unwrap_or_else(|_| "server-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);

    let config = load_config(&config_path)?;

    // Create database pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Seed initial account if configured
    if let Some(initial_user) = &config.auth.initial_user {
        let email = case_fold(&initial_user.email);
        match UserRepo::get_by_email(&pool, &email).await {
            Ok(Some(_)) => {
                tracing::info!("Initial account '{}' already exists, skipping seed", email);
            }
            Ok(None) => {
                let password_hash = hash_password(&initial_user.password)
                    .context("Failed to hash initial account password")?;
                UserRepo::create(
                    &pool,
                    &case_fold(&initial_user.username),
                    &email,
                    &password_hash,
                )
                .await
                .context("Failed to create initial account")?;
                tracing::info!("Created initial account: {}", email);
            }
            Err(e) => {
                tracing::warn!("Failed to check for initial account: {}", e);
            }
        }
    }

    // Build application state and router
    let state = AppState::new(pool, config.clone());
    let app = madr_server::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;

    tracing::info!("Server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
