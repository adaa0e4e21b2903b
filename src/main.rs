mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

use axum::{Json, Router, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    domain::repositories::user_repository::UserRepository,
    infrastructure::json_file_user_repository::JsonFileUserRepository,
    presentation::handlers::user_handler::{MessageResponse, create_user_router},
    usecase::{
        get_user_usecase::GetUserUsecase, list_users_usecase::ListUsersUsecase,
        register_user_usecase::RegisterUserUsecase,
    },
};

/// Assemble the full application around one shared repository
fn build_app<R>(user_repository: R) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(MessageResponse {
                    message: "ok".to_string(),
                })
            }),
        )
        .merge(create_user_router(
            RegisterUserUsecase::new(user_repository.clone()),
            ListUsersUsecase::new(user_repository.clone()),
            GetUserUsecase::new(user_repository),
        ))
        .layer(middleware::from_fn(presentation::middleware::request_id))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a missing .env is fine, everything has a default
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "failed to load .env");
        }
    }

    let config = Config::from_env()?;
    info!(?config, "configuration loaded");

    let user_repository = JsonFileUserRepository::new(config.users_file.clone());
    info!(path = %user_repository.path().display(), "using user store");
    let app = build_app(user_repository);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server is running on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
