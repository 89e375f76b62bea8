use axum::{
    routing::get,
    Router,
    response::Redirect,
};
use clap::Parser;
use common::{AppState, Config, StorageBackend};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    // 2. Initialize Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 3. Load Config from env vars and CLI args
    let config = Config::parse();

    // 4. Open Storage
    let storage = config.open_storage().await?;
    match config.storage_backend {
        StorageBackend::Sqlite => tracing::info!("Using SQLite storage at {}", config.database_url),
        StorageBackend::Memory => tracing::warn!("Using in-memory storage. Cards will be lost on exit."),
    }

    // 5. Routing
    let app = create_app(Arc::new(AppState { storage }));

    // 6. Start Server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: Arc<AppState>) -> Router {
    Router::<Arc<AppState>>::new()
        .route("/", get(root_redirect))
        .nest("/cards", cards::handler::cards_router(state.clone()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// The card list is the initial screen.
async fn root_redirect() -> Redirect {
    Redirect::to("/cards")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use storage::Storage;
    use tower::ServiceExt;

    fn test_app() -> Router {
        create_app(Arc::new(AppState {
            storage: Storage::in_memory(),
        }))
    }

    #[tokio::test]
    async fn test_root_redirects_to_card_list() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/cards");
    }

    #[tokio::test]
    async fn test_card_list_is_mounted() {
        let response = test_app()
            .oneshot(Request::builder().uri("/cards").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
