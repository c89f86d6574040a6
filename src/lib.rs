//! Contact-book web server: server-rendered CRUD over a contact collection,
//! with substring search, favourites, and one-shot flash feedback.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod contact;
pub mod database;
pub mod error;
pub mod flash;
pub mod routes;
pub mod search;
pub mod state;
pub mod store;
pub mod utils;
pub mod validate;
pub mod views;

use routes::{
    add_form_handler, create_handler, delete_handler, detail_handler, favourite_handler,
    index_handler, not_found_handler, search_handler, update_form_handler, update_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let img_dir = state.config.public_dir.join("img");

    Router::new()
        .route("/", get(index_handler).post(create_handler))
        .route("/add", get(add_form_handler))
        .route("/search", post(search_handler))
        .route("/favourite/:name", post(favourite_handler))
        .route("/update", post(update_handler))
        .route("/update/:name", get(update_form_handler))
        .route("/delete/:name", get(delete_handler))
        .route("/:name", get(detail_handler))
        .nest_service("/img", ServeDir::new(img_dir))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
