use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use leetsync::auth::AuthGuard;
use leetsync::config::{Cli, Config, default_config_path};
use leetsync::github::GithubClient;
use leetsync::handler::{AppState, healthcheck, sync};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let config_path = match args.config_path {
        Some(path) => std::path::PathBuf::from(path),
        None => default_config_path(),
    };

    tracing_subscriber::fmt().json().init();
    tracing::info!("leetsync.svc starting");

    let cfg = Config::new(&config_path).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });

    let auth = Arc::new(AuthGuard::new(&cfg.auth.hmac_secret));

    let store = if cfg.github.is_configured() {
        tracing::info!(
            repo = %format!("{}/{}", cfg.github.owner, cfg.github.repo),
            "target repository"
        );
        let client = GithubClient::new(&cfg.github).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to setup github client");
            std::process::exit(1);
        });
        Some(Arc::new(client))
    } else {
        tracing::warn!("github credentials not set, sync requests will fail");
        None
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/sync", post(sync))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(AppState { auth, store });

    let address = format!("0.0.0.0:{}", cfg.app.port);
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("leetsync.svc running on {}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, shutting down");
        }
    }

    tracing::info!("leetsync.svc going off");
}
