//! Channel appview - REST API over the channel aggregation engine
//!
//! Serves channel lookups by any identifier form, crowd votes, and admin
//! verification backed by a SQLite record store.

mod actor;
mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use channel_engine::ChannelService;
use channel_resolver::HttpChannelResolver;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use auth::TokenVerifier;
use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "channel_appview=info,channel_engine=info".into());

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let config = Config::from_env();
    info!(port = config.port, "Starting channel-appview");
    info!(
        cache_ttl_ms = config.cache_ttl.as_millis() as u64,
        global_points = config.rate_limit.points,
        vote_window_secs = config.vote_limit.window.as_secs(),
        "Engine limits"
    );

    let pool = channel_db::connect(&config.database_url, 5).await?;
    channel_db::migrate::migrate(&pool).await?;

    let resolver = Arc::new(HttpChannelResolver::with_config(config.resolver_config())?);
    let service = ChannelService::new(pool, resolver, config.engine_config());

    let tokens = config.jwt_secret.as_deref().map(TokenVerifier::new);
    if tokens.is_none() {
        warn!("JWT_SECRET not set; verification requests will be rejected");
    }
    if config.admin_ids.is_empty() {
        warn!("ADMIN_IDS is empty; no caller can set verification status");
    }

    let state = AppState::new(service, tokens);
    let app = routes::create_router(state, cors_layer(&config.cors_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}
