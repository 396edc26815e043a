pub mod channels;
pub mod health;
pub mod me;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::actor::Actor;
use crate::error::AppError;
use crate::state::AppState;

/// Create the HTTP router
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    // The channel operations spend the global point inside the engine
    let limited = Router::new()
        .route("/health", get(health::health))
        .route("/me", get(me::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            spend_global_point,
        ));

    Router::new()
        .route("/channel/{*id}", get(channels::get_channel))
        .route("/vote", post(channels::vote))
        .route("/verify", post(channels::verify))
        .merge(limited)
        .layer(cors)
        .with_state(state)
}

/// Charge the global request budget before any other extractor runs
async fn spend_global_point(
    State(state): State<AppState>,
    actor: Actor,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.service.check_request(actor.as_str())?;
    Ok(next.run(request).await)
}
