use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use channel_engine::{Channel, VerificationStatus, VoteDirection};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::actor::Actor;
use crate::auth::bearer_user;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct VoteRequest {
    pub channel_id: String,
    pub vote: VoteDirection,
}

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct VerifyRequest {
    pub channel_id: String,
    #[ts(type = "0 | 1 | 2")]
    pub status: VerificationStatus,
}

#[derive(Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

pub async fn get_channel(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<Channel>, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("Missing channel identifier".into()));
    }

    let channel = state.service.get_channel(actor.as_str(), id).await?;
    Ok(Json(channel))
}

pub async fn vote(
    State(state): State<AppState>,
    actor: Actor,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(req) = body.map_err(invalid_body)?;

    state
        .service
        .vote(actor.as_str(), req.channel_id.trim(), req.vote)
        .await?;
    Ok(SuccessResponse::ok())
}

pub async fn verify(
    State(state): State<AppState>,
    actor: Actor,
    headers: HeaderMap,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(req) = body.map_err(invalid_body)?;
    let user = bearer_user(&state, &headers);

    state
        .service
        .verify(
            actor.as_str(),
            req.channel_id.trim(),
            req.status,
            user.as_ref().map(|u| u.id.as_str()),
        )
        .await?;
    Ok(SuccessResponse::ok())
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "Rejected request body");
    AppError::BadRequest("Invalid request body".into())
}
