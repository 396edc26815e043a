use axum::extract::State;
use axum::Json;
use serde::Serialize;
use ts_rs::TS;

use crate::auth::AuthUser;
use crate::state::AppState;

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MeResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub username: Option<String>,
    pub is_admin: bool,
}

/// Describe the bearer of the request's token
pub async fn me(State(state): State<AppState>, user: AuthUser) -> Json<MeResponse> {
    let is_admin = state.service.is_admin(&user.id);
    Json(MeResponse {
        id: user.id,
        username: user.username,
        is_admin,
    })
}
