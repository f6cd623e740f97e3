use std::sync::Arc;

use axum::{Json, extract::State as AxumState, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::{error::AppError, presence::PresenceEntry, state::State, utils::ClientId};

#[derive(Serialize)]
pub struct HeartbeatResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ActiveUsersResponse {
    pub count: usize,
    pub users: Vec<PresenceEntry>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn heartbeat_handler(
    AxumState(state): AxumState<Arc<State>>,
    ClientId(client_id): ClientId,
) -> impl IntoResponse {
    state.presence.record_heartbeat(&client_id, state.now()).await;

    (StatusCode::OK, Json(HeartbeatResponse { success: true }))
}

pub async fn active_users_handler(AxumState(state): AxumState<Arc<State>>) -> impl IntoResponse {
    let users = state.presence.list_active(state.now()).await;

    (
        StatusCode::OK,
        Json(ActiveUsersResponse {
            count: users.len(),
            users,
        }),
    )
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}
