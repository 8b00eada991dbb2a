use axum::{Json, extract::Path, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ApiError, AppState};
use crate::db::User;

pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store().list_users().await?;
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(default)]
    pub pin: Option<String>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .shared
        .attendance
        .login(&payload.username, payload.pin.as_deref())
        .await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActionRequest {
    pub by_admin_id: i32,
}

pub async fn suspend_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<AdminActionRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .shared
        .attendance
        .suspend(id, payload.by_admin_id)
        .await?;
    Ok(Json(user))
}

pub async fn recall_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<AdminActionRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .shared
        .attendance
        .recall(id, payload.by_admin_id)
        .await?;
    Ok(Json(user))
}
