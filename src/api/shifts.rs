use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::api::{ApiError, AppState};
use crate::db::{Shift, ShiftWithUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInRequest {
    pub user_id: i32,
}

/// 201 for a fresh shift, 200 when today's open shift already exists.
/// A fresh clock-in also runs the retroactive short-day check, which
/// never fails the request.
pub async fn clock_in(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClockInRequest>,
) -> Result<(StatusCode, Json<Shift>), ApiError> {
    let outcome = state.shared.shifts.clock_in(payload.user_id).await?;

    if outcome.created {
        if let Err(e) = state.shared.attendance.flag_short_days(payload.user_id).await {
            warn!(user_id = payload.user_id, error = %e, "Short-day check failed");
        }
    }

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.shift)))
}

pub async fn active_shift(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<Option<Shift>>, ApiError> {
    let shift = state.shared.shifts.active_shift(user_id).await?;
    Ok(Json(shift))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutRequest {
    pub shift_id: i32,
    pub by_user_id: i32,
}

pub async fn clock_out(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClockOutRequest>,
) -> Result<Json<Shift>, ApiError> {
    let shift = state
        .shared
        .shifts
        .clock_out(payload.shift_id, payload.by_user_id)
        .await?;
    Ok(Json(shift))
}

pub async fn list_shifts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShiftWithUser>>, ApiError> {
    let shifts = state.shared.shifts.list().await?;
    Ok(Json(shifts))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    #[serde(default)]
    pub clock_in: Option<NaiveDateTime>,
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
}

pub async fn update_shift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateShiftRequest>,
) -> Result<Json<Shift>, ApiError> {
    let shift = state
        .shared
        .shifts
        .update_times(id, payload.clock_in, payload.clock_out)
        .await?;
    Ok(Json(shift))
}
