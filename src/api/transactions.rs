use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

use crate::api::{ApiError, AppState};
use crate::db::{
    ClientVisit, NewTransaction, Transaction, TransactionPatch, TransactionWithUser,
};
use crate::domain::TransactionKind;
use crate::services::{DailyStats, LeaderboardEntry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub user_id: i32,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub client_name: Option<String>,
    pub groomed_by: String,
    pub served_by: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub mpesa_ref: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateTransactionRequest> for NewTransaction {
    fn from(req: CreateTransactionRequest) -> Self {
        Self {
            user_id: req.user_id,
            kind: req.kind,
            amount: req.amount,
            client_name: req.client_name,
            groomed_by: req.groomed_by,
            served_by: req.served_by,
            recipient: req.recipient,
            mpesa_ref: req.mpesa_ref,
            description: req.description,
        }
    }
}

pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let created = state.shared.transactions.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TransactionWithUser>>, ApiError> {
    let transactions = state.shared.transactions.list().await?;
    Ok(Json(transactions))
}

/// A present key (null included) deserializes to `Some(inner)`; an
/// absent one stays `None` via `default`. Plain serde would fold an
/// explicit null into the outer `None` and lose the distinction.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Patch body: an absent field keeps the stored value, an explicit null
/// clears a nullable one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub client_name: Option<Option<String>>,
    #[serde(default)]
    pub groomed_by: Option<String>,
    #[serde(default)]
    pub served_by: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub recipient: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub mpesa_ref: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<UpdateTransactionRequest> for TransactionPatch {
    fn from(req: UpdateTransactionRequest) -> Self {
        Self {
            user_id: req.user_id,
            kind: req.kind,
            amount: req.amount,
            client_name: req.client_name,
            groomed_by: req.groomed_by,
            served_by: req.served_by,
            recipient: req.recipient,
            mpesa_ref: req.mpesa_ref,
            description: req.description,
        }
    }
}

pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let updated = state
        .shared
        .transactions
        .update(id, payload.into())
        .await?;
    Ok(Json(updated))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTransactionQuery {
    // Kept as a raw string so a malformed id is refused as a missing
    // admin rather than a deserialization error.
    #[serde(default)]
    pub by_admin_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteTransactionResponse {
    pub id: i32,
    pub deleted: bool,
}

/// The acting admin id comes from the `byAdminId` query parameter, with
/// the `X-Admin-Id` header as a fallback.
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<DeleteTransactionQuery>,
    headers: HeaderMap,
) -> Result<Json<DeleteTransactionResponse>, ApiError> {
    let actor_id = query
        .by_admin_id
        .as_deref()
        .and_then(|v| v.parse().ok())
        .or_else(|| {
            headers
                .get("x-admin-id")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        })
        .ok_or_else(|| {
            ApiError::Forbidden("Only admin can delete transactions".to_string())
        })?;

    let deleted = state.shared.transactions.delete(id, actor_id).await?;
    Ok(Json(DeleteTransactionResponse {
        id: deleted,
        deleted: true,
    }))
}

pub async fn daily_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DailyStats>, ApiError> {
    let stats = state.shared.stats.daily_stats().await?;
    Ok(Json(stats))
}

pub async fn mpesa_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let board = state.shared.stats.mpesa_leaderboard().await?;
    Ok(Json(board))
}

pub async fn clients_served(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ClientVisit>>, ApiError> {
    let visits = state.shared.transactions.clients_served().await?;
    Ok(Json(visits))
}
