//! Daily stats and the M-Pesa leaderboard.
//!
//! Aggregation is pure over a slice of today's transactions; the SeaORM
//! implementation only fetches the day's rows and the user roster.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::db::Transaction;
use crate::domain::TransactionKind;

/// Recipient used when an mpesa transaction has no recorded handler.
pub const UNKNOWN_RECIPIENT: &str = "Unknown";

/// Leaderboard user id for recipients that match no user's display name.
pub const UNMATCHED_USER_ID: i32 = 0;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for StatsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Today's money totals per transaction kind.
///
/// `liquid_cash` is cash plus withdrawals. Withdrawals here are the
/// M-Pesa withdrawal service (the shop hands out cash, receives mobile
/// money), so they add to cash on hand by the shop's own accounting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_cash: f64,
    pub total_mpesa: f64,
    pub total_withdrawal: f64,
    pub liquid_cash: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: i32,
    pub name: String,
    pub total_mpesa: f64,
}

/// Sums one day's transactions by kind.
#[must_use]
pub fn summarize(transactions: &[Transaction]) -> DailyStats {
    let mut total_cash = 0.0;
    let mut total_mpesa = 0.0;
    let mut total_withdrawal = 0.0;

    for tx in transactions {
        match tx.kind {
            TransactionKind::Cash => total_cash += tx.amount,
            TransactionKind::Mpesa => total_mpesa += tx.amount,
            TransactionKind::Withdrawal => total_withdrawal += tx.amount,
        }
    }

    DailyStats {
        total_cash,
        total_mpesa,
        total_withdrawal,
        liquid_cash: total_cash + total_withdrawal,
    }
}

/// Ranks one day's mpesa transactions by recipient, highest total first.
/// Recipient display names resolve to user ids best-effort; ties break
/// by name so the ordering is stable.
#[must_use]
pub fn rank_mpesa(
    transactions: &[Transaction],
    id_by_name: &HashMap<String, i32>,
) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for tx in transactions {
        if tx.kind != TransactionKind::Mpesa {
            continue;
        }
        let name = tx
            .recipient
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(UNKNOWN_RECIPIENT);
        *totals.entry(name.to_string()).or_default() += tx.amount;
    }

    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(name, total_mpesa)| LeaderboardEntry {
            user_id: id_by_name.get(&name).copied().unwrap_or(UNMATCHED_USER_ID),
            name,
            total_mpesa,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_mpesa
            .partial_cmp(&a.total_mpesa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    entries
}

/// Domain service trait for the stats aggregator.
#[async_trait::async_trait]
pub trait StatsService: Send + Sync {
    /// Totals over transactions created since today 00:00 local.
    async fn daily_stats(&self) -> Result<DailyStats, StatsError>;

    /// Today's per-recipient mobile-money ranking, descending.
    async fn mpesa_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StatsError>;
}
