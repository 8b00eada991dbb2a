//! `SeaORM` implementation of the [`StatsService`] trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, NaiveTime};

use crate::db::Store;
use crate::services::stats_service::{
    DailyStats, LeaderboardEntry, StatsError, StatsService, rank_mpesa, summarize,
};

pub struct SeaOrmStatsService {
    store: Store,
}

impl SeaOrmStatsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn today_start() -> NaiveDateTime {
        Local::now()
            .naive_local()
            .date()
            .and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

#[async_trait]
impl StatsService for SeaOrmStatsService {
    async fn daily_stats(&self) -> Result<DailyStats, StatsError> {
        let today = self
            .store
            .list_transactions_since(Self::today_start())
            .await?;

        Ok(summarize(&today))
    }

    async fn mpesa_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StatsError> {
        let today = self
            .store
            .list_transactions_since(Self::today_start())
            .await?;

        let id_by_name: HashMap<String, i32> = self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(|u| (u.name, u.id))
            .collect();

        Ok(rank_mpesa(&today, &id_by_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewTransaction;
    use crate::domain::TransactionKind;

    async fn store() -> Store {
        Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store")
    }

    fn mpesa(amount: f64, recipient: &str) -> NewTransaction {
        NewTransaction {
            user_id: 1,
            kind: TransactionKind::Mpesa,
            amount,
            client_name: None,
            groomed_by: "Jay".to_string(),
            served_by: "Samir".to_string(),
            recipient: Some(recipient.to_string()),
            mpesa_ref: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn yesterday_is_excluded_from_daily_stats() {
        let store = store().await;
        let svc = SeaOrmStatsService::new(store.clone());
        let now = Local::now().naive_local();

        store
            .insert_transaction(mpesa(100.0, "Jay"), now)
            .await
            .unwrap();
        store
            .insert_transaction(mpesa(999.0, "Jay"), now - chrono::Duration::days(1))
            .await
            .unwrap();

        let stats = svc.daily_stats().await.unwrap();
        assert_eq!(stats.total_mpesa, 100.0);
        assert_eq!(stats.liquid_cash, 0.0);
    }

    #[tokio::test]
    async fn leaderboard_resolves_seeded_names() {
        let store = store().await;
        let svc = SeaOrmStatsService::new(store.clone());
        let now = Local::now().naive_local();

        // "Jay" is a seeded staff member; "Visitor" is not.
        store
            .insert_transaction(mpesa(60.0, "Jay"), now)
            .await
            .unwrap();
        store
            .insert_transaction(mpesa(40.0, "Visitor"), now)
            .await
            .unwrap();

        let jay_id = store
            .get_user_by_username("jay")
            .await
            .unwrap()
            .unwrap()
            .id;

        let board = svc.mpesa_leaderboard().await.unwrap();
        assert_eq!(board[0].name, "Jay");
        assert_eq!(board[0].user_id, jay_id);
        assert_eq!(board[1].name, "Visitor");
        assert_eq!(board[1].user_id, 0);
    }
}
