use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::{DayType, UserStatus};

pub mod migrator;
pub mod repositories;

pub use repositories::shift::{Shift, ShiftWithUser};
pub use repositories::transaction::{
    ClientVisit, NewTransaction, Transaction, TransactionPatch, TransactionWithUser,
};
pub use repositories::user::User;

/// Thin facade over the SeaORM connection. All call sites go through the
/// per-entity repositories; this type just owns the pool and the
/// migration bootstrap.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with("sqlite::memory:") && !db_url.starts_with(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn shift_repo(&self) -> repositories::shift::ShiftRepository {
        repositories::shift::ShiftRepository::new(self.conn.clone())
    }

    fn transaction_repo(&self) -> repositories::transaction::TransactionRepository {
        repositories::transaction::TransactionRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn set_user_attendance(
        &self,
        id: i32,
        status: UserStatus,
        is_inactive: bool,
    ) -> Result<User> {
        self.user_repo().set_attendance(id, status, is_inactive).await
    }

    pub async fn reset_inactive_users(&self) -> Result<u64> {
        self.user_repo().reset_inactive().await
    }

    // ========================================================================
    // Shifts
    // ========================================================================

    pub async fn insert_shift(
        &self,
        user_id: i32,
        clock_in: NaiveDateTime,
        is_late: bool,
        day_type: DayType,
    ) -> Result<Shift> {
        self.shift_repo()
            .insert(user_id, clock_in, is_late, day_type)
            .await
    }

    pub async fn get_shift(&self, id: i32) -> Result<Option<Shift>> {
        self.shift_repo().get(id).await
    }

    pub async fn find_open_shift(&self, user_id: i32) -> Result<Option<Shift>> {
        self.shift_repo().find_open(user_id).await
    }

    pub async fn set_shift_clock_out(&self, id: i32, clock_out: NaiveDateTime) -> Result<Shift> {
        self.shift_repo().set_clock_out(id, clock_out).await
    }

    pub async fn update_shift_times(
        &self,
        id: i32,
        clock_in: Option<NaiveDateTime>,
        clock_out: Option<NaiveDateTime>,
    ) -> Result<Shift> {
        self.shift_repo().update_times(id, clock_in, clock_out).await
    }

    pub async fn list_shifts_with_users(&self) -> Result<Vec<ShiftWithUser>> {
        self.shift_repo().list_with_users().await
    }

    pub async fn list_shifts_for_user_on(
        &self,
        user_id: i32,
        day: NaiveDate,
    ) -> Result<Vec<Shift>> {
        self.shift_repo().list_for_user_on(user_id, day).await
    }

    pub async fn close_open_shifts_between(
        &self,
        start: NaiveDateTime,
        target: NaiveDateTime,
    ) -> Result<u64> {
        self.shift_repo().close_open_between(start, target).await
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    pub async fn insert_transaction(
        &self,
        input: NewTransaction,
        created_at: NaiveDateTime,
    ) -> Result<Transaction> {
        self.transaction_repo().insert(input, created_at).await
    }

    pub async fn get_transaction(&self, id: i32) -> Result<Option<Transaction>> {
        self.transaction_repo().get(id).await
    }

    pub async fn update_transaction(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>> {
        self.transaction_repo().update(id, patch).await
    }

    pub async fn delete_transaction(&self, id: i32) -> Result<bool> {
        self.transaction_repo().delete(id).await
    }

    pub async fn list_transactions_with_users(&self) -> Result<Vec<TransactionWithUser>> {
        self.transaction_repo().list_with_users().await
    }

    pub async fn list_transactions_since(
        &self,
        since: NaiveDateTime,
    ) -> Result<Vec<Transaction>> {
        self.transaction_repo().list_since(since).await
    }

    pub async fn list_clients_served(&self) -> Result<Vec<ClientVisit>> {
        self.transaction_repo().clients_served().await
    }
}
