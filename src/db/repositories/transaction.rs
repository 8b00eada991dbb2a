use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;

use crate::domain::TransactionKind;
use crate::entities::{prelude::*, transactions};

use super::user::User;

/// Transaction row as stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub client_name: Option<String>,
    pub groomed_by: String,
    pub served_by: String,
    pub recipient: Option<String>,
    pub mpesa_ref: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<transactions::Model> for Transaction {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            kind: TransactionKind::parse(&model.kind).unwrap_or(TransactionKind::Cash),
            amount: model.amount,
            client_name: model.client_name,
            groomed_by: model.groomed_by,
            served_by: model.served_by,
            recipient: model.recipient,
            mpesa_ref: model.mpesa_ref,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

/// Transaction joined with whoever logged it, when that user still exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithUser {
    #[serde(flatten)]
    pub transaction: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Validated input for a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i32,
    pub kind: TransactionKind,
    pub amount: f64,
    pub client_name: Option<String>,
    pub groomed_by: String,
    pub served_by: String,
    pub recipient: Option<String>,
    pub mpesa_ref: Option<String>,
    pub description: Option<String>,
}

/// Field-by-field patch for an edit. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub user_id: Option<i32>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<f64>,
    pub client_name: Option<Option<String>>,
    pub groomed_by: Option<String>,
    pub served_by: Option<String>,
    pub recipient: Option<Option<String>>,
    pub mpesa_ref: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

/// One row of the client service log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientVisit {
    pub created_at: NaiveDateTime,
    pub client_name: Option<String>,
    pub served_by: String,
    pub groomed_by: String,
}

pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl TransactionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        input: NewTransaction,
        created_at: NaiveDateTime,
    ) -> Result<Transaction> {
        let active = transactions::ActiveModel {
            user_id: Set(input.user_id),
            kind: Set(input.kind.as_str().to_string()),
            amount: Set(input.amount),
            client_name: Set(input.client_name),
            groomed_by: Set(input.groomed_by),
            served_by: Set(input.served_by),
            recipient: Set(input.recipient),
            mpesa_ref: Set(input.mpesa_ref),
            description: Set(input.description),
            created_at: Set(created_at),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert transaction")?;

        Ok(Transaction::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Transaction>> {
        let row = Transactions::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query transaction by id")?;

        Ok(row.map(Transaction::from))
    }

    pub async fn update(&self, id: i32, patch: TransactionPatch) -> Result<Option<Transaction>> {
        let Some(row) = Transactions::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query transaction for update")?
        else {
            return Ok(None);
        };

        let mut active: transactions::ActiveModel = row.into();
        if let Some(user_id) = patch.user_id {
            active.user_id = Set(user_id);
        }
        if let Some(kind) = patch.kind {
            active.kind = Set(kind.as_str().to_string());
        }
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(client_name) = patch.client_name {
            active.client_name = Set(client_name);
        }
        if let Some(groomed_by) = patch.groomed_by {
            active.groomed_by = Set(groomed_by);
        }
        if let Some(served_by) = patch.served_by {
            active.served_by = Set(served_by);
        }
        if let Some(recipient) = patch.recipient {
            active.recipient = Set(recipient);
        }
        if let Some(mpesa_ref) = patch.mpesa_ref {
            active.mpesa_ref = Set(mpesa_ref);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        let updated = active.update(&self.conn).await?;

        Ok(Some(Transaction::from(updated)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Transactions::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete transaction")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_with_users(&self) -> Result<Vec<TransactionWithUser>> {
        let rows = Transactions::find()
            .find_also_related(Users)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list transactions")?;

        Ok(rows
            .into_iter()
            .map(|(tx, user)| TransactionWithUser {
                transaction: Transaction::from(tx),
                user: user.map(User::from),
            })
            .collect())
    }

    /// Transactions created at or after `since`, oldest first. Feeds the
    /// daily stats and leaderboard aggregations.
    pub async fn list_since(&self, since: NaiveDateTime) -> Result<Vec<Transaction>> {
        let rows = Transactions::find()
            .filter(transactions::Column::CreatedAt.gte(since))
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list transactions since")?;

        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    pub async fn clients_served(&self) -> Result<Vec<ClientVisit>> {
        let rows = Transactions::find()
            .select_only()
            .columns([
                transactions::Column::CreatedAt,
                transactions::Column::ClientName,
                transactions::Column::ServedBy,
                transactions::Column::GroomedBy,
            ])
            .order_by_desc(transactions::Column::CreatedAt)
            .into_tuple::<(NaiveDateTime, Option<String>, String, String)>()
            .all(&self.conn)
            .await
            .context("Failed to list client visits")?;

        Ok(rows
            .into_iter()
            .map(|(created_at, client_name, served_by, groomed_by)| ClientVisit {
                created_at,
                client_name,
                served_by,
                groomed_by,
            })
            .collect())
    }
}
