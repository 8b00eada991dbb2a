//! Transaction ledger: append, edit, delete, and the client service log.

use thiserror::Error;

use crate::db::{ClientVisit, NewTransaction, Transaction, TransactionPatch, TransactionWithUser};

#[derive(Debug, Error)]
pub enum TransactionError {
    /// Names the first violated field.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Transaction not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for TransactionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Checks a new transaction, reporting the first violated field in the
/// order the entry form presents them.
pub fn validate_new(input: &NewTransaction) -> Result<(), TransactionError> {
    if !input.amount.is_finite() || input.amount < 0.0 {
        return Err(TransactionError::Validation(
            "amount must be a non-negative number".to_string(),
        ));
    }
    if input.groomed_by.trim().is_empty() {
        return Err(TransactionError::Validation(
            "groomedBy is required".to_string(),
        ));
    }
    if input.served_by.trim().is_empty() {
        return Err(TransactionError::Validation(
            "servedBy is required".to_string(),
        ));
    }
    if input.kind.requires_recipient()
        && input
            .recipient
            .as_deref()
            .is_none_or(|r| r.trim().is_empty())
    {
        return Err(TransactionError::Validation(format!(
            "recipient is required for {} transactions",
            input.kind
        )));
    }
    Ok(())
}

/// Domain service trait for the transaction ledger.
#[async_trait::async_trait]
pub trait TransactionService: Send + Sync {
    /// Validates and appends a transaction, then broadcasts
    /// `transactions_changed`.
    async fn create(&self, input: NewTransaction) -> Result<Transaction, TransactionError>;

    /// Merges the given fields into an existing record. Edited values
    /// are not re-validated (matching the entry form's behaviour).
    async fn update(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> Result<Transaction, TransactionError>;

    /// Admin-only permanent delete. Returns the deleted id.
    async fn delete(&self, id: i32, actor_id: i32) -> Result<i32, TransactionError>;

    /// All transactions newest-first with the logging user joined in.
    async fn list(&self) -> Result<Vec<TransactionWithUser>, TransactionError>;

    /// Newest-first log of who was groomed and served, for the activity
    /// page.
    async fn clients_served(&self) -> Result<Vec<ClientVisit>, TransactionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;

    fn input(kind: TransactionKind) -> NewTransaction {
        NewTransaction {
            user_id: 1,
            kind,
            amount: 500.0,
            client_name: Some("Wekesa".to_string()),
            groomed_by: "Jay".to_string(),
            served_by: "Samir".to_string(),
            recipient: Some("Jay".to_string()),
            mpesa_ref: None,
            description: None,
        }
    }

    #[test]
    fn accepts_a_complete_record() {
        assert!(validate_new(&input(TransactionKind::Cash)).is_ok());
        assert!(validate_new(&input(TransactionKind::Mpesa)).is_ok());
    }

    #[test]
    fn amount_is_checked_first() {
        let mut bad = input(TransactionKind::Mpesa);
        bad.amount = -1.0;
        bad.groomed_by = String::new();
        let err = validate_new(&bad).unwrap_err();
        assert!(err.to_string().starts_with("amount"));

        bad.amount = f64::NAN;
        let err = validate_new(&bad).unwrap_err();
        assert!(err.to_string().starts_with("amount"));
    }

    #[test]
    fn staff_names_are_required() {
        let mut bad = input(TransactionKind::Cash);
        bad.groomed_by = "  ".to_string();
        let err = validate_new(&bad).unwrap_err();
        assert!(err.to_string().starts_with("groomedBy"));

        let mut bad = input(TransactionKind::Cash);
        bad.served_by = String::new();
        let err = validate_new(&bad).unwrap_err();
        assert!(err.to_string().starts_with("servedBy"));
    }

    #[test]
    fn recipient_required_only_for_money_movement() {
        let mut cash = input(TransactionKind::Cash);
        cash.recipient = None;
        assert!(validate_new(&cash).is_ok());

        for kind in [TransactionKind::Mpesa, TransactionKind::Withdrawal] {
            let mut bad = input(kind);
            bad.recipient = None;
            let err = validate_new(&bad).unwrap_err();
            assert!(err.to_string().starts_with("recipient"));
        }
    }
}
