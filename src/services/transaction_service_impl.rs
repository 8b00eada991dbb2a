//! `SeaORM` implementation of the [`TransactionService`] trait.

use async_trait::async_trait;
use chrono::Local;
use tokio::sync::broadcast;
use tracing::info;

use crate::db::{
    ClientVisit, NewTransaction, Store, Transaction, TransactionPatch, TransactionWithUser,
};
use crate::domain::events::NotificationEvent;
use crate::services::transaction_service::{TransactionError, TransactionService, validate_new};

pub struct SeaOrmTransactionService {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmTransactionService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, event_bus }
    }

    /// Fire-and-forget; a send error only means nobody is listening.
    fn notify(&self) {
        let _ = self.event_bus.send(NotificationEvent::TransactionsChanged);
    }
}

#[async_trait]
impl TransactionService for SeaOrmTransactionService {
    async fn create(&self, input: NewTransaction) -> Result<Transaction, TransactionError> {
        validate_new(&input)?;

        let created = self
            .store
            .insert_transaction(input, Local::now().naive_local())
            .await?;
        info!(
            id = created.id,
            kind = %created.kind,
            amount = created.amount,
            "Transaction logged"
        );

        self.notify();
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> Result<Transaction, TransactionError> {
        let updated = self
            .store
            .update_transaction(id, patch)
            .await?
            .ok_or(TransactionError::NotFound)?;

        self.notify();
        Ok(updated)
    }

    async fn delete(&self, id: i32, actor_id: i32) -> Result<i32, TransactionError> {
        let actor = self.store.get_user(actor_id).await?;
        if !actor.is_some_and(|a| a.role.is_admin()) {
            return Err(TransactionError::Forbidden(
                "Only admin can delete transactions".to_string(),
            ));
        }

        if !self.store.delete_transaction(id).await? {
            return Err(TransactionError::NotFound);
        }
        info!(id, actor_id, "Transaction deleted");

        self.notify();
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<TransactionWithUser>, TransactionError> {
        Ok(self.store.list_transactions_with_users().await?)
    }

    async fn clients_served(&self) -> Result<Vec<ClientVisit>, TransactionError> {
        Ok(self.store.list_clients_served().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;

    async fn setup() -> (Store, SeaOrmTransactionService, broadcast::Receiver<NotificationEvent>)
    {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store");
        let (tx, rx) = broadcast::channel(16);
        let svc = SeaOrmTransactionService::new(store.clone(), tx);
        (store, svc, rx)
    }

    fn cash(amount: f64) -> NewTransaction {
        NewTransaction {
            user_id: 1,
            kind: TransactionKind::Cash,
            amount,
            client_name: None,
            groomed_by: "Jay".to_string(),
            served_by: "Samir".to_string(),
            recipient: None,
            mpesa_ref: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn create_appends_and_notifies() {
        let (_store, svc, mut rx) = setup().await;

        let created = svc.create(cash(250.0)).await.unwrap();
        assert_eq!(created.amount, 250.0);

        let event = rx.try_recv().unwrap();
        assert!(matches!(event, NotificationEvent::TransactionsChanged));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_notifying() {
        let (_store, svc, mut rx) = setup().await;

        let err = svc.create(cash(-5.0)).await.unwrap_err();
        assert!(matches!(err, TransactionError::Validation(_)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn delete_is_admin_only_and_permanent() {
        let (store, svc, _rx) = setup().await;
        let created = svc.create(cash(100.0)).await.unwrap();

        // Staff actor (seeded id 1) is refused and the record survives.
        let err = svc.delete(created.id, 1).await.unwrap_err();
        assert!(matches!(err, TransactionError::Forbidden(_)));
        assert!(store.get_transaction(created.id).await.unwrap().is_some());

        // Seeded admin id 6.
        let deleted = svc.delete(created.id, 6).await.unwrap();
        assert_eq!(deleted, created.id);
        assert!(store.get_transaction(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let (_store, svc, _rx) = setup().await;
        let created = svc.create(cash(100.0)).await.unwrap();

        let patch = TransactionPatch {
            amount: Some(150.0),
            description: Some(Some("tip included".to_string())),
            ..Default::default()
        };
        let updated = svc.update(created.id, patch).await.unwrap();

        assert_eq!(updated.amount, 150.0);
        assert_eq!(updated.description.as_deref(), Some("tip included"));
        // Untouched fields survive.
        assert_eq!(updated.groomed_by, "Jay");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_store, svc, _rx) = setup().await;
        let err = svc
            .update(404, TransactionPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TransactionError::NotFound));
    }
}
