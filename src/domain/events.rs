//! Notification events broadcast to connected clients via SSE.
//!
//! Delivery is fire-and-forget: clients are expected to re-fetch
//! authoritative state rather than trust the event payload.

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A transaction was created, updated or deleted.
    TransactionsChanged,

    Info { message: String },

    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transactions_changed_wire_shape() {
        let json = serde_json::to_value(NotificationEvent::TransactionsChanged).unwrap();
        assert_eq!(json["type"], "transactions_changed");
    }
}
