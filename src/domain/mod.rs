//! Domain types shared across the shift and transaction subsystems.
//!
//! Enums are stored as lowercase text in SQLite, so each one carries
//! explicit string conversions rather than relying on derive magic.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s == "admin" { Self::Admin } else { Self::Staff }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendance status of a user.
///
/// `Active` is the only state permitting staff login. `Suspended` and
/// `Away` (together with the `is_inactive` flag) are the block states
/// managed by the attendance policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Away,
    Suspended,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Away => "away",
            Self::Suspended => "suspended",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "away" => Self::Away,
            "suspended" => Self::Suspended,
            _ => Self::Active,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored day category of a shift.
///
/// Holidays are folded into `Weekend` for storage purposes; only the two
/// variants below ever reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s == "weekend" { Self::Weekend } else { Self::Weekday }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a monetary transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Cash,
    Mpesa,
    Withdrawal,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Mpesa => "mpesa",
            Self::Withdrawal => "withdrawal",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(Self::Cash),
            "mpesa" => Some(Self::Mpesa),
            "withdrawal" => Some(Self::Withdrawal),
            _ => None,
        }
    }

    /// Whether this kind requires a `recipient` (who physically handled
    /// the money).
    #[must_use]
    pub const fn requires_recipient(&self) -> bool {
        matches!(self, Self::Mpesa | Self::Withdrawal)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("staff"), Role::Staff);
        assert_eq!(Role::parse("anything-else"), Role::Staff);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!(Role::Admin.is_admin());
        assert!(!Role::Staff.is_admin());
    }

    #[test]
    fn status_parse_defaults_to_active() {
        assert_eq!(UserStatus::parse("away"), UserStatus::Away);
        assert_eq!(UserStatus::parse("suspended"), UserStatus::Suspended);
        assert_eq!(UserStatus::parse(""), UserStatus::Active);
    }

    #[test]
    fn transaction_kind_recipient_rule() {
        assert!(TransactionKind::Mpesa.requires_recipient());
        assert!(TransactionKind::Withdrawal.requires_recipient());
        assert!(!TransactionKind::Cash.requires_recipient());
        assert_eq!(TransactionKind::parse("unknown"), None);
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Mpesa).unwrap(),
            "\"mpesa\""
        );
        let kind: TransactionKind = serde_json::from_str("\"withdrawal\"").unwrap();
        assert_eq!(kind, TransactionKind::Withdrawal);
    }
}
