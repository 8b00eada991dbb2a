//! Shift ledger: open/close lifecycle, stale-shift healing, daily sweep.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::db::{Shift, ShiftWithUser};

#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("Shift not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Shift is already closed")]
    AlreadyClosed,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ShiftError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result of a clock-in attempt. `created` distinguishes a fresh shift
/// (201) from the idempotent return of an already-open one (200).
#[derive(Debug, Clone)]
pub struct ClockInOutcome {
    pub shift: Shift,
    pub created: bool,
}

/// Domain service trait for the shift ledger.
#[async_trait::async_trait]
pub trait ShiftService: Send + Sync {
    /// The user's open shift for today, if any.
    ///
    /// Self-healing: an open shift left over from a prior day is closed
    /// at 23:59:59.999 of its own day (persisted before returning) and
    /// reported as absent.
    async fn active_shift(&self, user_id: i32) -> Result<Option<Shift>, ShiftError>;

    /// Opens a shift for the user, or returns the existing open one
    /// unchanged. Lateness and day type come from the shop calendar at
    /// the moment of the call.
    async fn clock_in(&self, user_id: i32) -> Result<ClockInOutcome, ShiftError>;

    /// Closes a shift. Only the shift's owner or an admin may do so;
    /// closing an already-closed shift fails with
    /// [`ShiftError::AlreadyClosed`].
    async fn clock_out(&self, shift_id: i32, actor_id: i32) -> Result<Shift, ShiftError>;

    /// Correction path: overwrites the given timestamps with no policy
    /// or ordering checks. Sits behind the admin UI.
    async fn update_times(
        &self,
        id: i32,
        clock_in: Option<NaiveDateTime>,
        clock_out: Option<NaiveDateTime>,
    ) -> Result<Shift, ShiftError>;

    /// All shifts newest-first, joined with their owning user.
    async fn list(&self) -> Result<Vec<ShiftWithUser>, ShiftError>;

    /// Daily sweep: closes every open shift clocked in on `date`,
    /// setting clock-out to 23:00 of that date. Returns the count.
    async fn auto_close_for_date(&self, date: NaiveDate) -> Result<u64, ShiftError>;
}
