//! Attendance policy engine: login gating, suspension and recall.
//!
//! The decision logic is kept pure (`evaluate_staff_login`,
//! `short_both_days`) so the clock can be pinned in tests; the SeaORM
//! implementation only gathers the inputs.

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::calendar;
use crate::db::User;
use crate::domain::{Role, UserStatus};

/// Minimum total worked duration per day before a day counts as "short".
pub const SHORT_DAY_LIMIT: Duration = Duration::hours(11);

/// Why a staff login was refused by policy. Each variant renders the
/// message shown on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginBlock {
    #[error("Staff login opens at 7:00 AM.")]
    OutsideHours,

    #[error("You have been suspended for today. Please rest and return tomorrow.")]
    Suspended,

    #[error("You should be resting today. Please come early tomorrow.")]
    RestDay,

    #[error("Your shift has ended. Please return tomorrow.")]
    ShiftEnded,
}

/// Errors specific to attendance operations.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("User not found")]
    UnknownUser,

    #[error("Invalid PIN")]
    InvalidPin,

    #[error("{0}")]
    Blocked(LoginBlock),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AttendanceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Pure staff login gate. `has_active_shift` and `ended_shift_today`
/// describe today's shift history; `now` is local wall-clock time.
/// Admins never reach this function.
pub fn evaluate_staff_login(
    user: &User,
    has_active_shift: bool,
    ended_shift_today: bool,
    now: NaiveDateTime,
) -> Result<(), LoginBlock> {
    if !calendar::login_is_open(now) {
        return Err(LoginBlock::OutsideHours);
    }
    if user.status == UserStatus::Suspended {
        return Err(LoginBlock::Suspended);
    }
    if user.is_inactive && user.status == UserStatus::Away {
        return Err(LoginBlock::RestDay);
    }
    // One shift per day: no active shift plus an already-closed shift
    // from today means the working day is over.
    if !has_active_shift && ended_shift_today {
        return Err(LoginBlock::ShiftEnded);
    }
    Ok(())
}

/// Whether two consecutive daily totals both fall under the short-day
/// limit, which triggers the automatic rest flag for staff.
#[must_use]
pub fn short_both_days(role: Role, day_before: Duration, yesterday: Duration) -> bool {
    role == Role::Staff && day_before < SHORT_DAY_LIMIT && yesterday < SHORT_DAY_LIMIT
}

/// Domain service trait for attendance policy.
#[async_trait::async_trait]
pub trait AttendanceService: Send + Sync {
    /// Verifies credentials and applies the staff login gates.
    ///
    /// # Errors
    ///
    /// [`AttendanceError::UnknownUser`] / [`AttendanceError::InvalidPin`]
    /// for bad credentials, [`AttendanceError::Blocked`] when a policy
    /// gate refuses the login.
    async fn login(&self, username: &str, pin: Option<&str>) -> Result<User, AttendanceError>;

    /// Admin-only: marks the target suspended until recalled or reset.
    async fn suspend(&self, target_id: i32, by_admin_id: i32) -> Result<User, AttendanceError>;

    /// Admin-only: clears the block states back to active.
    async fn recall(&self, target_id: i32, by_admin_id: i32) -> Result<User, AttendanceError>;

    /// Retroactive short-day check, run after each fresh clock-in.
    /// Returns true when the user was flagged away.
    async fn flag_short_days(&self, user_id: i32) -> Result<bool, AttendanceError>;

    /// Midnight sweep: all block states back to active. Returns the
    /// number of users touched.
    async fn reset_inactive(&self) -> Result<u64, AttendanceError>;
}
