//! `SeaORM` implementation of the [`AttendanceService`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use tracing::info;

use crate::db::{Store, User};
use crate::domain::UserStatus;
use crate::services::attendance_service::{
    AttendanceError, AttendanceService, evaluate_staff_login, short_both_days,
};
use crate::services::shift_service::ShiftService;

pub struct SeaOrmAttendanceService {
    store: Store,
    shifts: Arc<dyn ShiftService>,
}

impl SeaOrmAttendanceService {
    #[must_use]
    pub fn new(store: Store, shifts: Arc<dyn ShiftService>) -> Self {
        Self { store, shifts }
    }

    /// Total closed worked duration for the user's shifts clocking in on
    /// `day`. Shifts never closed count as zero.
    async fn worked_on(&self, user_id: i32, day: NaiveDate) -> Result<Duration, AttendanceError> {
        let shifts = self.store.list_shifts_for_user_on(user_id, day).await?;

        Ok(shifts
            .iter()
            .filter_map(|s| s.clock_out.map(|out| out - s.clock_in))
            .fold(Duration::zero(), |acc, d| acc + d))
    }

    async fn require_admin(&self, actor_id: i32, action: &str) -> Result<(), AttendanceError> {
        let actor = self.store.get_user(actor_id).await?;
        match actor {
            Some(a) if a.role.is_admin() => Ok(()),
            _ => Err(AttendanceError::Forbidden(format!(
                "Only admin can {action} users."
            ))),
        }
    }
}

#[async_trait]
impl AttendanceService for SeaOrmAttendanceService {
    async fn login(&self, username: &str, pin: Option<&str>) -> Result<User, AttendanceError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AttendanceError::UnknownUser)?;

        if let Some(stored) = user.pin.as_deref()
            && pin != Some(stored)
        {
            return Err(AttendanceError::InvalidPin);
        }

        if user.role.is_admin() {
            return Ok(user);
        }

        let now = Local::now().naive_local();
        let active = self
            .shifts
            .active_shift(user.id)
            .await
            .map_err(|e| AttendanceError::Database(e.to_string()))?;
        let ended_today = self
            .store
            .list_shifts_for_user_on(user.id, now.date())
            .await?
            .iter()
            .any(|s| s.clock_out.is_some());

        evaluate_staff_login(&user, active.is_some(), ended_today, now)
            .map_err(AttendanceError::Blocked)?;

        Ok(user)
    }

    async fn suspend(&self, target_id: i32, by_admin_id: i32) -> Result<User, AttendanceError> {
        self.require_admin(by_admin_id, "suspend").await?;

        let user = self
            .store
            .set_user_attendance(target_id, UserStatus::Suspended, true)
            .await?;
        info!(target_id, by_admin_id, "User suspended");

        Ok(user)
    }

    async fn recall(&self, target_id: i32, by_admin_id: i32) -> Result<User, AttendanceError> {
        self.require_admin(by_admin_id, "recall").await?;

        let user = self
            .store
            .set_user_attendance(target_id, UserStatus::Active, false)
            .await?;
        info!(target_id, by_admin_id, "User recalled");

        Ok(user)
    }

    async fn flag_short_days(&self, user_id: i32) -> Result<bool, AttendanceError> {
        let Some(user) = self.store.get_user(user_id).await? else {
            return Err(AttendanceError::UnknownUser);
        };

        let today = Local::now().naive_local().date();
        let yesterday = self.worked_on(user_id, today - Duration::days(1)).await?;
        let day_before = self.worked_on(user_id, today - Duration::days(2)).await?;

        if !short_both_days(user.role, day_before, yesterday) {
            return Ok(false);
        }

        self.store
            .set_user_attendance(user_id, UserStatus::Away, true)
            .await?;
        info!(
            user_id,
            "Flagged away after two short days ({} / {} worked)",
            day_before.num_minutes(),
            yesterday.num_minutes()
        );

        Ok(true)
    }

    async fn reset_inactive(&self) -> Result<u64, AttendanceError> {
        let count = self.store.reset_inactive_users().await?;
        if count > 0 {
            info!(count, "Reset inactive users to active");
        }

        Ok(count)
    }
}
