//! `SeaORM` implementation of the [`ShiftService`] trait.

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::calendar;
use crate::db::{Shift, ShiftWithUser, Store};
use crate::services::shift_service::{ClockInOutcome, ShiftError, ShiftService};

pub struct SeaOrmShiftService {
    store: Store,
}

impl SeaOrmShiftService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn end_of_day(date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default())
    }

    /// Shared by `active_shift` and `clock_in`: resolves the open shift,
    /// closing it first if it was left open on a prior day.
    async fn resolve_open_shift(&self, user_id: i32) -> Result<Option<Shift>, ShiftError> {
        let Some(shift) = self.store.find_open_shift(user_id).await? else {
            return Ok(None);
        };

        let today = Self::now().date();
        if shift.clock_in.date() != today {
            let close_at = Self::end_of_day(shift.clock_in.date());
            self.store.set_shift_clock_out(shift.id, close_at).await?;
            info!(
                shift_id = shift.id,
                user_id, "Auto-closed stale shift from {}", shift.clock_in.date()
            );
            return Ok(None);
        }

        Ok(Some(shift))
    }
}

#[async_trait]
impl ShiftService for SeaOrmShiftService {
    async fn active_shift(&self, user_id: i32) -> Result<Option<Shift>, ShiftError> {
        self.resolve_open_shift(user_id).await
    }

    async fn clock_in(&self, user_id: i32) -> Result<ClockInOutcome, ShiftError> {
        if let Some(shift) = self.resolve_open_shift(user_id).await? {
            return Ok(ClockInOutcome {
                shift,
                created: false,
            });
        }

        let now = Self::now();
        let is_late = calendar::is_late_arrival(now);
        let day_type = calendar::day_type(now);

        let shift = self
            .store
            .insert_shift(user_id, now, is_late, day_type)
            .await?;
        info!(
            shift_id = shift.id,
            user_id,
            is_late,
            day_type = %day_type,
            "Clocked in"
        );

        Ok(ClockInOutcome {
            shift,
            created: true,
        })
    }

    async fn clock_out(&self, shift_id: i32, actor_id: i32) -> Result<Shift, ShiftError> {
        let actor = self
            .store
            .get_user(actor_id)
            .await?
            .ok_or_else(|| ShiftError::Forbidden("Unauthorized".to_string()))?;

        let shift = self
            .store
            .get_shift(shift_id)
            .await?
            .ok_or(ShiftError::NotFound)?;

        if shift.user_id != actor.id && !actor.role.is_admin() {
            return Err(ShiftError::Forbidden(
                "Only the owner or admin can end this shift".to_string(),
            ));
        }

        if !shift.is_open() {
            return Err(ShiftError::AlreadyClosed);
        }

        let closed = self
            .store
            .set_shift_clock_out(shift_id, Self::now())
            .await?;
        info!(shift_id, actor_id, "Clocked out");

        Ok(closed)
    }

    async fn update_times(
        &self,
        id: i32,
        clock_in: Option<NaiveDateTime>,
        clock_out: Option<NaiveDateTime>,
    ) -> Result<Shift, ShiftError> {
        if self.store.get_shift(id).await?.is_none() {
            return Err(ShiftError::NotFound);
        }

        let shift = self.store.update_shift_times(id, clock_in, clock_out).await?;
        Ok(shift)
    }

    async fn list(&self) -> Result<Vec<ShiftWithUser>, ShiftError> {
        Ok(self.store.list_shifts_with_users().await?)
    }

    async fn auto_close_for_date(&self, date: NaiveDate) -> Result<u64, ShiftError> {
        let start = date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default());
        let target = date.and_time(NaiveTime::from_hms_opt(23, 0, 0).unwrap_or_default());

        let closed = self.store.close_open_shifts_between(start, target).await?;
        if closed > 0 {
            info!(count = closed, %date, "Auto-closed open shifts for date");
        }

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayType;
    use chrono::Duration;

    async fn store() -> Store {
        // Single connection so the in-memory database is shared.
        Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store")
    }

    fn service(store: &Store) -> SeaOrmShiftService {
        SeaOrmShiftService::new(store.clone())
    }

    #[tokio::test]
    async fn clock_in_is_idempotent_while_open() {
        let store = store().await;
        let svc = service(&store);

        let first = svc.clock_in(1).await.unwrap();
        assert!(first.created);

        let second = svc.clock_in(1).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.shift.id, first.shift.id);

        // Exactly one open shift.
        let open = store.find_open_shift(1).await.unwrap();
        assert_eq!(open.map(|s| s.id), Some(first.shift.id));
    }

    #[tokio::test]
    async fn stale_open_shift_heals_to_end_of_its_day() {
        let store = store().await;
        let svc = service(&store);

        let yesterday = Local::now().naive_local() - Duration::days(1);
        let stale = store
            .insert_shift(1, yesterday, false, DayType::Weekday)
            .await
            .unwrap();

        let active = svc.active_shift(1).await.unwrap();
        assert!(active.is_none());

        let healed = store.get_shift(stale.id).await.unwrap().unwrap();
        let expected = SeaOrmShiftService::end_of_day(yesterday.date());
        assert_eq!(healed.clock_out, Some(expected));
    }

    #[tokio::test]
    async fn clock_out_requires_owner_or_admin() {
        let store = store().await;
        let svc = service(&store);

        // Seeded roster: user 2 is staff "jay", user 6 is the admin.
        let opened = svc.clock_in(2).await.unwrap();

        // Another staff member may not close it.
        let err = svc.clock_out(opened.shift.id, 3).await.unwrap_err();
        assert!(matches!(err, ShiftError::Forbidden(_)));

        // The admin may.
        let closed = svc.clock_out(opened.shift.id, 6).await.unwrap();
        assert!(closed.clock_out.is_some());

        // And a second close fails.
        let err = svc.clock_out(opened.shift.id, 6).await.unwrap_err();
        assert!(matches!(err, ShiftError::AlreadyClosed));
    }

    #[tokio::test]
    async fn clock_out_unknown_shift_is_not_found() {
        let store = store().await;
        let svc = service(&store);

        let err = svc.clock_out(999, 6).await.unwrap_err();
        assert!(matches!(err, ShiftError::NotFound));
    }

    #[tokio::test]
    async fn auto_close_sweeps_only_the_given_date() {
        let store = store().await;
        let svc = service(&store);

        let yesterday = (Local::now().naive_local() - Duration::days(1)).date();
        let morning = yesterday.and_hms_opt(8, 5, 0).unwrap();
        store
            .insert_shift(1, morning, false, DayType::Weekday)
            .await
            .unwrap();

        // Today's open shift must survive the sweep.
        let today_shift = svc.clock_in(2).await.unwrap();

        let closed = svc.auto_close_for_date(yesterday).await.unwrap();
        assert_eq!(closed, 1);

        let swept = store.find_open_shift(1).await.unwrap();
        assert!(swept.is_none());
        let open = store.find_open_shift(2).await.unwrap();
        assert_eq!(open.map(|s| s.id), Some(today_shift.shift.id));

        // Closed at 23:00 of the swept date.
        let all = store.list_shifts_for_user_on(1, yesterday).await.unwrap();
        assert_eq!(
            all[0].clock_out,
            Some(yesterday.and_hms_opt(23, 0, 0).unwrap())
        );
    }
}
