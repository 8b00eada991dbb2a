use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::domain::DayType;
use crate::entities::{prelude::*, shifts};

use super::user::User;

/// Shift row. `clock_out == None` means the shift is still open.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: i32,
    pub user_id: i32,
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    pub is_late: bool,
    pub day_type: DayType,
}

impl Shift {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

impl From<shifts::Model> for Shift {
    fn from(model: shifts::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            clock_in: model.clock_in,
            clock_out: model.clock_out,
            is_late: model.is_late,
            day_type: DayType::parse(&model.day_type),
        }
    }
}

/// Shift joined with its owning user, for the attendance board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWithUser {
    #[serde(flatten)]
    pub shift: Shift,
    pub user: User,
}

pub struct ShiftRepository {
    conn: DatabaseConnection,
}

impl ShiftRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        user_id: i32,
        clock_in: NaiveDateTime,
        is_late: bool,
        day_type: DayType,
    ) -> Result<Shift> {
        let active = shifts::ActiveModel {
            user_id: Set(user_id),
            clock_in: Set(clock_in),
            clock_out: Set(None),
            is_late: Set(is_late),
            day_type: Set(day_type.as_str().to_string()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert shift")?;

        Ok(Shift::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Shift>> {
        let shift = Shifts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query shift by id")?;

        Ok(shift.map(Shift::from))
    }

    /// Most recent shift for the user with no clock-out, regardless of
    /// which day it was opened on. Staleness is the service's concern.
    pub async fn find_open(&self, user_id: i32) -> Result<Option<Shift>> {
        let shift = Shifts::find()
            .filter(shifts::Column::UserId.eq(user_id))
            .filter(shifts::Column::ClockOut.is_null())
            .order_by_desc(shifts::Column::ClockIn)
            .one(&self.conn)
            .await
            .context("Failed to query open shift")?;

        Ok(shift.map(Shift::from))
    }

    pub async fn set_clock_out(&self, id: i32, clock_out: NaiveDateTime) -> Result<Shift> {
        let shift = Shifts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query shift for clock-out")?
            .ok_or_else(|| anyhow::anyhow!("Shift {id} not found"))?;

        let mut active: shifts::ActiveModel = shift.into();
        active.clock_out = Set(Some(clock_out));
        let updated = active.update(&self.conn).await?;

        Ok(Shift::from(updated))
    }

    /// Admin correction path: overwrites whichever timestamps are given,
    /// with no ordering validation.
    pub async fn update_times(
        &self,
        id: i32,
        clock_in: Option<NaiveDateTime>,
        clock_out: Option<NaiveDateTime>,
    ) -> Result<Shift> {
        let shift = Shifts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query shift for update")?
            .ok_or_else(|| anyhow::anyhow!("Shift {id} not found"))?;

        let mut active: shifts::ActiveModel = shift.into();
        if let Some(ts) = clock_in {
            active.clock_in = Set(ts);
        }
        if let Some(ts) = clock_out {
            active.clock_out = Set(Some(ts));
        }
        let updated = active.update(&self.conn).await?;

        Ok(Shift::from(updated))
    }

    pub async fn list_with_users(&self) -> Result<Vec<ShiftWithUser>> {
        let rows = Shifts::find()
            .find_also_related(Users)
            .order_by_desc(shifts::Column::ClockIn)
            .all(&self.conn)
            .await
            .context("Failed to list shifts")?;

        Ok(rows
            .into_iter()
            .filter_map(|(shift, user)| {
                user.map(|u| ShiftWithUser {
                    shift: Shift::from(shift),
                    user: User::from(u),
                })
            })
            .collect())
    }

    /// Shifts whose clock-in falls on the given calendar day.
    pub async fn list_for_user_on(&self, user_id: i32, day: NaiveDate) -> Result<Vec<Shift>> {
        let start = day.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end = start + chrono::Duration::days(1);

        let rows = Shifts::find()
            .filter(shifts::Column::UserId.eq(user_id))
            .filter(shifts::Column::ClockIn.gte(start))
            .filter(shifts::Column::ClockIn.lt(end))
            .all(&self.conn)
            .await
            .context("Failed to list shifts for day")?;

        Ok(rows.into_iter().map(Shift::from).collect())
    }

    /// Closes every open shift clocked in between `start` and `target`
    /// inclusive, setting clock-out to `target`. Returns the row count.
    pub async fn close_open_between(
        &self,
        start: NaiveDateTime,
        target: NaiveDateTime,
    ) -> Result<u64> {
        let result = Shifts::update_many()
            .col_expr(shifts::Column::ClockOut, target.into())
            .filter(shifts::Column::ClockOut.is_null())
            .filter(shifts::Column::ClockIn.gte(start))
            .filter(shifts::Column::ClockIn.lte(target))
            .exec(&self.conn)
            .await
            .context("Failed to auto-close shifts")?;

        Ok(result.rows_affected)
    }
}
