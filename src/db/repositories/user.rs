use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;

use crate::domain::{Role, UserStatus};
use crate::entities::{prelude::*, users};

/// User row as the rest of the crate sees it.
///
/// The PIN stays here (the attendance engine compares it) but is skipped
/// during serialization so it never leaks into a response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub pin: Option<String>,
    pub status: UserStatus,
    pub is_inactive: bool,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            role: Role::parse(&model.role),
            pin: model.pin,
            status: UserStatus::parse(&model.status),
            is_inactive: model.is_inactive,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = Users::find()
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Overwrites the attendance pair (status, `is_inactive`) on one user.
    pub async fn set_attendance(
        &self,
        id: i32,
        status: UserStatus,
        is_inactive: bool,
    ) -> Result<User> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for attendance update")?
            .ok_or_else(|| anyhow::anyhow!("User {id} not found"))?;

        let mut active: users::ActiveModel = user.into();
        active.status = Set(status.as_str().to_string());
        active.is_inactive = Set(is_inactive);
        let updated = active.update(&self.conn).await?;

        Ok(User::from(updated))
    }

    /// Midnight sweep: every suspended or inactive user goes back to
    /// active. Returns the number of rows touched.
    pub async fn reset_inactive(&self) -> Result<u64> {
        let result = Users::update_many()
            .col_expr(users::Column::Status, UserStatus::Active.as_str().into())
            .col_expr(users::Column::IsInactive, false.into())
            .filter(
                Condition::any()
                    .add(users::Column::IsInactive.eq(true))
                    .add(users::Column::Status.eq(UserStatus::Suspended.as_str())),
            )
            .exec(&self.conn)
            .await
            .context("Failed to reset inactive users")?;

        Ok(result.rows_affected)
    }
}
