use crate::entities::prelude::*;
use crate::entities::users;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default PIN handed to every seeded account. Meant to be changed by the
/// admin once the shop is set up.
const DEFAULT_PIN: &str = "123";

/// Initial roster: (display name, username, role).
const ROSTER: [(&str, &str, &str); 6] = [
    ("Ng'ash", "ngash", "staff"),
    ("Jay", "jay", "staff"),
    ("Samir", "samir", "staff"),
    ("Esther", "esther", "staff"),
    ("Cate", "cate", "staff"),
    ("Boss", "admin", "admin"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Shifts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Transactions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        for (name, username, role) in ROSTER {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Users)
                .columns([
                    users::Column::Username,
                    users::Column::Name,
                    users::Column::Role,
                    users::Column::Pin,
                    users::Column::Status,
                    users::Column::IsInactive,
                ])
                .values_panic([
                    username.into(),
                    name.into(),
                    role.into(),
                    DEFAULT_PIN.into(),
                    "active".into(),
                    false.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shifts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
