use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// User who logged the transaction.
    pub user_id: i32,

    /// "cash", "mpesa" or "withdrawal".
    pub kind: String,

    pub amount: f64,

    pub client_name: Option<String>,

    pub groomed_by: String,

    pub served_by: String,

    /// Who physically handled the money (mpesa/withdrawal).
    pub recipient: Option<String>,

    pub mpesa_ref: Option<String>,

    pub description: Option<String>,

    /// Local wall-clock time; defines which day the transaction belongs to.
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
