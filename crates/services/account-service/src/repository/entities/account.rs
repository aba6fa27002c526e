//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Account, AccountRole, DomainError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    /// Stored role code, see [`AccountRole::code`]
    pub role: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Account {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Account {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            role: AccountRole::try_from(model.role)?,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}
