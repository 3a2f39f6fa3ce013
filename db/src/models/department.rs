use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{QueryFilter, QueryOrder, Set};
use serde::Serialize;

/// A department users can belong to.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique display name.
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// All departments ordered by name.
    pub async fn all_by_name<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Name).all(db).await
    }

    /// Case-insensitive lookup by name.
    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.trim().to_lowercase()))
            .one(db)
            .await
    }

    /// Returns the department with this name, creating it if needed.
    pub async fn find_or_create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, DbErr> {
        if let Some(existing) = Self::find_by_name(db, name).await? {
            return Ok(existing);
        }

        ActiveModel {
            name: Set(name.trim().to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
