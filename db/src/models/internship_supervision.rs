use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, Set};
use serde::Serialize;

/// Assignment of a mentor, and optionally a student, to an internship.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "internship_supervisions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub mentor_id: i64,
    pub internship_id: i64,
    pub student_id: Option<i64>,
    pub scope_notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::internship::Entity",
        from = "Column::InternshipId",
        to = "super::internship::Column::Id"
    )]
    Internship,

    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
}

impl Related<super::internship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Internship.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        mentor_id: i64,
        internship_id: i64,
        student_id: Option<i64>,
        scope_notes: Option<String>,
        active: bool,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            mentor_id: Set(mentor_id),
            internship_id: Set(internship_id),
            student_id: Set(student_id),
            scope_notes: Set(scope_notes),
            active: Set(active),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Supervisions run by `mentor_id`, newest first.
    pub async fn for_mentor<C: ConnectionTrait>(
        db: &C,
        mentor_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::MentorId.eq(mentor_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// Active supervisions for `student_id`, oldest first.
    pub async fn active_for_student<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Active.eq(true))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
