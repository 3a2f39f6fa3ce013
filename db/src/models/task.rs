use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A unit of work assigned to a student, linked to an internship through its
/// supervision.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub supervision_id: Option<i64>,
    pub student_id: i64,
    /// Mentor (or admin) who set the task.
    pub assigned_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub feedback: Option<String>,
    pub rating: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_status_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TaskStatus {
    #[sea_orm(string_value = "assigned")]
    Assigned,

    #[sea_orm(string_value = "in_progress")]
    InProgress,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "overdue")]
    Overdue,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::internship_supervision::Entity",
        from = "Column::SupervisionId",
        to = "super::internship_supervision::Column::Id"
    )]
    Supervision,

    #[sea_orm(has_many = "super::task_submission::Entity")]
    Submissions,
}

impl Related<super::internship_supervision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supervision.def()
    }
}

impl Related<super::task_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub supervision_id: Option<i64>,
    pub student_id: i64,
    pub assigned_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl Model {
    /// Inserts a task in the `assigned` state.
    pub async fn create<C: ConnectionTrait>(db: &C, new: NewTask) -> Result<Model, DbErr> {
        ActiveModel {
            supervision_id: Set(new.supervision_id),
            student_id: Set(new.student_id),
            assigned_by: Set(new.assigned_by),
            title: Set(new.title),
            description: Set(new.description),
            due_date: Set(new.due_date),
            status: Set(TaskStatus::Assigned),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn assigned_by<C: ConnectionTrait>(
        db: &C,
        assigner_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::AssignedBy.eq(assigner_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn newest_first<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }
}
