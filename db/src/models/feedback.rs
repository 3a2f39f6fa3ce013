use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Mentor feedback, usually attached to a task submission.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub mentor_id: i64,
    pub task_submission_id: Option<i64>,
    pub rating: Option<FeedbackRating>,
    pub comment: Option<String>,
    pub suggestions: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "feedback_rating_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeedbackRating {
    #[sea_orm(string_value = "excellent")]
    Excellent,

    #[sea_orm(string_value = "good")]
    Good,

    #[sea_orm(string_value = "needs_improvement")]
    NeedsImprovement,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::task_submission::Entity",
        from = "Column::TaskSubmissionId",
        to = "super::task_submission::Column::Id"
    )]
    TaskSubmission,
}

impl Related<super::task_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskSubmission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
