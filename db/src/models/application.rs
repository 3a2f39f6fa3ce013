use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A student's application to an internship.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub internship_id: i64,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    /// Admin who approved or rejected the application.
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub cv_url: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "application_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "approved")]
    Approved,

    #[sea_orm(string_value = "rejected")]
    Rejected,

    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::internship::Entity",
        from = "Column::InternshipId",
        to = "super::internship::Column::Id"
    )]
    Internship,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::internship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Internship.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn find_for_student<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        internship_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::InternshipId.eq(internship_id))
            .one(db)
            .await
    }

    /// Inserts a `pending` application stamped with the current time.
    pub async fn create_pending<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        internship_id: i64,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            student_id: Set(student_id),
            internship_id: Set(internship_id),
            status: Set(ApplicationStatus::Pending),
            applied_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Deletes the student's application for `internship_id` only if it is
    /// still pending. Returns the number of rows removed.
    pub async fn delete_pending<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        internship_id: i64,
    ) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::InternshipId.eq(internship_id))
            .filter(Column::Status.eq(ApplicationStatus::Pending))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Records an admin decision on this application.
    pub async fn review<C: ConnectionTrait>(
        self,
        db: &C,
        status: ApplicationStatus,
        reviewer_id: i64,
    ) -> Result<Model, DbErr> {
        let mut active: ActiveModel = self.into();
        active.status = Set(status);
        active.reviewed_by = Set(Some(reviewer_id));
        active.reviewed_at = Set(Some(Utc::now()));
        active.update(db).await
    }

    /// A student's applications with their internships, newest first.
    pub async fn for_student_with_internship<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
    ) -> Result<Vec<(Model, Option<super::internship::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(super::internship::Entity)
            .order_by_desc(Column::AppliedAt)
            .all(db)
            .await
    }

    pub async fn count_with_status<C: ConnectionTrait>(
        db: &C,
        status: ApplicationStatus,
    ) -> Result<u64, DbErr> {
        Entity::find().filter(Column::Status.eq(status)).count(db).await
    }
}
