use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An internship posting. Root of the removal cascade: supervisions,
/// applications and reports point at it directly, tasks via supervisions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "internships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Number of open positions.
    pub slots: i32,
    pub status: InternshipStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "internship_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InternshipStatus {
    #[sea_orm(string_value = "draft")]
    Draft,

    #[sea_orm(string_value = "open")]
    Open,

    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::internship_supervision::Entity")]
    Supervisions,

    #[sea_orm(has_many = "super::application::Entity")]
    Applications,

    #[sea_orm(has_many = "super::report::Entity")]
    Reports,
}

impl Related<super::internship_supervision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supervisions.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new internship.
#[derive(Debug, Clone, Default)]
pub struct NewInternship {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub slots: i32,
}

impl Model {
    /// Inserts an internship with status `open`.
    pub async fn create<C: ConnectionTrait>(db: &C, new: NewInternship) -> Result<Model, DbErr> {
        ActiveModel {
            title: Set(new.title),
            company: Set(new.company),
            location: Set(new.location),
            description: Set(new.description),
            requirements: Set(new.requirements),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            slots: Set(new.slots),
            status: Set(InternshipStatus::Open),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// All internships, newest first.
    pub async fn newest_first<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Newest internship with this exact title, optionally also matching company.
    pub async fn find_latest_by_title<C: ConnectionTrait>(
        db: &C,
        title: &str,
        company: Option<&str>,
    ) -> Result<Option<Model>, DbErr> {
        let mut query = Entity::find().filter(Column::Title.eq(title));
        if let Some(company) = company {
            query = query.filter(Column::Company.eq(company));
        }
        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(db)
            .await
    }
}
