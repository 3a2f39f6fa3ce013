use chrono::NaiveDate;
use db::models::internship::{ActiveModel, Entity, InternshipStatus, Model, NewInternship};
use db::models::internship_supervision;
use db::models::user::{self, Role};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, Set};
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{ServiceError, ServiceResult};
use crate::internship_removal::{self, RemovalOutcome};
use crate::retry::RetryPolicy;

/// Admin form for a new internship. Dates are `YYYY-MM-DD`; anything else is
/// stored as no date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInternship {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub slots: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    /// When set to an existing mentor, an active supervision is created too.
    pub mentor_id: Option<String>,
}

/// Admin edit. The target is `internship_id`, or failing that the newest
/// internship with a matching title (and company, if given).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInternship {
    pub internship_id: Option<i64>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub slots: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub status: Option<String>,
}

pub struct InternshipService;

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Parses `YYYY-MM-DD`, returning `None` for blanks and bad input.
pub fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    non_blank(value).and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())
}

fn parse_slots(value: &Option<String>) -> Option<i32> {
    non_blank(value).and_then(|v| v.parse::<i32>().ok()).filter(|n| *n >= 0)
}

impl InternshipService {
    pub async fn all(db: &DatabaseConnection) -> ServiceResult<Vec<Model>> {
        Ok(Model::newest_first(db).await?)
    }

    /// Creates an `open` internship, plus a supervision when a valid mentor
    /// is named, as one unit of work.
    pub async fn create(db: &DatabaseConnection, req: CreateInternship) -> ServiceResult<Model> {
        let (Some(title), Some(company)) = (non_blank(&req.title), non_blank(&req.company)) else {
            return Err(ServiceError::Validation(
                "Title and company are required.".into(),
            ));
        };

        let new = NewInternship {
            title,
            company,
            location: non_blank(&req.location),
            description: non_blank(&req.description),
            requirements: non_blank(&req.requirements),
            start_date: parse_date(&req.start_date),
            end_date: parse_date(&req.end_date),
            slots: parse_slots(&req.slots).unwrap_or(0),
        };
        let mentor_id = non_blank(&req.mentor_id).and_then(|m| m.parse::<i64>().ok());

        let created = RetryPolicy::from_config()
            .run(db, move |txn| Box::pin(Self::create_in(txn, new.clone(), mentor_id)))
            .await
            .map_err(|e| ServiceError::Storage(e.source))?;

        tracing::info!(internship_id = created.id, "internship created");
        Ok(created)
    }

    async fn create_in(
        txn: &DatabaseTransaction,
        new: NewInternship,
        mentor_id: Option<i64>,
    ) -> Result<Model, DbErr> {
        let created = Model::create(txn, new).await?;

        if let Some(mentor_id) = mentor_id {
            let mentor = user::Entity::find_by_id(mentor_id).one(txn).await?;
            match mentor {
                Some(m) if m.role == Role::Mentor => {
                    internship_supervision::Model::create(txn, m.id, created.id, None, None, true)
                        .await?;
                }
                _ => tracing::debug!(mentor_id, "ignoring unknown mentor for new internship"),
            }
        }
        Ok(created)
    }

    pub async fn update(db: &DatabaseConnection, req: UpdateInternship) -> ServiceResult<Model> {
        RetryPolicy::from_config()
            .run(db, move |txn| Box::pin(Self::update_in(txn, req.clone())))
            .await
            .map_err(|e| ServiceError::Storage(e.source))?
    }

    async fn update_in(
        txn: &DatabaseTransaction,
        req: UpdateInternship,
    ) -> Result<ServiceResult<Model>, DbErr> {
        let target = match req.internship_id {
            Some(id) => Entity::find_by_id(id).one(txn).await?,
            None => match non_blank(&req.title) {
                Some(title) => {
                    let company = non_blank(&req.company);
                    Model::find_latest_by_title(txn, &title, company.as_deref()).await?
                }
                None => None,
            },
        };
        let Some(current) = target else {
            return Ok(Err(ServiceError::NotFound("Internship not found".into())));
        };

        let mut active: ActiveModel = current.into();
        if let Some(title) = non_blank(&req.title) {
            active.title = Set(title);
        }
        if let Some(company) = non_blank(&req.company) {
            active.company = Set(company);
        }
        if let Some(location) = non_blank(&req.location) {
            active.location = Set(Some(location));
        }
        if let Some(description) = non_blank(&req.description) {
            active.description = Set(Some(description));
        }
        if let Some(requirements) = non_blank(&req.requirements) {
            active.requirements = Set(Some(requirements));
        }
        if let Some(date) = parse_date(&req.start_date) {
            active.start_date = Set(Some(date));
        }
        if let Some(date) = parse_date(&req.end_date) {
            active.end_date = Set(Some(date));
        }
        if let Some(slots) = parse_slots(&req.slots) {
            active.slots = Set(slots);
        }
        if let Some(status) =
            non_blank(&req.status).and_then(|s| InternshipStatus::from_str(&s).ok())
        {
            active.status = Set(status);
        }

        Ok(Ok(active.update(txn).await?))
    }

    /// Removes an internship and everything that hangs off it.
    pub async fn delete(db: &DatabaseConnection, internship_id: i64) -> RemovalOutcome {
        internship_removal::remove_internship(db, internship_id).await
    }
}
