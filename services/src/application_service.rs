use db::models::application::{ApplicationStatus, Entity, Model};
use db::models::internship;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::error::{ServiceError, ServiceResult};

/// What a student-facing write actually did.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied(Model),
    AlreadyApplied(Model),
}

/// Result of an admin decision on an application.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome {
    Reviewed(Model),
    /// The application had already left `pending`; nothing changed.
    Unchanged(Model),
}

pub struct ApplicationService;

impl ApplicationService {
    /// Applies for an internship. A second application by the same student
    /// is a no-op.
    pub async fn apply(
        db: &DatabaseConnection,
        student_id: i64,
        internship_id: i64,
    ) -> ServiceResult<ApplyOutcome> {
        if internship::Entity::find_by_id(internship_id).one(db).await?.is_none() {
            return Err(ServiceError::NotFound("Internship not found".into()));
        }

        if let Some(existing) = Model::find_for_student(db, student_id, internship_id).await? {
            return Ok(ApplyOutcome::AlreadyApplied(existing));
        }

        let created = Model::create_pending(db, student_id, internship_id).await?;
        tracing::info!(student_id, internship_id, application_id = created.id, "application submitted");
        Ok(ApplyOutcome::Applied(created))
    }

    /// Withdraws a pending application. Returns whether anything was removed.
    pub async fn withdraw(
        db: &DatabaseConnection,
        student_id: i64,
        internship_id: i64,
    ) -> ServiceResult<bool> {
        let removed = Model::delete_pending(db, student_id, internship_id).await?;
        if removed > 0 {
            tracing::info!(student_id, internship_id, "application withdrawn");
        }
        Ok(removed > 0)
    }

    pub async fn approve(
        db: &DatabaseConnection,
        application_id: i64,
        reviewer_id: i64,
    ) -> ServiceResult<ReviewOutcome> {
        Self::review(db, application_id, reviewer_id, ApplicationStatus::Approved).await
    }

    pub async fn reject(
        db: &DatabaseConnection,
        application_id: i64,
        reviewer_id: i64,
    ) -> ServiceResult<ReviewOutcome> {
        Self::review(db, application_id, reviewer_id, ApplicationStatus::Rejected).await
    }

    async fn review(
        db: &DatabaseConnection,
        application_id: i64,
        reviewer_id: i64,
        decision: ApplicationStatus,
    ) -> ServiceResult<ReviewOutcome> {
        let application = Entity::find_by_id(application_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Application not found".into()))?;

        if application.status != ApplicationStatus::Pending {
            return Ok(ReviewOutcome::Unchanged(application));
        }

        let reviewed = application.review(db, decision, reviewer_id).await?;
        tracing::info!(application_id, reviewer_id, status = %decision, "application reviewed");
        Ok(ReviewOutcome::Reviewed(reviewed))
    }
}
