use chrono::NaiveDate;
use db::models::internship_supervision;
use db::models::task::{Entity, Model, NewTask};
use db::models::user;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};

/// Admin form for assigning a task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub mentor_id: i64,
    pub student_id: i64,
    pub supervision_id: Option<i64>,
    /// `YYYY-MM-DD`.
    pub deadline: Option<String>,
    pub description: Option<String>,
}

pub struct TaskService;

impl TaskService {
    pub async fn create(db: &DatabaseConnection, req: CreateTask) -> ServiceResult<Model> {
        req.validate()?;

        let due_date = match req.deadline.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ServiceError::Validation("Deadline must be a date in YYYY-MM-DD format".into())
            })?),
            None => None,
        };

        for (id, what) in [(req.mentor_id, "mentor"), (req.student_id, "student")] {
            if user::Entity::find_by_id(id).one(db).await?.is_none() {
                return Err(ServiceError::Validation(format!("Unknown {what}")));
            }
        }
        if let Some(supervision_id) = req.supervision_id {
            if internship_supervision::Entity::find_by_id(supervision_id)
                .one(db)
                .await?
                .is_none()
            {
                return Err(ServiceError::Validation("Unknown supervision".into()));
            }
        }

        let created = Model::create(
            db,
            NewTask {
                supervision_id: req.supervision_id,
                student_id: req.student_id,
                assigned_by: req.mentor_id,
                title: req.title.trim().to_owned(),
                description: req
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_owned),
                due_date,
            },
        )
        .await?;
        tracing::info!(task_id = created.id, student_id = created.student_id, "task assigned");
        Ok(created)
    }

    /// Deletes a task. Its submissions, and their feedback, go with it.
    pub async fn delete(db: &DatabaseConnection, task_id: i64) -> ServiceResult<()> {
        let res = Entity::delete_by_id(task_id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound("Task not found".into()));
        }
        tracing::info!(task_id, "task deleted");
        Ok(())
    }
}
