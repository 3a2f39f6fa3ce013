use db::models::internship;
use db::models::internship_supervision::{ActiveModel, Entity, Model};
use db::models::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};

/// Admin form for a supervision assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupervisionForm {
    pub mentor_id: i64,
    pub internship_id: i64,
    pub student_id: Option<i64>,
    /// `"true"` in any case means active; missing means active.
    pub active: Option<String>,
    pub notes: Option<String>,
}

impl SupervisionForm {
    fn is_active(&self) -> bool {
        match self.active.as_deref() {
            Some(v) => v.trim().eq_ignore_ascii_case("true"),
            None => true,
        }
    }

    fn notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
    }
}

pub struct SupervisionService;

impl SupervisionService {
    async fn check_refs(db: &DatabaseConnection, form: &SupervisionForm) -> ServiceResult<()> {
        if user::Entity::find_by_id(form.mentor_id).one(db).await?.is_none() {
            return Err(ServiceError::Validation("Unknown mentor".into()));
        }
        if internship::Entity::find_by_id(form.internship_id).one(db).await?.is_none() {
            return Err(ServiceError::Validation("Unknown internship".into()));
        }
        if let Some(student_id) = form.student_id {
            if user::Entity::find_by_id(student_id).one(db).await?.is_none() {
                return Err(ServiceError::Validation("Unknown student".into()));
            }
        }
        Ok(())
    }

    pub async fn create(db: &DatabaseConnection, form: SupervisionForm) -> ServiceResult<Model> {
        Self::check_refs(db, &form).await?;
        let created = Model::create(
            db,
            form.mentor_id,
            form.internship_id,
            form.student_id,
            form.notes(),
            form.is_active(),
        )
        .await?;
        tracing::info!(supervision_id = created.id, "supervision assigned");
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        supervision_id: i64,
        form: SupervisionForm,
    ) -> ServiceResult<Model> {
        let current = Entity::find_by_id(supervision_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Supervision not found".into()))?;
        Self::check_refs(db, &form).await?;

        let mut active: ActiveModel = current.into();
        active.mentor_id = Set(form.mentor_id);
        active.internship_id = Set(form.internship_id);
        active.student_id = Set(form.student_id);
        active.active = Set(form.is_active());
        active.scope_notes = Set(form.notes());
        Ok(active.update(db).await?)
    }
}
