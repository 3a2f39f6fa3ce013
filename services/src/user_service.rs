use chrono::Utc;
use db::models::department;
use db::models::internship_supervision;
use db::models::task;
use db::models::user::{self, ActiveModel, Entity, Model, NewUser, Role, UserStatus};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set,
};
use serde::Deserialize;
use std::str::FromStr;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::retry::RetryPolicy;

pub use db::models::user::Model as User;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub role: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub phone: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Self-service profile edit. Blank strings leave a field as it is, except
/// `phone`, where an empty string clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i64>,
    pub password: Option<String>,
    pub profile_photo_url: Option<String>,
    pub cv_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Unknown or missing roles fall back to `student`.
    pub role: Option<String>,
    pub department_id: Option<i64>,
    /// Looked up case-insensitively and created if missing.
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i64>,
}

pub struct UserService;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl UserService {
    /// Registers a student account.
    pub async fn signup(db: &DatabaseConnection, mut req: SignupRequest) -> ServiceResult<Model> {
        req.email = user::normalize_email(&req.email);
        if !req.role.trim().eq_ignore_ascii_case("student") {
            return Err(ServiceError::Validation("Only students can sign up.".into()));
        }
        if req.name.trim().is_empty() {
            return Err(ServiceError::Validation("Name is required".into()));
        }
        req.validate()?;

        if Model::email_taken(db, &req.email, None).await? {
            return Err(ServiceError::Conflict("Email already registered.".into()));
        }

        let phone = non_blank(&req.phone);
        let created = Model::create(
            db,
            NewUser {
                name: &req.name,
                email: &req.email,
                password: &req.password,
                role: Role::Student,
                phone,
                department_id: None,
            },
        )
        .await?;

        tracing::info!(user_id = created.id, "student signed up");
        Ok(created)
    }

    /// Checks credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(db: &DatabaseConnection, email: &str, password: &str) -> ServiceResult<Model> {
        let invalid = || ServiceError::Unauthorized("Invalid email or password.".into());

        let user = Model::find_by_email(db, email).await?.ok_or_else(invalid)?;
        if !user.verify_password(password) {
            return Err(invalid());
        }
        if !user.is_active() {
            return Err(ServiceError::Forbidden("Account is inactive.".into()));
        }
        Ok(user)
    }

    pub async fn find(db: &DatabaseConnection, user_id: i64) -> ServiceResult<Model> {
        Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))
    }

    /// Applies a self-service profile edit.
    pub async fn update_profile(
        db: &DatabaseConnection,
        user_id: i64,
        req: UpdateProfile,
    ) -> ServiceResult<Model> {
        let current = Self::find(db, user_id).await?;
        let mut active: ActiveModel = current.into();

        if let Some(name) = non_blank(&req.name) {
            active.name = Set(name.to_owned());
        }
        if let Some(email) = non_blank(&req.email) {
            if Model::email_taken(db, email, Some(user_id)).await? {
                return Err(ServiceError::Conflict("Email already registered.".into()));
            }
            active.email = Set(user::normalize_email(email));
        }
        if let Some(phone) = &req.phone {
            let phone = phone.trim();
            active.phone = Set((!phone.is_empty()).then(|| phone.to_owned()));
        }
        if let Some(department_id) = req.department_id {
            if department::Entity::find_by_id(department_id).one(db).await?.is_none() {
                return Err(ServiceError::Validation("Unknown department".into()));
            }
            active.department_id = Set(Some(department_id));
        }
        if let Some(password) = non_blank(&req.password) {
            active.password_hash = Set(Model::hash_password(password)?);
        }
        if let Some(url) = non_blank(&req.profile_photo_url) {
            active.profile_photo_url = Set(Some(url.to_owned()));
        }
        if let Some(url) = non_blank(&req.cv_url) {
            active.cv_url = Set(Some(url.to_owned()));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Creates a user on behalf of an admin. A named department is found or
    /// created in the same unit of work.
    pub async fn create(db: &DatabaseConnection, mut req: CreateUser) -> ServiceResult<Model> {
        req.email = user::normalize_email(&req.email);
        req.validate()?;

        let created = RetryPolicy::from_config()
            .run(db, move |txn| Box::pin(Self::create_in(txn, req.clone())))
            .await
            .map_err(|e| ServiceError::Storage(e.source))??;

        tracing::info!(user_id = created.id, role = %created.role, "user created");
        Ok(created)
    }

    async fn create_in(
        txn: &DatabaseTransaction,
        req: CreateUser,
    ) -> Result<ServiceResult<Model>, DbErr> {
        if Model::email_taken(txn, &req.email, None).await? {
            return Ok(Err(ServiceError::Conflict("Email already exists.".into())));
        }

        let role = req
            .role
            .as_deref()
            .and_then(|r| Role::from_str(r.trim()).ok())
            .unwrap_or(Role::Student);

        let department_id = match non_blank(&req.department_name) {
            Some(name) => Some(department::Model::find_or_create(txn, name).await?.id),
            None => req.department_id,
        };

        let created = Model::create(
            txn,
            NewUser {
                name: &req.name,
                email: &req.email,
                password: &req.password,
                role,
                phone: None,
                department_id,
            },
        )
        .await?;
        Ok(Ok(created))
    }

    /// Admin edit of a user. Invalid role or status values are ignored.
    pub async fn update(
        db: &DatabaseConnection,
        user_id: i64,
        req: UpdateUser,
    ) -> ServiceResult<Model> {
        RetryPolicy::from_config()
            .run(db, move |txn| Box::pin(Self::update_in(txn, user_id, req.clone())))
            .await
            .map_err(|e| ServiceError::Storage(e.source))?
    }

    async fn update_in(
        txn: &DatabaseTransaction,
        user_id: i64,
        req: UpdateUser,
    ) -> Result<ServiceResult<Model>, DbErr> {
        let Some(current) = Entity::find_by_id(user_id).one(txn).await? else {
            return Ok(Err(ServiceError::NotFound("User not found".into())));
        };
        let mut active: ActiveModel = current.into();

        if let Some(name) = non_blank(&req.name) {
            active.name = Set(name.to_owned());
        }
        if let Some(email) = non_blank(&req.email) {
            if Model::email_taken(txn, email, Some(user_id)).await? {
                return Ok(Err(ServiceError::Conflict("Email already exists.".into())));
            }
            active.email = Set(user::normalize_email(email));
        }
        if let Some(password) = non_blank(&req.password) {
            active.password_hash = Set(Model::hash_password(password)?);
        }
        if let Some(role) = non_blank(&req.role).and_then(|r| Role::from_str(r).ok()) {
            active.role = Set(role);
        }
        if let Some(status) = non_blank(&req.status).and_then(|s| UserStatus::from_str(s).ok()) {
            active.status = Set(status);
        }
        if let Some(phone) = non_blank(&req.phone) {
            active.phone = Set(Some(phone.to_owned()));
        }
        if let Some(department_id) = req.department_id {
            active.department_id = Set(Some(department_id));
        }
        active.updated_at = Set(Utc::now());

        Ok(Ok(active.update(txn).await?))
    }

    /// Deletes a user. Rows the user owns go with them; tasks under the
    /// user's supervisions are detached first so the supervisions can go.
    pub async fn delete(db: &DatabaseConnection, actor_id: i64, user_id: i64) -> ServiceResult<()> {
        if actor_id == user_id {
            return Err(ServiceError::Forbidden(
                "You cannot delete your own account.".into(),
            ));
        }

        RetryPolicy::from_config()
            .run(db, move |txn| Box::pin(Self::delete_in(txn, user_id)))
            .await
            .map_err(|e| ServiceError::Storage(e.source))??;

        tracing::info!(user_id, actor_id, "user deleted");
        Ok(())
    }

    async fn delete_in(txn: &DatabaseTransaction, user_id: i64) -> Result<ServiceResult<()>, DbErr> {
        if Entity::find_by_id(user_id).one(txn).await?.is_none() {
            return Ok(Err(ServiceError::NotFound("User not found".into())));
        }

        let supervision_ids: Vec<i64> = internship_supervision::Entity::find()
            .filter(internship_supervision::Column::MentorId.eq(user_id))
            .all(txn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if !supervision_ids.is_empty() {
            task::Entity::update_many()
                .col_expr(task::Column::SupervisionId, Expr::value(Option::<i64>::None))
                .filter(task::Column::SupervisionId.is_in(supervision_ids))
                .exec(txn)
                .await?;
        }

        Entity::delete_by_id(user_id).exec(txn).await?;
        Ok(Ok(()))
    }
}
