//! Read models for the three role dashboards.

use chrono::{DateTime, NaiveDate, Utc};
use db::models::application::{self, ApplicationStatus};
use db::models::department;
use db::models::internship;
use db::models::internship_supervision;
use db::models::task::{self, TaskStatus};
use db::models::user::{self, Role};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{ServiceError, ServiceResult};

const PAGE_SIZES: [u64; 3] = [10, 20, 50];
const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Serialize)]
pub struct StudentApplicationView {
    pub id: i64,
    pub internship_id: i64,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Debug, Serialize)]
pub struct ActiveInternshipView {
    pub internship_id: i64,
    pub title: String,
    pub company: String,
    pub supervisor: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub profile: user::Model,
    pub departments: Vec<department::Model>,
    pub internships: Vec<internship::Model>,
    pub applications: Vec<StudentApplicationView>,
    pub applied_internship_ids: Vec<i64>,
    pub counts: ApplicationCounts,
    pub active_internship: Option<ActiveInternshipView>,
}

#[derive(Debug, Serialize)]
pub struct SupervisionView {
    pub id: i64,
    pub mentor_id: i64,
    pub mentor_name: Option<String>,
    pub student_id: Option<i64>,
    pub student_name: Option<String>,
    pub internship_id: i64,
    pub internship_title: Option<String>,
    pub active: bool,
    pub scope_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MentorDashboard {
    pub profile: user::Model,
    pub departments: Vec<department::Model>,
    pub supervisions: Vec<SupervisionView>,
    pub tasks: Vec<task::Model>,
}

/// Query string of the admin dashboard. Every field is optional and loosely
/// typed; [`UserSearch::from_query`] normalises it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminDashboardQuery {
    pub i_search_field: Option<String>,
    pub i_q: Option<String>,
    pub search_field: Option<String>,
    pub q: Option<String>,
    /// Older form of `q` that always searches by email.
    pub search_email: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserSearchField {
    Name,
    Email,
    Role,
}

/// Normalised user search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSearch {
    pub field: UserSearchField,
    pub q: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

impl UserSearch {
    pub fn from_query(query: &AdminDashboardQuery) -> Self {
        let mut q = trimmed(&query.q);
        let mut field = match trimmed(&query.search_field)
            .map(|f| f.to_lowercase())
            .as_deref()
        {
            Some("name") => UserSearchField::Name,
            Some("role") => UserSearchField::Role,
            _ => UserSearchField::Email,
        };
        if let Some(legacy) = trimmed(&query.search_email) {
            q = Some(legacy);
            field = UserSearchField::Email;
        }

        let page = trimmed(&query.page)
            .and_then(|p| p.parse::<u64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let page_size = trimmed(&query.page_size)
            .and_then(|p| p.parse::<u64>().ok())
            .filter(|p| PAGE_SIZES.contains(p))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            field,
            q,
            page,
            page_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserSearchResults {
    pub search: UserSearch,
    pub total: u64,
    pub results: Vec<user::Model>,
}

#[derive(Debug, Serialize)]
pub struct AdminApplicationView {
    pub id: i64,
    pub student_id: i64,
    pub student_email: Option<String>,
    pub student_cv_url: Option<String>,
    pub internship_id: i64,
    pub internship_title: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdminTaskView {
    pub id: i64,
    pub title: String,
    pub supervision_id: Option<i64>,
    pub internship_title: Option<String>,
    pub student_id: i64,
    pub student_email: Option<String>,
    pub assigned_by: i64,
    pub assigned_by_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: TaskStatus,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct AdminTotals {
    pub students: u64,
    pub mentors: u64,
    pub supervisions: u64,
    pub pending_applications: u64,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub supervisions: Vec<SupervisionView>,
    pub applications: Vec<AdminApplicationView>,
    pub tasks: Vec<AdminTaskView>,
    pub departments: Vec<department::Model>,
    pub users: Vec<user::Model>,
    pub internships: Vec<internship::Model>,
    pub totals: AdminTotals,
    /// Present only when a user search term was given.
    pub user_search: Option<UserSearchResults>,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

pub struct DashboardService;

impl DashboardService {
    pub async fn student(db: &DatabaseConnection, student_id: i64) -> ServiceResult<StudentDashboard> {
        let profile = user::Entity::find_by_id(student_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

        let internships = internship::Model::newest_first(db).await?;
        let rows = application::Model::for_student_with_internship(db, student_id).await?;

        let mut counts = ApplicationCounts::default();
        let mut applications = Vec::with_capacity(rows.len());
        for (app, posting) in rows {
            let Some(posting) = posting else { continue };
            match app.status {
                ApplicationStatus::Approved => counts.approved += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
                _ => counts.pending += 1,
            }
            applications.push(StudentApplicationView {
                id: app.id,
                internship_id: posting.id,
                title: posting.title,
                company: posting.company,
                location: posting.location,
                applied_at: app.applied_at,
                status: app.status,
            });
        }
        counts.total = applications.len();

        let applied_internship_ids = applications.iter().map(|a| a.internship_id).collect();
        let active_internship = Self::active_internship(db, student_id).await?;

        Ok(StudentDashboard {
            profile,
            departments: department::Model::all_by_name(db).await?,
            internships,
            applications,
            applied_internship_ids,
            counts,
            active_internship,
        })
    }

    /// First active supervision of the student on an internship where the
    /// student's application was approved.
    async fn active_internship(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> ServiceResult<Option<ActiveInternshipView>> {
        for supervision in internship_supervision::Model::active_for_student(db, student_id).await? {
            let approved = application::Model::find_for_student(db, student_id, supervision.internship_id)
                .await?
                .is_some_and(|a| a.status == ApplicationStatus::Approved);
            if !approved {
                continue;
            }
            let Some(posting) = internship::Entity::find_by_id(supervision.internship_id)
                .one(db)
                .await?
            else {
                continue;
            };
            let supervisor = user::Entity::find_by_id(supervision.mentor_id)
                .one(db)
                .await?
                .map(|m| m.name);

            return Ok(Some(ActiveInternshipView {
                internship_id: posting.id,
                title: posting.title,
                company: posting.company,
                supervisor,
                location: posting.location,
                start_date: posting.start_date,
                end_date: posting.end_date,
            }));
        }
        Ok(None)
    }

    pub async fn mentor(db: &DatabaseConnection, mentor_id: i64) -> ServiceResult<MentorDashboard> {
        let profile = user::Entity::find_by_id(mentor_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

        let users = Self::users_by_id(db).await?;
        let internships = Self::internships_by_id(db).await?;
        let supervisions = internship_supervision::Model::for_mentor(db, mentor_id)
            .await?
            .into_iter()
            .map(|s| supervision_view(s, &users, &internships))
            .collect();

        Ok(MentorDashboard {
            profile,
            departments: department::Model::all_by_name(db).await?,
            supervisions,
            tasks: task::Model::assigned_by(db, mentor_id).await?,
        })
    }

    pub async fn admin(
        db: &DatabaseConnection,
        query: &AdminDashboardQuery,
    ) -> ServiceResult<AdminDashboard> {
        let users_by_id = Self::users_by_id(db).await?;
        let internships_by_id = Self::internships_by_id(db).await?;

        let supervision_rows = internship_supervision::Entity::find()
            .order_by_asc(internship_supervision::Column::Id)
            .all(db)
            .await?;
        let supervision_internship: HashMap<i64, i64> = supervision_rows
            .iter()
            .map(|s| (s.id, s.internship_id))
            .collect();
        let supervisions = supervision_rows
            .into_iter()
            .map(|s| supervision_view(s, &users_by_id, &internships_by_id))
            .collect();

        let applications = application::Entity::find()
            .order_by_desc(application::Column::AppliedAt)
            .all(db)
            .await?
            .into_iter()
            .map(|a| {
                let student = users_by_id.get(&a.student_id);
                AdminApplicationView {
                    id: a.id,
                    student_id: a.student_id,
                    student_email: student.map(|u| u.email.clone()),
                    student_cv_url: student.and_then(|u| u.cv_url.clone()),
                    internship_id: a.internship_id,
                    internship_title: internships_by_id.get(&a.internship_id).map(|i| i.title.clone()),
                    status: a.status,
                    applied_at: a.applied_at,
                }
            })
            .collect();

        let tasks = task::Model::newest_first(db)
            .await?
            .into_iter()
            .map(|t| AdminTaskView {
                internship_title: t
                    .supervision_id
                    .and_then(|sid| supervision_internship.get(&sid))
                    .and_then(|iid| internships_by_id.get(iid))
                    .map(|i| i.title.clone()),
                student_email: users_by_id.get(&t.student_id).map(|u| u.email.clone()),
                assigned_by_email: users_by_id.get(&t.assigned_by).map(|u| u.email.clone()),
                id: t.id,
                title: t.title,
                supervision_id: t.supervision_id,
                student_id: t.student_id,
                assigned_by: t.assigned_by,
                due_date: t.due_date,
                description: t.description,
                status: t.status,
            })
            .collect();

        let users = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(db)
            .await?;

        let totals = AdminTotals {
            students: user::Model::count_by_role(db, Role::Student).await?,
            mentors: user::Model::count_by_role(db, Role::Mentor).await?,
            supervisions: internship_supervision::Entity::find().count(db).await?,
            pending_applications: application::Model::count_with_status(db, ApplicationStatus::Pending)
                .await?,
        };

        let search = UserSearch::from_query(query);
        let user_search = if search.q.is_some() {
            Some(Self::search_users(db, search).await?)
        } else {
            None
        };

        Ok(AdminDashboard {
            supervisions,
            applications,
            tasks,
            departments: department::Model::all_by_name(db).await?,
            users,
            internships: Self::search_internships(db, query).await?,
            totals,
            user_search,
        })
    }

    /// Internships, newest first, filtered by `i_q` on the chosen field or on
    /// title, company and status together.
    pub async fn search_internships(
        db: &DatabaseConnection,
        query: &AdminDashboardQuery,
    ) -> ServiceResult<Vec<internship::Model>> {
        let mut select = internship::Entity::find();

        if let Some(q) = trimmed(&query.i_q) {
            let field = trimmed(&query.i_search_field).map(|f| f.to_lowercase());
            let condition = match field.as_deref() {
                Some("title") => Condition::all().add(internship::Column::Title.contains(&q)),
                Some("company") => Condition::all().add(internship::Column::Company.contains(&q)),
                Some("status") => Condition::all().add(internship::Column::Status.contains(&q)),
                _ => Condition::any()
                    .add(internship::Column::Title.contains(&q))
                    .add(internship::Column::Company.contains(&q))
                    .add(internship::Column::Status.contains(&q)),
            };
            select = select.filter(condition);
        }

        Ok(select
            .order_by_desc(internship::Column::CreatedAt)
            .order_by_desc(internship::Column::Id)
            .all(db)
            .await?)
    }

    /// One page of users matching `search`. A role search with an unknown
    /// role matches nobody.
    pub async fn search_users(
        db: &DatabaseConnection,
        search: UserSearch,
    ) -> ServiceResult<UserSearchResults> {
        let q = search.q.clone().unwrap_or_default().to_lowercase();
        let pattern = format!("%{q}%");

        let mut select = user::Entity::find();
        match search.field {
            UserSearchField::Name => {
                select = select.filter(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(pattern));
            }
            UserSearchField::Email => {
                select = select.filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(pattern));
            }
            UserSearchField::Role => match Role::from_str(&q) {
                Ok(role) => select = select.filter(user::Column::Role.eq(role)),
                Err(_) => {
                    return Ok(UserSearchResults {
                        search,
                        total: 0,
                        results: Vec::new(),
                    });
                }
            },
        }

        let paginator = select
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .paginate(db, search.page_size);
        let total = paginator.num_items().await?;
        let results = paginator.fetch_page(search.page - 1).await?;

        Ok(UserSearchResults {
            search,
            total,
            results,
        })
    }

    async fn users_by_id(db: &DatabaseConnection) -> ServiceResult<HashMap<i64, user::Model>> {
        Ok(user::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    async fn internships_by_id(
        db: &DatabaseConnection,
    ) -> ServiceResult<HashMap<i64, internship::Model>> {
        Ok(internship::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect())
    }
}

fn supervision_view(
    s: internship_supervision::Model,
    users: &HashMap<i64, user::Model>,
    internships: &HashMap<i64, internship::Model>,
) -> SupervisionView {
    SupervisionView {
        mentor_name: users.get(&s.mentor_id).map(|u| u.name.clone()),
        student_name: s
            .student_id
            .and_then(|id| users.get(&id))
            .map(|u| u.name.clone()),
        internship_title: internships.get(&s.internship_id).map(|i| i.title.clone()),
        id: s.id,
        mentor_id: s.mentor_id,
        student_id: s.student_id,
        internship_id: s.internship_id,
        active: s.active,
        scope_notes: s.scope_notes,
    }
}
