//! Removal of an internship together with everything that depends on it.
//!
//! The dependency closure is deleted leaf-first in one transaction:
//!
//! ```text
//! internship
//!  ├─ internship_supervisions ── tasks ── task_submissions ── feedback
//!  ├─ reports
//!  └─ applications
//! ```
//!
//! The schema does not cascade from `internships`, so the only way to delete
//! one is through this plan. A busy database rolls the attempt back and the
//! whole plan is replayed under [`RetryPolicy`].

use async_trait::async_trait;
use db::models::{
    application, feedback, internship, internship_supervision, report, task, task_submission,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QuerySelect,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::retry::RetryPolicy;

/// Rows removed per table by a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemovalCounts {
    pub feedback: u64,
    pub task_submissions: u64,
    pub tasks: u64,
    pub reports: u64,
    pub applications: u64,
    pub supervisions: u64,
    pub internships: u64,
}

impl fmt::Display for RemovalCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "feedback={} task_submissions={} tasks={} reports={} applications={} supervisions={} internships={}",
            self.feedback,
            self.task_submissions,
            self.tasks,
            self.reports,
            self.applications,
            self.supervisions,
            self.internships
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Deleted(RemovalCounts),
    /// No internship with that id. Nothing was written.
    NotFound,
    /// Every attempt failed or a non-retryable error occurred. Nothing was
    /// written.
    Failed { attempts: u32, diagnostic: String },
}

impl RemovalOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RemovalOutcome::Deleted(_) => "deleted",
            RemovalOutcome::NotFound => "not_found",
            RemovalOutcome::Failed { .. } => "failed",
        }
    }
}

/// Ids gathered while walking down from the internship, plus running counts.
#[derive(Debug, Default)]
pub struct CascadeScope {
    pub internship_id: i64,
    pub supervision_ids: Vec<i64>,
    pub task_ids: Vec<i64>,
    pub submission_ids: Vec<i64>,
    pub counts: RemovalCounts,
}

impl CascadeScope {
    fn new(internship_id: i64) -> Self {
        Self {
            internship_id,
            ..Default::default()
        }
    }
}

/// Whether the plan should keep going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFlow {
    Continue,
    /// Nothing to remove; end the attempt without further writes.
    Halt,
}

/// One table-scoped action in a [`CascadePlan`].
#[async_trait]
pub trait CascadeStep: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        scope: &mut CascadeScope,
    ) -> Result<StepFlow, DbErr>;
}

/// The fixed steps of an internship removal, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LocateInternship,
    CollectSupervisions,
    CollectTasks,
    CollectSubmissions,
    DeleteFeedback,
    DeleteSubmissions,
    DeleteTasks,
    DeleteReports,
    DeleteApplications,
    DeleteSupervisions,
    DeleteInternship,
}

impl Step {
    pub const ORDER: [Step; 11] = [
        Step::LocateInternship,
        Step::CollectSupervisions,
        Step::CollectTasks,
        Step::CollectSubmissions,
        Step::DeleteFeedback,
        Step::DeleteSubmissions,
        Step::DeleteTasks,
        Step::DeleteReports,
        Step::DeleteApplications,
        Step::DeleteSupervisions,
        Step::DeleteInternship,
    ];
}

#[async_trait]
impl CascadeStep for Step {
    fn name(&self) -> &'static str {
        match self {
            Step::LocateInternship => "locate_internship",
            Step::CollectSupervisions => "collect_supervisions",
            Step::CollectTasks => "collect_tasks",
            Step::CollectSubmissions => "collect_submissions",
            Step::DeleteFeedback => "delete_feedback",
            Step::DeleteSubmissions => "delete_task_submissions",
            Step::DeleteTasks => "delete_tasks",
            Step::DeleteReports => "delete_reports",
            Step::DeleteApplications => "delete_applications",
            Step::DeleteSupervisions => "delete_supervisions",
            Step::DeleteInternship => "delete_internship",
        }
    }

    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        scope: &mut CascadeScope,
    ) -> Result<StepFlow, DbErr> {
        let id = scope.internship_id;
        match self {
            Step::LocateInternship => {
                let found = internship::Entity::find_by_id(id).one(txn).await?;
                return Ok(match found {
                    Some(_) => StepFlow::Continue,
                    None => StepFlow::Halt,
                });
            }
            Step::CollectSupervisions => {
                scope.supervision_ids = internship_supervision::Entity::find()
                    .select_only()
                    .column(internship_supervision::Column::Id)
                    .filter(internship_supervision::Column::InternshipId.eq(id))
                    .into_tuple::<i64>()
                    .all(txn)
                    .await?;
            }
            Step::CollectTasks => {
                if !scope.supervision_ids.is_empty() {
                    scope.task_ids = task::Entity::find()
                        .select_only()
                        .column(task::Column::Id)
                        .filter(task::Column::SupervisionId.is_in(scope.supervision_ids.clone()))
                        .into_tuple::<i64>()
                        .all(txn)
                        .await?;
                }
            }
            Step::CollectSubmissions => {
                if !scope.task_ids.is_empty() {
                    scope.submission_ids = task_submission::Entity::find()
                        .select_only()
                        .column(task_submission::Column::Id)
                        .filter(task_submission::Column::TaskId.is_in(scope.task_ids.clone()))
                        .into_tuple::<i64>()
                        .all(txn)
                        .await?;
                }
            }
            Step::DeleteFeedback => {
                if !scope.submission_ids.is_empty() {
                    scope.counts.feedback = feedback::Entity::delete_many()
                        .filter(
                            feedback::Column::TaskSubmissionId.is_in(scope.submission_ids.clone()),
                        )
                        .exec(txn)
                        .await?
                        .rows_affected;
                }
            }
            Step::DeleteSubmissions => {
                if !scope.submission_ids.is_empty() {
                    scope.counts.task_submissions = task_submission::Entity::delete_many()
                        .filter(task_submission::Column::Id.is_in(scope.submission_ids.clone()))
                        .exec(txn)
                        .await?
                        .rows_affected;
                }
            }
            Step::DeleteTasks => {
                if !scope.task_ids.is_empty() {
                    scope.counts.tasks = task::Entity::delete_many()
                        .filter(task::Column::Id.is_in(scope.task_ids.clone()))
                        .exec(txn)
                        .await?
                        .rows_affected;
                }
            }
            Step::DeleteReports => {
                scope.counts.reports = report::Entity::delete_many()
                    .filter(report::Column::InternshipId.eq(id))
                    .exec(txn)
                    .await?
                    .rows_affected;
            }
            Step::DeleteApplications => {
                scope.counts.applications = application::Entity::delete_many()
                    .filter(application::Column::InternshipId.eq(id))
                    .exec(txn)
                    .await?
                    .rows_affected;
            }
            Step::DeleteSupervisions => {
                if !scope.supervision_ids.is_empty() {
                    scope.counts.supervisions = internship_supervision::Entity::delete_many()
                        .filter(
                            internship_supervision::Column::Id.is_in(scope.supervision_ids.clone()),
                        )
                        .exec(txn)
                        .await?
                        .rows_affected;
                }
            }
            Step::DeleteInternship => {
                scope.counts.internships = internship::Entity::delete_by_id(id)
                    .exec(txn)
                    .await?
                    .rows_affected;
            }
        }
        Ok(StepFlow::Continue)
    }
}

/// Ordered list of steps executed inside one transaction.
#[derive(Clone)]
pub struct CascadePlan {
    steps: Vec<Arc<dyn CascadeStep>>,
}

impl Default for CascadePlan {
    fn default() -> Self {
        Self {
            steps: Step::ORDER
                .iter()
                .map(|step| Arc::new(*step) as Arc<dyn CascadeStep>)
                .collect(),
        }
    }
}

impl fmt::Debug for CascadePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|s| s.name()))
            .finish()
    }
}

impl CascadePlan {
    /// Appends a step after the existing ones.
    pub fn push(&mut self, step: Arc<dyn CascadeStep>) {
        self.steps.push(step);
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Runs every step against `txn`. `Ok(None)` means the internship did
    /// not exist.
    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        internship_id: i64,
    ) -> Result<Option<RemovalCounts>, DbErr> {
        let mut scope = CascadeScope::new(internship_id);
        for step in &self.steps {
            if step.apply(txn, &mut scope).await? == StepFlow::Halt {
                tracing::debug!(internship_id, step = step.name(), "cascade halted");
                return Ok(None);
            }
        }
        Ok(Some(scope.counts))
    }
}

/// Internship removal with a configurable plan and retry policy.
#[derive(Debug, Clone)]
pub struct InternshipRemoval {
    plan: CascadePlan,
    policy: RetryPolicy,
}

impl InternshipRemoval {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_plan(CascadePlan::default(), policy)
    }

    pub fn with_plan(plan: CascadePlan, policy: RetryPolicy) -> Self {
        Self { plan, policy }
    }

    /// Removes `internship_id` and its dependency closure.
    pub async fn run(&self, db: &DatabaseConnection, internship_id: i64) -> RemovalOutcome {
        let plan = self.plan.clone();
        let result = self
            .policy
            .run(db, move |txn| {
                let plan = plan.clone();
                Box::pin(async move { plan.apply(txn, internship_id).await })
            })
            .await;

        match result {
            Ok(Some(counts)) => {
                tracing::info!(internship_id, %counts, "internship removed");
                RemovalOutcome::Deleted(counts)
            }
            Ok(None) => {
                tracing::info!(internship_id, "internship not found, nothing removed");
                RemovalOutcome::NotFound
            }
            Err(err) => {
                tracing::error!(
                    internship_id,
                    attempts = err.attempts,
                    error = %err.source,
                    "internship removal failed"
                );
                RemovalOutcome::Failed {
                    attempts: err.attempts,
                    diagnostic: err.source.to_string(),
                }
            }
        }
    }
}

/// Removes an internship using the configured retry policy.
pub async fn remove_internship(db: &DatabaseConnection, internship_id: i64) -> RemovalOutcome {
    InternshipRemoval::new(RetryPolicy::from_config())
        .run(db, internship_id)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::contention_error;
    use chrono::Utc;
    use db::models::internship::NewInternship;
    use db::models::user::{self, NewUser, Role};
    use db::models::{department, feedback::FeedbackRating, task_submission::SubmissionStatus};
    use db::test_utils::setup_test_db;
    use sea_orm::{ActiveModelTrait, Set};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    type Snapshot = BTreeMap<&'static str, Vec<i64>>;

    struct Shape {
        supervisions: usize,
        tasks: usize,
        submissions: usize,
        feedback: usize,
        reports: usize,
        applications: usize,
    }

    const SHAPE: Shape = Shape {
        supervisions: 2,
        tasks: 3,
        submissions: 2,
        feedback: 2,
        reports: 2,
        applications: 3,
    };

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(5, Duration::from_millis(1))
    }

    async fn make_user(db: &DatabaseConnection, email: &str, role: Role) -> user::Model {
        user::Model::create(
            db,
            NewUser {
                name: email,
                email,
                password: "secret123",
                role,
                phone: None,
                department_id: None,
            },
        )
        .await
        .unwrap()
    }

    /// Builds an internship with a full dependency graph of the given shape.
    async fn seed_internship(db: &DatabaseConnection, tag: &str, shape: &Shape) -> i64 {
        let mentor = make_user(db, &format!("mentor-{tag}@x.io"), Role::Mentor).await;
        let posting = internship::Model::create(
            db,
            NewInternship {
                title: format!("Internship {tag}"),
                company: "Acme".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let mut students = Vec::new();
        for n in 0..shape.applications.max(1) {
            students.push(make_user(db, &format!("student-{tag}-{n}@x.io"), Role::Student).await);
        }

        for s in 0..shape.supervisions {
            let student = &students[s % students.len()];
            let supervision = internship_supervision::Model::create(
                db,
                mentor.id,
                posting.id,
                Some(student.id),
                None,
                true,
            )
            .await
            .unwrap();

            for t in 0..shape.tasks {
                let task = task::Model::create(
                    db,
                    task::NewTask {
                        supervision_id: Some(supervision.id),
                        student_id: student.id,
                        assigned_by: mentor.id,
                        title: format!("Task {tag}-{s}-{t}"),
                        description: None,
                        due_date: None,
                    },
                )
                .await
                .unwrap();

                for _ in 0..shape.submissions {
                    let submission = task_submission::ActiveModel {
                        task_id: Set(task.id),
                        student_id: Set(student.id),
                        submitted_at: Set(Utc::now()),
                        status: Set(SubmissionStatus::Submitted),
                        ..Default::default()
                    }
                    .insert(db)
                    .await
                    .unwrap();

                    for _ in 0..shape.feedback {
                        feedback::ActiveModel {
                            student_id: Set(student.id),
                            mentor_id: Set(mentor.id),
                            task_submission_id: Set(Some(submission.id)),
                            rating: Set(Some(FeedbackRating::Good)),
                            created_at: Set(Utc::now()),
                            ..Default::default()
                        }
                        .insert(db)
                        .await
                        .unwrap();
                    }
                }
            }
        }

        for r in 0..shape.reports {
            report::ActiveModel {
                student_id: Set(students[r % students.len()].id),
                internship_id: Set(posting.id),
                title: Set(format!("Report {tag}-{r}")),
                issued_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await
            .unwrap();
        }

        for student in students.iter().take(shape.applications) {
            application::Model::create_pending(db, student.id, posting.id)
                .await
                .unwrap();
        }

        posting.id
    }

    async fn snapshot(db: &DatabaseConnection) -> Snapshot {
        let mut snap = Snapshot::new();
        snap.insert(
            "internships",
            internship::Entity::find().all(db).await.unwrap().iter().map(|m| m.id).collect(),
        );
        snap.insert(
            "supervisions",
            internship_supervision::Entity::find()
                .all(db)
                .await
                .unwrap()
                .iter()
                .map(|m| m.id)
                .collect(),
        );
        snap.insert(
            "tasks",
            task::Entity::find().all(db).await.unwrap().iter().map(|m| m.id).collect(),
        );
        snap.insert(
            "task_submissions",
            task_submission::Entity::find()
                .all(db)
                .await
                .unwrap()
                .iter()
                .map(|m| m.id)
                .collect(),
        );
        snap.insert(
            "feedback",
            feedback::Entity::find().all(db).await.unwrap().iter().map(|m| m.id).collect(),
        );
        snap.insert(
            "reports",
            report::Entity::find().all(db).await.unwrap().iter().map(|m| m.id).collect(),
        );
        snap.insert(
            "applications",
            application::Entity::find().all(db).await.unwrap().iter().map(|m| m.id).collect(),
        );
        snap.insert(
            "users",
            user::Entity::find().all(db).await.unwrap().iter().map(|m| m.id).collect(),
        );
        snap.insert(
            "departments",
            department::Entity::find().all(db).await.unwrap().iter().map(|m| m.id).collect(),
        );
        snap
    }

    async fn references_to(db: &DatabaseConnection, internship_id: i64) -> usize {
        let supervisions = internship_supervision::Entity::find()
            .filter(internship_supervision::Column::InternshipId.eq(internship_id))
            .all(db)
            .await
            .unwrap();
        let reports = report::Entity::find()
            .filter(report::Column::InternshipId.eq(internship_id))
            .all(db)
            .await
            .unwrap();
        let applications = application::Entity::find()
            .filter(application::Column::InternshipId.eq(internship_id))
            .all(db)
            .await
            .unwrap();
        supervisions.len() + reports.len() + applications.len()
    }

    /// Fails with a lock error for the first `failures` invocations.
    struct FlakyStep {
        failures: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakyStep {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl CascadeStep for FlakyStep {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn apply(
            &self,
            _txn: &DatabaseTransaction,
            _scope: &mut CascadeScope,
        ) -> Result<StepFlow, DbErr> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(contention_error());
            }
            Ok(StepFlow::Continue)
        }
    }

    struct BrokenStep;

    #[async_trait]
    impl CascadeStep for BrokenStep {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn apply(
            &self,
            _txn: &DatabaseTransaction,
            _scope: &mut CascadeScope,
        ) -> Result<StepFlow, DbErr> {
            Err(DbErr::Custom("disk I/O error".into()))
        }
    }

    fn plan_with(step: Arc<dyn CascadeStep>) -> CascadePlan {
        let mut plan = CascadePlan::default();
        plan.push(step);
        plan
    }

    #[test]
    fn default_plan_runs_leaf_first() {
        assert_eq!(
            CascadePlan::default().step_names(),
            vec![
                "locate_internship",
                "collect_supervisions",
                "collect_tasks",
                "collect_submissions",
                "delete_feedback",
                "delete_task_submissions",
                "delete_tasks",
                "delete_reports",
                "delete_applications",
                "delete_supervisions",
                "delete_internship",
            ]
        );
    }

    #[tokio::test]
    async fn missing_internship_is_not_found_without_writes() {
        let db = setup_test_db().await;
        seed_internship(&db, "y", &SHAPE).await;
        let before = snapshot(&db).await;

        let outcome = InternshipRemoval::new(fast_policy()).run(&db, 9_999).await;

        assert_eq!(outcome, RemovalOutcome::NotFound);
        assert_eq!(snapshot(&db).await, before);
    }

    #[tokio::test]
    async fn removes_full_closure_with_counts() {
        let db = setup_test_db().await;
        let x = seed_internship(&db, "x", &SHAPE).await;

        let outcome = InternshipRemoval::new(fast_policy()).run(&db, x).await;

        let tasks = (SHAPE.supervisions * SHAPE.tasks) as u64;
        let submissions = tasks * SHAPE.submissions as u64;
        assert_eq!(
            outcome,
            RemovalOutcome::Deleted(RemovalCounts {
                feedback: submissions * SHAPE.feedback as u64,
                task_submissions: submissions,
                tasks,
                reports: SHAPE.reports as u64,
                applications: SHAPE.applications as u64,
                supervisions: SHAPE.supervisions as u64,
                internships: 1,
            })
        );

        let after = snapshot(&db).await;
        assert!(after["internships"].is_empty());
        for table in [
            "supervisions",
            "tasks",
            "task_submissions",
            "feedback",
            "reports",
            "applications",
        ] {
            assert!(after[table].is_empty(), "{table} not emptied");
        }
        // Users are not part of the closure.
        assert!(!after["users"].is_empty());
    }

    #[tokio::test]
    async fn second_removal_is_not_found_and_changes_nothing() {
        let db = setup_test_db().await;
        let x = seed_internship(&db, "x", &SHAPE).await;
        let removal = InternshipRemoval::new(fast_policy());

        assert_eq!(removal.run(&db, x).await.label(), "deleted");
        let after_first = snapshot(&db).await;

        assert_eq!(removal.run(&db, x).await, RemovalOutcome::NotFound);
        assert_eq!(snapshot(&db).await, after_first);
    }

    #[tokio::test]
    async fn other_internships_are_untouched() {
        let db = setup_test_db().await;
        let x = seed_internship(&db, "x", &SHAPE).await;
        let y = seed_internship(&db, "y", &SHAPE).await;

        let y_refs_before = references_to(&db, y).await;
        let before = snapshot(&db).await;

        InternshipRemoval::new(fast_policy()).run(&db, x).await;

        let after = snapshot(&db).await;
        assert_eq!(after["internships"], vec![y]);
        assert_eq!(references_to(&db, y).await, y_refs_before);
        assert_eq!(references_to(&db, x).await, 0);
        assert_eq!(after["tasks"].len(), before["tasks"].len() / 2);
        assert_eq!(after["feedback"].len(), before["feedback"].len() / 2);
    }

    #[tokio::test]
    async fn transient_contention_is_retried_to_the_same_result() {
        // Reference: a clean run on an identical store.
        let clean_db = setup_test_db().await;
        let x_clean = seed_internship(&clean_db, "x", &SHAPE).await;
        seed_internship(&clean_db, "y", &SHAPE).await;
        let clean = InternshipRemoval::new(fast_policy()).run(&clean_db, x_clean).await;

        let db = setup_test_db().await;
        let x = seed_internship(&db, "x", &SHAPE).await;
        seed_internship(&db, "y", &SHAPE).await;

        // Fails after every delete has run, so each rollback is exercised.
        let flaky = FlakyStep::new(4);
        let removal = InternshipRemoval::with_plan(plan_with(flaky.clone()), fast_policy());
        let outcome = removal.run(&db, x).await;

        assert_eq!(flaky.calls.load(Ordering::SeqCst), 5);
        assert_eq!(outcome, clean);
        assert_eq!(snapshot(&db).await, snapshot(&clean_db).await);
    }

    #[tokio::test]
    async fn exhausted_retries_fail_and_leave_store_unchanged() {
        let db = setup_test_db().await;
        let x = seed_internship(&db, "x", &SHAPE).await;
        let before = snapshot(&db).await;

        let flaky = FlakyStep::new(5);
        let removal = InternshipRemoval::with_plan(plan_with(flaky.clone()), fast_policy());
        let outcome = removal.run(&db, x).await;

        match outcome {
            RemovalOutcome::Failed {
                attempts,
                diagnostic,
            } => {
                assert_eq!(attempts, 5);
                assert!(diagnostic.contains("database is locked"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 5);
        assert_eq!(snapshot(&db).await, before);
    }

    #[tokio::test]
    async fn fatal_error_fails_on_first_attempt() {
        let db = setup_test_db().await;
        let x = seed_internship(&db, "x", &SHAPE).await;
        let before = snapshot(&db).await;

        let removal = InternshipRemoval::with_plan(plan_with(Arc::new(BrokenStep)), fast_policy());
        let outcome = removal.run(&db, x).await;

        assert!(matches!(outcome, RemovalOutcome::Failed { attempts: 1, .. }));
        assert_eq!(snapshot(&db).await, before);
    }

    #[tokio::test]
    async fn internship_without_dependants_is_removed() {
        let db = setup_test_db().await;
        let empty = Shape {
            supervisions: 0,
            tasks: 0,
            submissions: 0,
            feedback: 0,
            reports: 0,
            applications: 0,
        };
        let x = seed_internship(&db, "bare", &empty).await;

        let outcome = InternshipRemoval::new(fast_policy()).run(&db, x).await;
        assert_eq!(
            outcome,
            RemovalOutcome::Deleted(RemovalCounts {
                internships: 1,
                ..Default::default()
            })
        );
    }
}
