#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, body_json, create_user, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use chrono::Utc;
    use db::models::feedback::{self, FeedbackRating};
    use db::models::internship::{self, NewInternship};
    use db::models::task_submission::{self, SubmissionStatus};
    use db::models::user::Role;
    use db::models::{application, internship_supervision, report, task};
    use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};
    use serial_test::serial;
    use tower::ServiceExt;
    use util::state::AppState;

    fn delete(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(AUTHORIZATION, token)
            .body(Body::empty())
            .unwrap()
    }

    /// One internship with a supervision, a task, a submission with feedback,
    /// a report and an application.
    async fn seed(state: &AppState, tag: &str) -> i64 {
        let db = state.db();
        let mentor = create_user(state, Role::Mentor, &format!("mentor-{tag}@uni.ac.za")).await;
        let student = create_user(state, Role::Student, &format!("student-{tag}@uni.ac.za")).await;
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
        let task = task::Model::create(
            db,
            task::NewTask {
                supervision_id: Some(supervision.id),
                student_id: student.id,
                assigned_by: mentor.id,
                title: format!("Task {tag}"),
                description: None,
                due_date: None,
            },
        )
        .await
        .unwrap();
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
        feedback::ActiveModel {
            student_id: Set(student.id),
            mentor_id: Set(mentor.id),
            task_submission_id: Set(Some(submission.id)),
            rating: Set(Some(FeedbackRating::Excellent)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        report::ActiveModel {
            student_id: Set(student.id),
            internship_id: Set(posting.id),
            title: Set(format!("Report {tag}")),
            issued_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        application::Model::create_pending(db, student.id, posting.id)
            .await
            .unwrap();

        posting.id
    }

    #[tokio::test]
    #[serial]
    async fn delete_removes_whole_closure_then_becomes_a_no_op() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let token = bearer(&admin);
        let target = seed(&state, "x").await;
        let other = seed(&state, "y").await;
        let uri = format!("/api/admin/internships/{target}");

        let response = app.clone().oneshot(delete(&uri, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Internship deleted");
        assert_eq!(json["data"]["outcome"], "deleted");
        let counts = &json["data"]["counts"];
        for key in [
            "feedback",
            "task_submissions",
            "tasks",
            "reports",
            "applications",
            "supervisions",
            "internships",
        ] {
            assert_eq!(counts[key], 1, "{key}");
        }

        let response = app.oneshot(delete(&uri, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Internship not found");
        assert_eq!(json["data"]["outcome"], "not_found");
        assert!(json["data"]["counts"].is_null());

        let db = state.db();
        assert!(internship::Entity::find_by_id(target).one(db).await.unwrap().is_none());
        assert!(internship::Entity::find_by_id(other).one(db).await.unwrap().is_some());
        assert_eq!(task::Entity::find().count(db).await.unwrap(), 1);
        assert_eq!(feedback::Entity::find().count(db).await.unwrap(), 1);
        assert_eq!(application::Entity::find().count(db).await.unwrap(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn storage_failure_is_500_and_rolls_back() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let target = seed(&state, "x").await;

        // Reports are removed after tasks, so the failure lands mid-cascade.
        let db = state.db();
        report::Entity::delete_many().exec(db).await.unwrap();
        db.execute_unprepared("DROP TABLE reports").await.unwrap();

        let uri = format!("/api/admin/internships/{target}");
        let response = app.oneshot(delete(&uri, &bearer(&admin))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["outcome"], "failed");
        assert_eq!(json["message"], "Failed to delete internship");

        assert!(internship::Entity::find_by_id(target).one(db).await.unwrap().is_some());
        assert_eq!(task::Entity::find().count(db).await.unwrap(), 1);
        assert_eq!(task_submission::Entity::find().count(db).await.unwrap(), 1);
        assert_eq!(feedback::Entity::find().count(db).await.unwrap(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn non_numeric_id_is_rejected_before_any_work() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;

        let response = app
            .oneshot(delete("/api/admin/internships/abc", &bearer(&admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
