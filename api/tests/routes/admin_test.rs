#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, body_json, create_user, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
    };
    use db::models::application;
    use db::models::internship::{self, NewInternship};
    use db::models::user::{self, Role};
    use sea_orm::EntityTrait;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/json");
        match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    #[serial]
    async fn approve_only_moves_pending_applications() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;
        let token = bearer(&admin);
        let post = internship::Model::create(
            state.db(),
            NewInternship {
                title: "Backend Intern".into(),
                company: "Acme".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let pending = application::Model::create_pending(state.db(), student.id, post.id)
            .await
            .unwrap();
        let uri = format!("/api/admin/applications/{}/approve", pending.id);

        let response = app
            .clone()
            .oneshot(request("POST", &uri, &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "approved");
        assert_eq!(json["data"]["reviewed_by"], admin.id);

        let reject_uri = format!("/api/admin/applications/{}/reject", pending.id);
        let response = app
            .clone()
            .oneshot(request("POST", &reject_uri, &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "approved");
        assert_eq!(json["message"], "Application is no longer pending; nothing changed");

        let response = app
            .oneshot(request("POST", "/api/admin/applications/4040/approve", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn create_internship_requires_title_and_company() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/admin/internships",
                &bearer(&admin),
                Some(json!({ "title": "No company" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Title and company are required.");
    }

    #[tokio::test]
    #[serial]
    async fn create_internship_with_mentor_assigns_supervision() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let mentor = create_user(&state, Role::Mentor, "mentor@uni.ac.za").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/admin/internships",
                &bearer(&admin),
                Some(json!({
                    "title": "Data Intern",
                    "company": "Acme",
                    "start_date": "not-a-date",
                    "end_date": "2025-06-30",
                    "mentor_id": mentor.id.to_string()
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "open");
        assert!(json["data"]["start_date"].is_null());
        assert_eq!(json["data"]["end_date"], "2025-06-30");

        let supervisions = db::models::internship_supervision::Entity::find()
            .all(state.db())
            .await
            .unwrap();
        assert_eq!(supervisions.len(), 1);
        assert_eq!(supervisions[0].mentor_id, mentor.id);
        assert!(supervisions[0].active);
    }

    #[tokio::test]
    #[serial]
    async fn task_with_bad_deadline_is_rejected() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let mentor = create_user(&state, Role::Mentor, "mentor@uni.ac.za").await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/admin/tasks",
                &bearer(&admin),
                Some(json!({
                    "title": "Write report",
                    "mentor_id": mentor.id,
                    "student_id": student.id,
                    "deadline": "31/12/2025"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Deadline must be a date in YYYY-MM-DD format");
    }

    #[tokio::test]
    #[serial]
    async fn deleting_missing_task_is_404() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;

        let response = app
            .oneshot(request("DELETE", "/api/admin/tasks/77", &bearer(&admin), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn create_user_falls_back_to_student_and_rejects_duplicates() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let token = bearer(&admin);
        let body = json!({
            "name": "Thabo",
            "email": "thabo@uni.ac.za",
            "password": "changeme",
            "role": "overlord",
            "department_name": "Computer Science"
        });

        let response = app
            .clone()
            .oneshot(request("POST", "/api/admin/users", &token, Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["role"], "student");
        assert_eq!(json["data"]["status"], "active");
        assert!(json["data"]["department_id"].is_i64());

        let response = app
            .oneshot(request("POST", "/api/admin/users", &token, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Email already exists.");
    }

    #[tokio::test]
    #[serial]
    async fn admin_cannot_delete_own_account() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let uri = format!("/api/admin/users/{}", admin.id);

        let response = app
            .oneshot(request("DELETE", &uri, &bearer(&admin), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        assert!(user::Entity::find_by_id(admin.id)
            .one(state.db())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    #[serial]
    async fn admin_deletes_other_user() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;
        let token = bearer(&admin);
        let uri = format!("/api/admin/users/{}", student.id);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("DELETE", &uri, &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn dashboard_normalises_user_search() {
        let (app, state) = make_test_app().await;
        let admin = create_user(&state, Role::Admin, "admin@uni.ac.za").await;
        create_user(&state, Role::Student, "zanele@uni.ac.za").await;

        let response = app
            .oneshot(request(
                "GET",
                "/api/admin/dashboard?search_email=ZANELE&page=0&page_size=7",
                &bearer(&admin),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let search = &json["data"]["user_search"];
        assert_eq!(search["search"]["field"], "email");
        assert_eq!(search["search"]["page"], 1);
        assert_eq!(search["search"]["page_size"], 10);
        assert_eq!(search["total"], 1);
        assert_eq!(search["results"][0]["email"], "zanele@uni.ac.za");
        assert_eq!(json["data"]["totals"]["students"], 1);
    }
}
