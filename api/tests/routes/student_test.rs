#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, body_json, create_user, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
    };
    use db::models::application::{self, ApplicationStatus};
    use db::models::internship::{self, NewInternship};
    use db::models::user::Role;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;
    use util::state::AppState;

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

    async fn posting(state: &AppState, title: &str) -> internship::Model {
        internship::Model::create(
            state.db(),
            NewInternship {
                title: title.into(),
                company: "Acme".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn applying_twice_keeps_one_application() {
        let (app, state) = make_test_app().await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;
        let token = bearer(&student);
        let post = posting(&state, "Backend Intern").await;
        let body = json!({ "internship_id": post.id });

        let first = app
            .clone()
            .oneshot(request("POST", "/api/student/apply", &token, Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let first = body_json(first).await;
        assert_eq!(first["data"]["status"], "pending");

        let second = app
            .oneshot(request("POST", "/api/student/apply", &token, Some(body)))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let second = body_json(second).await;
        assert_eq!(second["message"], "Already applied");
        assert_eq!(second["data"]["id"], first["data"]["id"]);

        let rows = application::Entity::find().all(state.db()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn applying_to_missing_internship_is_404() {
        let (app, state) = make_test_app().await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/student/apply",
                &bearer(&student),
                Some(json!({ "internship_id": 999 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Internship not found");
    }

    #[tokio::test]
    #[serial]
    async fn withdraw_only_removes_pending_applications() {
        let (app, state) = make_test_app().await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;
        let token = bearer(&student);
        let open = posting(&state, "Open").await;
        let decided = posting(&state, "Decided").await;

        application::Model::create_pending(state.db(), student.id, open.id)
            .await
            .unwrap();
        let approved = application::Model::create_pending(state.db(), student.id, decided.id)
            .await
            .unwrap();
        let mut active: application::ActiveModel = approved.into();
        active.status = Set(ApplicationStatus::Approved);
        active.update(state.db()).await.unwrap();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/student/withdraw",
                &token,
                Some(json!({ "internship_id": open.id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], true);

        let response = app
            .oneshot(request(
                "POST",
                "/api/student/withdraw",
                &token,
                Some(json!({ "internship_id": decided.id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], false);

        let remaining = application::Entity::find().all(state.db()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].internship_id, decided.id);
    }

    #[tokio::test]
    #[serial]
    async fn dashboard_reports_applications_and_counts() {
        let (app, state) = make_test_app().await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;
        let first = posting(&state, "First").await;
        posting(&state, "Second").await;
        application::Model::create_pending(state.db(), student.id, first.id)
            .await
            .unwrap();

        let response = app
            .oneshot(request("GET", "/api/student/dashboard", &bearer(&student), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["internships"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["applied_internship_ids"], json!([first.id]));
        assert_eq!(json["data"]["counts"]["total"], 1);
        assert_eq!(json["data"]["counts"]["pending"], 1);
        assert!(json["data"]["active_internship"].is_null());
    }

    #[tokio::test]
    #[serial]
    async fn profile_update_keeps_blank_fields_and_clears_phone() {
        let (app, state) = make_test_app().await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;

        let response = app
            .oneshot(request(
                "PUT",
                "/api/student/profile",
                &bearer(&student),
                Some(json!({ "name": "  ", "phone": "", "cv_url": "https://cv.example/s.pdf" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["name"], "Test User");
        assert!(json["data"]["phone"].is_null());
        assert_eq!(json["data"]["cv_url"], "https://cv.example/s.pdf");
    }
}
