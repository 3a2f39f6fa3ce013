#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, body_json, create_user, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use db::models::user::Role;
    use serial_test::serial;
    use tower::ServiceExt;

    fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn missing_token_is_401() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(get("/api/admin/dashboard", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Authentication required");
    }

    #[tokio::test]
    #[serial]
    async fn garbage_token_is_401() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(get("/api/student/dashboard", Some("Bearer not.a.jwt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn student_cannot_reach_admin_routes() {
        let (app, state) = make_test_app().await;
        let student = create_user(&state, Role::Student, "s@uni.ac.za").await;

        let response = app
            .oneshot(get("/api/admin/dashboard", Some(&bearer(&student))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Admin access required");
    }

    #[tokio::test]
    #[serial]
    async fn mentor_cannot_reach_student_routes() {
        let (app, state) = make_test_app().await;
        let mentor = create_user(&state, Role::Mentor, "m@uni.ac.za").await;

        let response = app
            .oneshot(get("/api/student/dashboard", Some(&bearer(&mentor))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Student access required");
    }

    #[tokio::test]
    #[serial]
    async fn each_role_reaches_its_own_dashboard() {
        let (app, state) = make_test_app().await;
        let cases = [
            (Role::Student, "student@uni.ac.za", "/api/student/dashboard"),
            (Role::Mentor, "mentor@uni.ac.za", "/api/mentor/dashboard"),
            (Role::Admin, "admin@uni.ac.za", "/api/admin/dashboard"),
        ];

        for (role, email, uri) in cases {
            let user = create_user(&state, role, email).await;
            let response = app
                .clone()
                .oneshot(get(uri, Some(&bearer(&user))))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }
}
