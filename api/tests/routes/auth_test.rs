#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, create_user, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use db::models::user::{self, Role, UserStatus};
    use sea_orm::{ActiveModelTrait, Set};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn signup_creates_student_and_returns_token() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(post_json(
                "/api/auth/signup",
                json!({
                    "role": "student",
                    "name": "Ada",
                    "email": "  Ada@Uni.AC.za ",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["user"]["email"], "ada@uni.ac.za");
        assert_eq!(json["data"]["role"], "student");
        assert_eq!(json["data"]["redirect"], "/student_dash");
        assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(json["data"]["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn signup_rejects_non_student_roles() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(post_json(
                "/api/auth/signup",
                json!({ "role": "admin", "name": "Eve", "email": "eve@uni.ac.za", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Only students can sign up.");
    }

    #[tokio::test]
    #[serial]
    async fn signup_rejects_duplicate_email_in_any_case() {
        let (app, state) = make_test_app().await;
        create_user(&state, Role::Student, "taken@uni.ac.za").await;

        let response = app
            .oneshot(post_json(
                "/api/auth/signup",
                json!({ "role": "student", "name": "Bob", "email": "TAKEN@uni.ac.za", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Email already registered.");
    }

    #[tokio::test]
    #[serial]
    async fn login_returns_role_and_redirect() {
        let (app, state) = make_test_app().await;
        create_user(&state, Role::Mentor, "mentor@uni.ac.za").await;

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                json!({ "email": "Mentor@Uni.ac.za", "password": "password1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["role"], "mentor");
        assert_eq!(json["data"]["redirect"], "/mentor_dash");
    }

    #[tokio::test]
    #[serial]
    async fn login_with_wrong_password_is_401() {
        let (app, state) = make_test_app().await;
        create_user(&state, Role::Student, "s@uni.ac.za").await;

        for body in [
            json!({ "email": "s@uni.ac.za", "password": "wrong-pass" }),
            json!({ "email": "nobody@uni.ac.za", "password": "password1" }),
        ] {
            let response = app
                .clone()
                .oneshot(post_json("/api/auth/login", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let json = body_json(response).await;
            assert_eq!(json["message"], "Invalid email or password.");
        }
    }

    #[tokio::test]
    #[serial]
    async fn inactive_account_cannot_log_in() {
        let (app, state) = make_test_app().await;
        let student = create_user(&state, Role::Student, "idle@uni.ac.za").await;

        let mut active: user::ActiveModel = student.into();
        active.status = Set(UserStatus::Inactive);
        active.update(state.db()).await.unwrap();

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                json!({ "email": "idle@uni.ac.za", "password": "password1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
