use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::Role;

#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardResult = Result<Response, (StatusCode, Json<ApiResponse<Empty>>)>;

/// Validates the bearer token and stores the `AuthUser` in request extensions.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_role(req: Request<Body>, next: Next, role: Role, failure_msg: &str) -> GuardResult {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if user.role() != role {
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))));
    }

    Ok(next.run(req).await)
}

/// Any valid token.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> GuardResult {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

pub async fn allow_student(req: Request<Body>, next: Next) -> GuardResult {
    allow_role(req, next, Role::Student, "Student access required").await
}

pub async fn allow_mentor(req: Request<Body>, next: Next) -> GuardResult {
    allow_role(req, next, Role::Mentor, "Mentor access required").await
}

/// Admin-only guard.
pub async fn allow_admin(req: Request<Body>, next: Next) -> GuardResult {
    allow_role(req, next, Role::Admin, "Admin access required").await
}
