use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Extracts the user, puts it in the request extensions and hands both back.
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

/// Any signed-in user.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> Response {
    match extract_and_insert_authuser(req).await {
        Ok((req, _)) => next.run(req).await,
        Err(rejection) => rejection.into_response(),
    }
}

/// Employees only. Clients get `403 Forbidden`.
pub async fn allow_employee(req: Request<Body>, next: Next) -> Response {
    let (req, user) = match extract_and_insert_authuser(req).await {
        Ok(pair) => pair,
        Err(rejection) => return rejection.into_response(),
    };

    if !user.is_employee() {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error("Employees only")),
        )
            .into_response();
    }

    next.run(req).await
}
