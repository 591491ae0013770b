use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use db::models::profile::Model as Profile;
use serde::Serialize;
use services::ServiceError;

/// Public view of a profile.
#[derive(Debug, Serialize, Default)]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub company: Option<String>,
    pub last_checked_tickets_at: Option<DateTime<Utc>>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            role: p.role.to_string(),
            company: p.company,
            last_checked_tickets_at: p.last_checked_tickets_at,
        }
    }
}

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a service failure onto the standard error envelope.
pub fn service_error(err: ServiceError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    let message = match err {
        ServiceError::Transport(_) => "Internal server error".to_string(),
        other => other.to_string(),
    };
    (status, Json(ApiResponse::<Empty>::error(message))).into_response()
}
