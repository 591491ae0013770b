use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{ProfileResponse, service_error};
use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use util::state::AppState;

/// GET /clients
///
/// Client profiles, for employees opening tickets on a client's behalf.
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match state.tickets().list_clients(&user.actor()).await {
        Ok(clients) => {
            let clients: Vec<ProfileResponse> = clients.into_iter().map(Into::into).collect();
            Json(ApiResponse::success(clients, "Clients retrieved")).into_response()
        }
        Err(e) => service_error(e),
    }
}
