use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use util::config;

use crate::auth::claims::{AuthUser, Claims};

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Extracts `AuthUser` from a Bearer token, or from a `?token=` query
/// parameter for websocket upgrades where browsers cannot set headers.
///
/// # Errors
/// `401 Unauthorized` if no token is present or it fails verification.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_owned());

        let token = match header_token {
            Some(t) => t,
            None => Query::<TokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(q)| q.token)
                .ok_or((StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"))?,
        };

        let token_data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(AuthUser(token_data.claims))
    }
}
