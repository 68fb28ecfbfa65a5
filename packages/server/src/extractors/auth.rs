use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated account extracted from the `Authorization: Bearer <token>` header.
///
/// Sign-up, login and session handling live in the hosted auth service; this
/// extractor only verifies the token it issued and normalizes the claims into
/// one internal shape, so nothing downstream ever branches on provider
/// response formats. Add this as a handler parameter to require
/// authentication; `owner_id` scopes every record query.
pub struct AuthUser {
    pub owner_id: Uuid,
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        let owner_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            owner_id,
            email: claims.email,
        })
    }
}
