//! `AuthUser` extractor — verifies the bearer token and injects context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use coedit_core::error::AppError;
use coedit_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller context available in handlers.
///
/// The parent platform issues bearer tokens in the same HMAC format as
/// editor tokens, carrying the caller's identity and role.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let claims = state
            .tokens
            .verify(token)
            .map_err(|e| AppError::unauthorized(e.to_string()))?;

        let ctx = RequestContext::from_claims(&claims)?;
        Ok(AuthUser(ctx))
    }
}
