use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::{
    application::auth_service::CurrentUser,
    domain::{errors::DomainError, user::Role},
    interface::http::problem::{ApiProblem, ApiResult},
    state::AppState,
};

/// Caller identified by `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl AuthUser {
    pub fn require_any(&self, roles: &[Role]) -> ApiResult<()> {
        self.0.require_any(roles).map_err(ApiProblem::from_domain)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiProblem;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let current = state.auth_service.authenticate(token).await?;
        debug!(user_id = %current.id, role = %current.role, "request authenticated");
        Ok(Self(current))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, DomainError> {
    let Some(raw) = parts.headers.get(header::AUTHORIZATION) else {
        return Err(DomainError::unauthorized("missing bearer token"));
    };

    let raw = raw
        .to_str()
        .map_err(|_| DomainError::unauthorized("authorization header must be valid ASCII"))?;

    let Some((scheme, token)) = raw.trim().split_once(' ') else {
        return Err(DomainError::unauthorized("authorization header must be `Bearer <token>`"));
    };
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(DomainError::unauthorized("authorization header must be `Bearer <token>`"));
    }

    Ok(token.trim())
}
