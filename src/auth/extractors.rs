use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::roles::Role;
use crate::{error::AppError, state::AppState, users::repo_types::User};

/// Authenticated user of the current request.
pub struct Principal(pub User);

impl Principal {
    /// Fails with `Forbidden` unless the principal has `role`.
    pub fn require(&self, role: Role, message: &str) -> Result<&User, AppError> {
        if self.0.role == role {
            Ok(&self.0)
        } else {
            warn!(user_id = %self.0.id, role = ?self.0.role, required = ?role, "role mismatch");
            Err(AppError::forbidden(message))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Token tidak ditemukan".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthenticated("Format header Authorization tidak valid".into()))?;

        let claims = state.verifier.verify(token).await.map_err(|e| {
            warn!(error = %e, "token verification failed");
            AppError::InvalidToken("Token tidak valid".into())
        })?;

        let user = state.resolver.resolve(&claims).await?;
        Ok(Principal(user))
    }
}
