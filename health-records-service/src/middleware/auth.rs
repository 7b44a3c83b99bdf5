use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;

use crate::services::SessionClaims;
use crate::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated caller.
///
/// Resolved from `Authorization: Bearer <jwt>` or, for browser sessions, the
/// `access_token` cookie. Handlers take this as their first extractor so a
/// missing or invalid identity is rejected with 401 before any data access.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionClaims);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.sub
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!("Missing authentication token"))
            })?;

        let claims = state.jwt.verify(&token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token"))
        })?;

        // Add to tracing span for observability
        tracing::Span::current().record("user_id", claims.sub.as_str());

        Ok(AuthUser(claims))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
