//! Trusted identity forwarded by the edge gateway.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::{UserId, headers};

use crate::error::ApiError;

/// The already-authenticated caller.
///
/// The gateway verifies bearer tokens and forwards the claims as headers;
/// this service only requires that they are present.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        let raw = header(headers::USER_ID).ok_or_else(|| {
            ApiError::Unauthenticated(format!("missing {} header", headers::USER_ID))
        })?;
        let user_id = raw.parse().map_err(|_| {
            ApiError::Unauthenticated(format!("invalid {} header: {raw}", headers::USER_ID))
        })?;

        Ok(AuthenticatedUser {
            user_id,
            username: header(headers::USERNAME),
        })
    }
}
