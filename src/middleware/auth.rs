use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Authenticated owner identity for the admin API.
///
/// Authentication itself lives in an upstream gateway, which injects the
/// verified owner id as `X-Owner-Id`. Requests without it are rejected.
#[derive(Debug, Clone, Copy)]
pub struct OwnerId(pub Uuid);

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-owner-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Uuid>().ok())
            .map(OwnerId)
            .ok_or_else(|| AppError::Authentication("missing or invalid owner identity".to_string()))
    }
}
