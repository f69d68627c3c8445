use crate::models::cart_item::{parse_id, INVALID_ID_MESSAGE};
use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// `:id` path segment parsed as an ObjectId.
///
/// Undecodable segments and malformed ids are both rejected as
/// "Invalid cart item ID." before any store access.
#[derive(Debug, Clone, Copy)]
pub struct CartItemId(pub ObjectId);

#[async_trait]
impl<S> FromRequestParts<S> for CartItemId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "Rejected cart item path");
                AppError::ValidationError(INVALID_ID_MESSAGE.to_string())
            })?;

        parse_id(&raw).map(CartItemId)
    }
}
