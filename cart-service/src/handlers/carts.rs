use crate::dtos::{CartItemEnvelope, MessageResponse};
use crate::middleware::CartItemId;
use crate::models::{CartItem, CartItemPatch, NewCartItem};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde_json::{Map, Value};
use service_core::error::AppError;

pub const NOT_FOUND_MESSAGE: &str = "Cart item not found.";

pub const CREATED_MESSAGE: &str = "Cart item created successfully";
pub const UPDATED_MESSAGE: &str = "Cart item updated successfully";
pub const DELETED_MESSAGE: &str = "Cart item deleted successfully.";

pub const CREATE_FAILED: &str = "Failed to create cart item.";
pub const LIST_FAILED: &str = "Failed to retrieve cart items.";
pub const GET_FAILED: &str = "Failed to retrieve cart item.";
pub const UPDATE_FAILED: &str = "Failed to update cart item.";
pub const DELETE_FAILED: &str = "Failed to delete cart item.";

type JsonObject = WithRejection<Json<Map<String, Value>>, AppError>;

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND_MESSAGE.to_string())
}

#[tracing::instrument(skip(state, body))]
pub async fn create_cart_item(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonObject,
) -> Result<(StatusCode, Json<CartItemEnvelope>), AppError> {
    let new_item = NewCartItem::try_from(body)?;

    let item = state
        .store
        .insert(new_item.into_fields())
        .await
        .map_err(|e| AppError::storage(CREATE_FAILED, e))?;

    tracing::info!(cart_item_id = %item.id, "Cart item created");

    Ok((
        StatusCode::CREATED,
        Json(CartItemEnvelope::new(CREATED_MESSAGE, item)),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn list_cart_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<CartItem>>, AppError> {
    let items = state
        .store
        .find_all()
        .await
        .map_err(|e| AppError::storage(LIST_FAILED, e))?;

    Ok(Json(items))
}

#[tracing::instrument(skip(state))]
pub async fn get_cart_item(
    State(state): State<AppState>,
    CartItemId(id): CartItemId,
) -> Result<Json<CartItem>, AppError> {
    state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| AppError::storage(GET_FAILED, e))?
        .map(Json)
        .ok_or_else(not_found)
}

#[tracing::instrument(skip(state, body))]
pub async fn update_cart_item(
    State(state): State<AppState>,
    CartItemId(id): CartItemId,
    WithRejection(Json(body), _): JsonObject,
) -> Result<Json<CartItemEnvelope>, AppError> {
    let patch = CartItemPatch::try_from(body)?;

    let item = state
        .store
        .merge(id, patch.into_fields())
        .await
        .map_err(|e| AppError::storage(UPDATE_FAILED, e))?
        .ok_or_else(not_found)?;

    tracing::info!(cart_item_id = %item.id, "Cart item updated");

    Ok(Json(CartItemEnvelope::new(UPDATED_MESSAGE, item)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_cart_item(
    State(state): State<AppState>,
    CartItemId(id): CartItemId,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(|e| AppError::storage(DELETE_FAILED, e))?;

    if !deleted {
        return Err(not_found());
    }

    tracing::info!(cart_item_id = %id, "Cart item deleted");

    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}
