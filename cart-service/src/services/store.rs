use crate::models::CartItem;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Malformed cart document: {0}")]
    MalformedDocument(String),
}

/// Persistence seam for cart items.
///
/// Every method is a single store round-trip; callers never retry.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Persists `fields` under a freshly assigned identifier.
    async fn insert(&self, fields: Document) -> Result<CartItem, StoreError>;

    /// Returns every item in store-defined order.
    async fn find_all(&self) -> Result<Vec<CartItem>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<CartItem>, StoreError>;

    /// Overwrites the top-level keys in `fields` and returns the merged item,
    /// or `None` when nothing matches `id`.
    async fn merge(&self, id: ObjectId, fields: Document)
        -> Result<Option<CartItem>, StoreError>;

    /// Returns `true` when a document was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
