use crate::models::cart_item::ID_FIELD;
use crate::models::CartItem;
use crate::services::store::{CartStore, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

pub const CARTS_COLLECTION: &str = "carts";

#[derive(Clone)]
pub struct MongoCartStore {
    client: MongoClient,
    db: Database,
}

impl MongoCartStore {
    /// Creates the client and pings the server so an unreachable database
    /// fails startup rather than the first request.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let store = Self { client, db };

        store.health_check().await.map_err(|e| {
            tracing::error!("Failed to reach MongoDB: {}", e);
            AppError::storage("Failed to connect to MongoDB.", e)
        })?;

        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(store)
    }

    pub fn carts(&self) -> Collection<Document> {
        self.db.collection(CARTS_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

fn to_cart_item(document: Document) -> Result<CartItem, StoreError> {
    CartItem::from_document(document).map_err(|e| StoreError::MalformedDocument(e.to_string()))
}

/// Keeps every document with an ObjectId `_id`. The rest are logged and skipped.
fn collect_cart_items(documents: Vec<Document>) -> Vec<CartItem> {
    documents
        .into_iter()
        .filter_map(|document| {
            let raw_id = document.get(ID_FIELD).cloned();
            match CartItem::from_document(document) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(
                        document_id = ?raw_id,
                        error = %e,
                        "Skipping cart document without ObjectId _id"
                    );
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl CartStore for MongoCartStore {
    async fn insert(&self, fields: Document) -> Result<CartItem, StoreError> {
        let result = self.carts().insert_one(&fields, None).await.map_err(|e| {
            tracing::error!("Failed to insert cart item: {}", e);
            StoreError::from(e)
        })?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::MalformedDocument(format!(
                "inserted _id is not an ObjectId: {}",
                result.inserted_id
            ))
        })?;

        Ok(CartItem::new(id, fields))
    }

    async fn find_all(&self) -> Result<Vec<CartItem>, StoreError> {
        let cursor = self.carts().find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to query cart items: {}", e);
            StoreError::from(e)
        })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to read cart items cursor: {}", e);
            StoreError::from(e)
        })?;

        Ok(collect_cart_items(documents))
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<CartItem>, StoreError> {
        self.carts()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(cart_item_id = %id, "Failed to find cart item: {}", e);
                StoreError::from(e)
            })?
            .map(to_cart_item)
            .transpose()
    }

    async fn merge(
        &self,
        id: ObjectId,
        fields: Document,
    ) -> Result<Option<CartItem>, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.carts()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields }, options)
            .await
            .map_err(|e| {
                tracing::error!(cart_item_id = %id, "Failed to update cart item: {}", e);
                StoreError::from(e)
            })?
            .map(to_cart_item)
            .transpose()
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self
            .carts()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(cart_item_id = %id, "Failed to delete cart item: {}", e);
                StoreError::from(e)
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_skips_documents_without_object_id() {
        let id = ObjectId::new();
        let documents = vec![
            doc! { "_id": id, "product": "pen", "quantity": 1 },
            doc! { "_id": "imported-by-hand", "product": "ink", "quantity": 2 },
            doc! { "product": "nib", "quantity": 3 },
        ];

        let items = collect_cart_items(documents);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].fields.get_str("product").unwrap(), "pen");
    }
}
