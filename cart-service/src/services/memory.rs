use crate::models::CartItem;
use crate::services::store::{CartStore, StoreError};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local store with the same semantics as [`MongoCartStore`].
///
/// Items are listed in identifier order, which follows creation order.
///
/// [`MongoCartStore`]: crate::services::MongoCartStore
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    items: RwLock<BTreeMap<ObjectId, Document>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn insert(&self, fields: Document) -> Result<CartItem, StoreError> {
        let item = CartItem::new(ObjectId::new(), fields);
        self.items.write().await.insert(item.id, item.fields.clone());
        Ok(item)
    }

    async fn find_all(&self) -> Result<Vec<CartItem>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .map(|(id, fields)| CartItem::new(*id, fields.clone()))
            .collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<CartItem>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .get(&id)
            .map(|fields| CartItem::new(id, fields.clone())))
    }

    async fn merge(
        &self,
        id: ObjectId,
        fields: Document,
    ) -> Result<Option<CartItem>, StoreError> {
        let mut items = self.items.write().await;
        let Some(existing) = items.get_mut(&id) else {
            return Ok(None);
        };
        for (key, value) in fields {
            existing.insert(key, value);
        }
        Ok(Some(CartItem::new(id, existing.clone())))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = InMemoryCartStore::new();
        let a = store.insert(doc! { "product": "pen" }).await.unwrap();
        let b = store.insert(doc! { "product": "pen" }).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn merge_is_shallow_and_keeps_other_fields() {
        let store = InMemoryCartStore::new();
        let item = store
            .insert(doc! { "product": "pen", "quantity": 1, "meta": { "a": 1, "b": 2 } })
            .await
            .unwrap();

        let merged = store
            .merge(item.id, doc! { "quantity": 3, "meta": { "a": 9 } })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(merged.fields.get_str("product").unwrap(), "pen");
        assert_eq!(merged.fields.get_i32("quantity").unwrap(), 3);
        assert_eq!(merged.fields.get_document("meta").unwrap(), &doc! { "a": 9 });
        assert_eq!(store.find_by_id(item.id).await.unwrap(), Some(merged));
    }

    #[tokio::test]
    async fn merge_and_delete_report_missing_items() {
        let store = InMemoryCartStore::new();
        let id = ObjectId::new();
        assert!(store.merge(id, doc! { "quantity": 1 }).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let store = InMemoryCartStore::new();
        let keep = store.insert(doc! { "product": "a" }).await.unwrap();
        let gone = store.insert(doc! { "product": "b" }).await.unwrap();

        assert!(store.delete(gone.id).await.unwrap());
        assert!(!store.delete(gone.id).await.unwrap());

        let remaining = store.find_all().await.unwrap();
        assert_eq!(remaining, vec![keep]);
    }
}
