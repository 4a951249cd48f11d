//! Product store seam
//!
//! The caching service only depends on [`ProductStore`]; the storage medium
//! behind it is not its concern.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::products::Product;

// == Product Store ==
/// Persistence capability for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Lists every product.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Finds a product by id, `None` when absent.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// Inserts or replaces a product, returning what was persisted.
    async fn save(&self, product: Product) -> Result<Product, StoreError>;

    /// Deletes a product by id, `false` when it did not exist.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;
}

// == In-Memory Store ==
/// HashMap-backed store.
///
/// Saving over an existing id refreshes `updated_at`.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn save(&self, mut product: Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            product.updated_at = Utc::now();
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        Product::new(name.to_string(), format!("{name} description"), 9.99)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemoryProductStore::new();
        let saved = store.save(product("Lamp")).await.unwrap();

        let found = store.find_by_id(saved.id).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_find_all() {
        let store = InMemoryProductStore::new();
        store.save(product("Lamp")).await.unwrap();
        store.save(product("Desk")).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|p| p.name == "Lamp"));
        assert!(all.iter().any(|p| p.name == "Desk"));
    }

    #[tokio::test]
    async fn test_save_existing_refreshes_updated_at() {
        let store = InMemoryProductStore::new();
        let original = store.save(product("Lamp")).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let replaced = store
            .save(Product {
                name: "Lamp v2".into(),
                ..original.clone()
            })
            .await
            .unwrap();

        assert_eq!(replaced.created_at, original.created_at);
        assert!(replaced.updated_at > original.updated_at);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryProductStore::new();
        let saved = store.save(product("Lamp")).await.unwrap();

        assert!(store.delete_by_id(saved.id).await.unwrap());
        assert!(!store.delete_by_id(saved.id).await.unwrap());
        assert_eq!(store.find_by_id(saved.id).await.unwrap(), None);
    }
}
