//! Product Service
//!
//! Read-through cache in front of a [`ProductStore`]. Reads are served from
//! memory when possible; every successful mutation writes through to the store
//! first and then drops the affected cache entries, so the next read reloads
//! exactly what the store persisted.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::cache::{CacheStats, CacheStore};
use crate::error::StoreError;
use crate::products::{Product, ProductStore};

// == Cache Keys ==
/// The two key spaces of the product cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full product collection
    AllProducts,
    /// A single product
    Product(Uuid),
}

/// Value stored under a [`CacheKey`].
#[derive(Debug, Clone)]
pub enum CachedValue {
    Collection(Vec<Product>),
    Single(Product),
}

pub type ProductCache = CacheStore<CacheKey, CachedValue>;

// == Product Service ==
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    cache: Arc<RwLock<ProductCache>>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, cache: ProductCache) -> Self {
        Self {
            store,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Shared handle to the cache, used by the background cleanup task.
    pub fn cache(&self) -> Arc<RwLock<ProductCache>> {
        Arc::clone(&self.cache)
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Reads ==
    /// Returns every product, from cache when fresh.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Product>, StoreError> {
        let epoch = {
            // Write lock: a hit updates LRU order and stats
            let mut cache = self.cache.write().await;
            if let Some(CachedValue::Collection(products)) = cache.get(&CacheKey::AllProducts) {
                debug!("Cache hit for product collection");
                return Ok(products);
            }
            cache.epoch()
        };

        debug!("Cache miss for product collection, reading store");
        let products = self
            .store
            .find_all()
            .await
            .inspect_err(|e| warn!("Store find_all failed: {}", e))?;

        let stored = self.cache.write().await.insert_if_current(
            CacheKey::AllProducts,
            CachedValue::Collection(products.clone()),
            epoch,
        );
        if !stored {
            debug!("Product collection changed during load, result not cached");
        }
        Ok(products)
    }

    /// Returns the product `id`; not-found results are never cached.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let key = CacheKey::Product(id);
        let epoch = {
            let mut cache = self.cache.write().await;
            if let Some(CachedValue::Single(product)) = cache.get(&key) {
                debug!(%id, "Cache hit for product");
                return Ok(Some(product));
            }
            cache.epoch()
        };

        debug!(%id, "Cache miss for product, reading store");
        let found = self
            .store
            .find_by_id(id)
            .await
            .inspect_err(|e| warn!(%id, "Store find_by_id failed: {}", e))?;

        if let Some(product) = &found {
            self.cache
                .write()
                .await
                .insert_if_current(key, CachedValue::Single(product.clone()), epoch);
        }
        Ok(found)
    }

    // == Writes ==
    /// Persists a new product and drops the cached collection.
    ///
    /// Per-product entries of other products stay valid.
    #[instrument(level = "debug", skip(self, product), fields(id = %product.id))]
    pub async fn create(&self, product: Product) -> Result<Product, StoreError> {
        let saved = self
            .store
            .save(product)
            .await
            .inspect_err(|e| warn!("Store save failed: {}", e))?;

        self.invalidate(&[CacheKey::AllProducts]).await;
        Ok(saved)
    }

    /// Replaces product `id`, keeping its id and creation time.
    ///
    /// Returns `None` without touching the cache when the product does not exist.
    #[instrument(level = "debug", skip(self, product))]
    pub async fn update(&self, id: Uuid, product: Product) -> Result<Option<Product>, StoreError> {
        let Some(existing) = self
            .store
            .find_by_id(id)
            .await
            .inspect_err(|e| warn!(%id, "Store find_by_id failed: {}", e))?
        else {
            return Ok(None);
        };

        let replacement = Product {
            id: existing.id,
            created_at: existing.created_at,
            ..product
        };
        let saved = self
            .store
            .save(replacement)
            .await
            .inspect_err(|e| warn!(%id, "Store save failed: {}", e))?;

        self.invalidate(&[CacheKey::AllProducts, CacheKey::Product(id)])
            .await;
        Ok(Some(saved))
    }

    /// Deletes product `id`; the cache is only touched when the store deleted it.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await
            .inspect_err(|e| warn!(%id, "Store delete_by_id failed: {}", e))?;

        if deleted {
            self.invalidate(&[CacheKey::AllProducts, CacheKey::Product(id)])
                .await;
        }
        Ok(deleted)
    }

    async fn invalidate(&self, keys: &[CacheKey]) {
        let mut cache = self.cache.write().await;
        for key in keys {
            let present = cache.invalidate(key);
            debug!(?key, present, "Invalidated cache entry");
        }
    }
}
