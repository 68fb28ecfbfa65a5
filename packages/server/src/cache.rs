use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use uuid::Uuid;

use crate::entity::product;

/// Per-owner cache of full product lists.
///
/// Report reads hit the store once per owner; every write path must call
/// `invalidate` for the owner before responding, so a read after the
/// caller's own write never observes stale rows. Eviction only ever causes
/// a re-fetch.
#[derive(Clone)]
pub struct ProductCache {
    inner: Arc<Mutex<LruCache<Uuid, Arc<Vec<product::Model>>>>>,
}

impl ProductCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn get(&self, owner_id: Uuid) -> Option<Arc<Vec<product::Model>>> {
        self.inner.lock().ok()?.get(&owner_id).cloned()
    }

    pub fn put(&self, owner_id: Uuid, products: Vec<product::Model>) -> Arc<Vec<product::Model>> {
        let products = Arc::new(products);
        if let Ok(mut guard) = self.inner.lock() {
            guard.put(owner_id, Arc::clone(&products));
        }
        products
    }

    pub fn invalidate(&self, owner_id: Uuid) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.pop(&owner_id);
        }
    }
}
