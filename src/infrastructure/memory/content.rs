//! In-memory content store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{ContentItem, ContentRepository, DomainResult};

#[derive(Default)]
struct Inner {
    by_id: HashMap<i64, ContentItem>,
    next_id: i64,
}

pub struct InMemoryContentStore {
    inner: RwLock<Inner>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentStore {
    async fn create(&self, mut item: ContentItem) -> DomainResult<ContentItem> {
        let mut inner = self.inner.write().await;

        item.id = inner.next_id;
        item.created_at = Utc::now();
        item.updated_at = item.created_at;
        inner.next_id += 1;

        inner.by_id.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<ContentItem>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn list_by_module(&self, module_id: i64) -> DomainResult<Vec<ContentItem>> {
        let inner = self.inner.read().await;
        let mut out: Vec<ContentItem> = inner
            .by_id
            .values()
            .filter(|c| c.module_id == module_id)
            .cloned()
            .collect();
        out.sort_by_key(|c| c.position);
        Ok(out)
    }

    async fn update(&self, mut item: ContentItem) -> DomainResult<()> {
        let mut inner = self.inner.write().await;

        // Unknown ids are silently ignored.
        if inner.by_id.contains_key(&item.id) {
            item.updated_at = Utc::now();
            inner.by_id.insert(item.id, item);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> DomainResult<()> {
        let mut inner = self.inner.write().await;
        inner.by_id.remove(&id);
        Ok(())
    }
}
