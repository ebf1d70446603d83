//! In-memory module store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{DomainResult, Module, ModuleRepository};

#[derive(Default)]
struct Inner {
    by_id: HashMap<i64, Module>,
    next_id: i64,
}

pub struct InMemoryModuleStore {
    inner: RwLock<Inner>,
}

impl InMemoryModuleStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for InMemoryModuleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModuleRepository for InMemoryModuleStore {
    async fn create(&self, mut module: Module) -> DomainResult<Module> {
        let mut inner = self.inner.write().await;

        module.id = inner.next_id;
        module.created_at = Utc::now();
        module.updated_at = module.created_at;
        inner.next_id += 1;

        inner.by_id.insert(module.id, module.clone());
        Ok(module)
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Module>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn list_by_course(&self, course_id: i64) -> DomainResult<Vec<Module>> {
        let inner = self.inner.read().await;
        let mut out: Vec<Module> = inner
            .by_id
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        out.sort_by_key(|m| m.position);
        Ok(out)
    }

    async fn update(&self, mut module: Module) -> DomainResult<()> {
        let mut inner = self.inner.write().await;

        // Unknown ids are silently ignored.
        if inner.by_id.contains_key(&module.id) {
            module.updated_at = Utc::now();
            inner.by_id.insert(module.id, module);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> DomainResult<()> {
        let mut inner = self.inner.write().await;
        inner.by_id.remove(&id);
        Ok(())
    }
}
