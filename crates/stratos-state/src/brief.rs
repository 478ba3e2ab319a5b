//! Brief storage: the mutable component sets users assemble step by step

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use stratos_core::brief::{Brief, BriefComponent};
use stratos_core::error::{Result, StratosError};

/// Trait for brief storage backends
#[async_trait]
pub trait BriefStore: Send + Sync {
    /// Creates an empty brief owned by the given user
    async fn create(&self, user_id: Uuid) -> Result<Brief>;

    /// Validates and stores one component, overwriting that slot only
    async fn upsert_component(&self, brief_id: Uuid, component: BriefComponent) -> Result<Brief>;

    /// Fetches a brief by id
    async fn get(&self, brief_id: Uuid) -> Result<Option<Brief>>;

    /// All briefs owned by a user, most recently created first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Brief>>;

    /// Removes a brief
    async fn delete(&self, brief_id: Uuid) -> Result<()>;
}

/// In-memory implementation of [`BriefStore`]
pub struct InMemoryBriefStore {
    briefs: Arc<RwLock<HashMap<Uuid, Brief>>>,
}

impl InMemoryBriefStore {
    pub fn new() -> Self {
        InMemoryBriefStore {
            briefs: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryBriefStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BriefStore for InMemoryBriefStore {
    async fn create(&self, user_id: Uuid) -> Result<Brief> {
        let brief = Brief::new(user_id);
        debug!(brief_id = %brief.id, user_id = %user_id, "created empty brief");
        self.briefs.write().await.insert(brief.id, brief.clone());
        Ok(brief)
    }

    async fn upsert_component(&self, brief_id: Uuid, component: BriefComponent) -> Result<Brief> {
        let mut briefs = self.briefs.write().await;
        let brief = briefs
            .get_mut(&brief_id)
            .ok_or_else(|| StratosError::not_found("Brief", brief_id))?;

        let kind = component.kind();
        brief.apply(component)?;
        debug!(brief_id = %brief_id, component = %kind, "upserted brief component");
        Ok(brief.clone())
    }

    async fn get(&self, brief_id: Uuid) -> Result<Option<Brief>> {
        Ok(self.briefs.read().await.get(&brief_id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Brief>> {
        let briefs = self.briefs.read().await;
        let mut owned: Vec<Brief> = briefs
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete(&self, brief_id: Uuid) -> Result<()> {
        self.briefs
            .write()
            .await
            .remove(&brief_id)
            .map(|_| ())
            .ok_or_else(|| StratosError::not_found("Brief", brief_id))
    }
}
