//! Persistence collaborator for promotions.
//!
//! [`PromotionStore`] is the seam between the service and whatever backs it.
//! The Postgres implementation lives in the `db` crate; [`InMemoryPromotionStore`]
//! is used for development deployments and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::promotion::{
    resolve_by_business_key, resolve_by_surrogate_id, sort_by_start_date, Promotion,
    PromotionInput, PromotionKey,
};
use crate::types::DbId;

/// Storage operations the promotion service depends on.
///
/// Listing methods return records ascending by `start_date` (ties by `id`);
/// that order is also what "first match" means for business-key lookups.
/// Backend failures are reported as [`CoreError::Store`].
#[async_trait]
pub trait PromotionStore: Send + Sync {
    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;

    /// Persist a new promotion, assigning `id`, `created_at` and `updated_at`.
    async fn insert(&self, input: &PromotionInput) -> Result<Promotion, CoreError>;

    async fn find_all(&self) -> Result<Vec<Promotion>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Promotion, CoreError>;

    /// First promotion carrying `key`.
    async fn find_by_business_key(&self, key: &str) -> Result<Promotion, CoreError>;

    /// Every promotion carrying `key`.
    async fn list_by_business_key(&self, key: &str) -> Result<Vec<Promotion>, CoreError>;

    /// Overwrite the mutable fields of the stored record with `promotion.id`
    /// and refresh `updated_at`.
    async fn replace(&self, promotion: &Promotion) -> Result<Promotion, CoreError>;

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError>;

    /// Delete the first promotion carrying `key`.
    async fn delete_by_business_key(&self, key: &str) -> Result<(), CoreError>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Inner {
    promotions: Vec<Promotion>,
    next_id: DbId,
}

/// Promotion store backed by an owned, start-date-sorted `Vec`.
#[derive(Debug)]
pub struct InMemoryPromotionStore {
    inner: RwLock<Inner>,
}

impl InMemoryPromotionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                promotions: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryPromotionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromotionStore for InMemoryPromotionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, input: &PromotionInput) -> Result<Promotion, CoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let promotion = Promotion {
            id: inner.next_id,
            promotion_code: input.promotion_code.clone(),
            name: input.name.clone(),
            discount_type: input.discount_type.clone(),
            discount_value: input.discount_value,
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        };
        inner.next_id += 1;
        inner.promotions.push(promotion.clone());
        sort_by_start_date(&mut inner.promotions);
        Ok(promotion)
    }

    async fn find_all(&self) -> Result<Vec<Promotion>, CoreError> {
        Ok(self.inner.read().await.promotions.clone())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Promotion, CoreError> {
        let inner = self.inner.read().await;
        resolve_by_surrogate_id(id, &inner.promotions).cloned()
    }

    async fn find_by_business_key(&self, key: &str) -> Result<Promotion, CoreError> {
        let inner = self.inner.read().await;
        resolve_by_business_key(key, &inner.promotions).cloned()
    }

    async fn list_by_business_key(&self, key: &str) -> Result<Vec<Promotion>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .promotions
            .iter()
            .filter(|p| p.promotion_code.as_deref() == Some(key))
            .cloned()
            .collect())
    }

    async fn replace(&self, promotion: &Promotion) -> Result<Promotion, CoreError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .promotions
            .iter_mut()
            .find(|p| p.id == promotion.id)
            .ok_or_else(|| CoreError::promotion_not_found(PromotionKey::Id(promotion.id)))?;

        slot.name = promotion.name.clone();
        slot.discount_type = promotion.discount_type.clone();
        slot.discount_value = promotion.discount_value;
        slot.start_date = promotion.start_date;
        slot.end_date = promotion.end_date;
        slot.updated_at = Utc::now();
        let updated = slot.clone();

        sort_by_start_date(&mut inner.promotions);
        Ok(updated)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .promotions
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::promotion_not_found(PromotionKey::Id(id)))?;
        inner.promotions.remove(index);
        Ok(())
    }

    async fn delete_by_business_key(&self, key: &str) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        let id = resolve_by_business_key(key, &inner.promotions)?.id;
        inner.promotions.retain(|p| p.id != id);
        Ok(())
    }
}
