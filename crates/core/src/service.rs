//! Promotion write flows (create, update, delete) and reads.
//!
//! Create and update are check-then-act: read the scope population, run the
//! overlap check, write. [`PromotionService`] serializes those steps behind a
//! single write lock so two concurrent writes cannot both pass the check.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::promotion::{
    merge_update, validate_create, Candidate, IdentityMode, Promotion, PromotionConflictResolver,
    PromotionInput, PromotionKey,
};
use crate::store::PromotionStore;

pub struct PromotionService {
    store: Arc<dyn PromotionStore>,
    resolver: PromotionConflictResolver,
    write_lock: Mutex<()>,
}

impl PromotionService {
    pub fn new(store: Arc<dyn PromotionStore>, mode: IdentityMode) -> Self {
        Self {
            store,
            resolver: PromotionConflictResolver::new(mode),
            write_lock: Mutex::new(()),
        }
    }

    pub fn mode(&self) -> IdentityMode {
        self.resolver.mode()
    }

    pub fn store(&self) -> &dyn PromotionStore {
        self.store.as_ref()
    }

    /// Interpret a raw path segment according to the deployment's identity mode.
    pub fn parse_key(&self, raw: &str) -> Result<PromotionKey, CoreError> {
        self.mode().parse_key(raw)
    }

    pub async fn list(&self) -> Result<Vec<Promotion>, CoreError> {
        self.store.find_all().await
    }

    pub async fn get(&self, key: &PromotionKey) -> Result<Promotion, CoreError> {
        match key {
            PromotionKey::Id(id) => self.store.find_by_id(*id).await,
            PromotionKey::Code(code) => self.store.find_by_business_key(code).await,
        }
    }

    /// Validate, check for overlaps against the whole scope, then insert.
    pub async fn create(&self, input: PromotionInput) -> Result<Promotion, CoreError> {
        validate_create(&input, self.mode())?;

        let _guard = self.write_lock.lock().await;
        let existing = self
            .scope_population(input.promotion_code.as_deref())
            .await?;
        self.resolver.ensure_no_overlap(&Candidate::from(&input), &existing, None)?;

        self.store.insert(&input).await
    }

    /// Resolve the stored record, replace its mutable fields with `input`,
    /// re-check overlaps excluding itself, then write.
    pub async fn update(
        &self,
        key: &PromotionKey,
        input: PromotionInput,
    ) -> Result<Promotion, CoreError> {
        let _guard = self.write_lock.lock().await;

        let current = self.get(key).await?;
        let merged = merge_update(&current, input)?;

        let existing = self
            .scope_population(merged.promotion_code.as_deref())
            .await?;
        self.resolver.ensure_no_overlap(&Candidate::from(&merged), &existing, Some(current.id))?;

        self.store.replace(&merged).await
    }

    /// Hard delete. Never blocked by overlap logic.
    pub async fn delete(&self, key: &PromotionKey) -> Result<(), CoreError> {
        match key {
            PromotionKey::Id(id) => self.store.delete_by_id(*id).await,
            PromotionKey::Code(code) => self.store.delete_by_business_key(code).await,
        }
    }

    /// Promotions the candidate must be compared against.
    async fn scope_population(&self, code: Option<&str>) -> Result<Vec<Promotion>, CoreError> {
        match (self.mode(), code) {
            (IdentityMode::BusinessKey, Some(code)) => self.store.list_by_business_key(code).await,
            (IdentityMode::BusinessKey, None) => Ok(Vec::new()),
            (IdentityMode::SurrogateId, _) => self.store.find_all().await,
        }
    }
}
