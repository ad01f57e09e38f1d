//! [`PromotionStore`] backed by PostgreSQL.

use async_trait::async_trait;
use promotrack_core::error::CoreError;
use promotrack_core::promotion::{Promotion, PromotionInput, PromotionKey};
use promotrack_core::store::PromotionStore;
use promotrack_core::types::DbId;

use crate::repositories::PromotionRepo;
use crate::DbPool;

/// PostgreSQL exclusion constraint violation.
const EXCLUSION_VIOLATION: &str = "23P01";

/// PostgreSQL check constraint violation.
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Clone)]
pub struct PgPromotionStore {
    pool: DbPool,
}

impl PgPromotionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Translate a sqlx error into the core taxonomy.
///
/// Constraint violations the schema uses as a second line of defence map to
/// `Conflict` / `Validation`; everything else is passed through as `Store`.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(EXCLUSION_VIOLATION) => {
                return CoreError::Conflict(format!(
                    "Overlapping promotion found: violates constraint {}",
                    db_err.constraint().unwrap_or("unknown")
                ));
            }
            Some(CHECK_VIOLATION) => {
                return CoreError::Validation(format!(
                    "Promotion violates constraint {}",
                    db_err.constraint().unwrap_or("unknown")
                ));
            }
            _ => {}
        }
    }
    CoreError::Store(Box::new(err))
}

#[async_trait]
impl PromotionStore for PgPromotionStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, input: &PromotionInput) -> Result<Promotion, CoreError> {
        PromotionRepo::create(&self.pool, input)
            .await
            .map(Promotion::from)
            .map_err(map_sqlx_error)
    }

    async fn find_all(&self) -> Result<Vec<Promotion>, CoreError> {
        let rows = PromotionRepo::list(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Promotion::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Promotion, CoreError> {
        PromotionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(Promotion::from)
            .ok_or_else(|| CoreError::promotion_not_found(PromotionKey::Id(id)))
    }

    async fn find_by_business_key(&self, key: &str) -> Result<Promotion, CoreError> {
        PromotionRepo::find_by_code(&self.pool, key)
            .await
            .map_err(map_sqlx_error)?
            .map(Promotion::from)
            .ok_or_else(|| CoreError::promotion_not_found(PromotionKey::Code(key.to_string())))
    }

    async fn list_by_business_key(&self, key: &str) -> Result<Vec<Promotion>, CoreError> {
        let rows = PromotionRepo::list_by_code(&self.pool, key)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Promotion::from).collect())
    }

    async fn replace(&self, promotion: &Promotion) -> Result<Promotion, CoreError> {
        PromotionRepo::replace(&self.pool, promotion)
            .await
            .map_err(map_sqlx_error)?
            .map(Promotion::from)
            .ok_or_else(|| CoreError::promotion_not_found(PromotionKey::Id(promotion.id)))
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError> {
        let deleted = PromotionRepo::delete(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(CoreError::promotion_not_found(PromotionKey::Id(id)));
        }
        Ok(())
    }

    async fn delete_by_business_key(&self, key: &str) -> Result<(), CoreError> {
        let deleted = PromotionRepo::delete_by_code(&self.pool, key)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(CoreError::promotion_not_found(PromotionKey::Code(
                key.to_string(),
            )));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
