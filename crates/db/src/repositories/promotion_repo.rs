//! Repository for the `promotions` table.
//!
//! Listing queries order by `start_date, id` so "first match" means the same
//! thing here as in the in-memory store.

use promotrack_core::promotion::{Promotion, PromotionInput};
use promotrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::promotion::PromotionRow;

/// Column list for `promotions` queries.
const COLUMNS: &str = "\
    id, promotion_code, name, discount_type, discount_value, \
    start_date, end_date, created_at, updated_at";

/// Provides data access for promotions.
pub struct PromotionRepo;

impl PromotionRepo {
    /// Insert a new promotion, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        input: &PromotionInput,
    ) -> Result<PromotionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO promotions \
                 (promotion_code, name, discount_type, discount_value, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(&input.promotion_code)
            .bind(&input.name)
            .bind(&input.discount_type)
            .bind(input.discount_value)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// List every promotion by ascending start date.
    pub async fn list(pool: &PgPool) -> Result<Vec<PromotionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promotions ORDER BY start_date, id");
        sqlx::query_as::<_, PromotionRow>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PromotionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promotions WHERE id = $1");
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// First promotion carrying `code`, by ascending start date.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<PromotionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM promotions \
             WHERE promotion_code = $1 \
             ORDER BY start_date, id \
             LIMIT 1"
        );
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_code(pool: &PgPool, code: &str) -> Result<Vec<PromotionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM promotions \
             WHERE promotion_code = $1 \
             ORDER BY start_date, id"
        );
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(code)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every mutable column of the promotion with `promotion.id`.
    ///
    /// `updated_at` is refreshed by the `trg_promotions_updated_at` trigger.
    /// Returns `None` if the row does not exist.
    pub async fn replace(
        pool: &PgPool,
        promotion: &Promotion,
    ) -> Result<Option<PromotionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE promotions SET \
                 name = $2, \
                 discount_type = $3, \
                 discount_value = $4, \
                 start_date = $5, \
                 end_date = $6 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(promotion.id)
            .bind(&promotion.name)
            .bind(&promotion.discount_type)
            .bind(promotion.discount_value)
            .bind(promotion.start_date)
            .bind(promotion.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a promotion by ID.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the first promotion carrying `code`.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_by_code(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM promotions WHERE id = ( \
                 SELECT id FROM promotions \
                 WHERE promotion_code = $1 \
                 ORDER BY start_date, id \
                 LIMIT 1 \
             )",
        )
        .bind(code)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
