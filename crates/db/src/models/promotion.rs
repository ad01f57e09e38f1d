//! Row model for the `promotions` table.

use promotrack_core::promotion::Promotion;
use promotrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `promotions` table.
#[derive(Debug, Clone, FromRow)]
pub struct PromotionRow {
    pub id: DbId,
    pub promotion_code: Option<String>,
    pub name: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PromotionRow> for Promotion {
    fn from(row: PromotionRow) -> Self {
        Promotion {
            id: row.id,
            promotion_code: row.promotion_code,
            name: row.name,
            discount_type: row.discount_type,
            discount_value: row.discount_value,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
