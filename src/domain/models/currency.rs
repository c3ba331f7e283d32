use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Exchange rates are expressed relative to the default currency
/// (default row has rate 1.0). Used only at price-resolution time; resolved
/// amounts are snapshotted and never recomputed.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Currency {
    pub id: String,
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: f64,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Currency {
    pub fn new(code: String, name: String, symbol: String, exchange_rate: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code,
            name,
            symbol,
            exchange_rate,
            is_default: false,
            created_at: Utc::now(),
        }
    }
}
