//! # Pricing Config Repository
//!
//! Database operations for marketplace-wide pricing configuration.
//!
//! ## The Single-Active Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Config Activation                                     │
//! │                                                                         │
//! │  pricing_config table:                                                 │
//! │                                                                         │
//! │  id     b2c_bps  mode    active  created_at                            │
//! │  cfg-1  1200     markup  0       2026-01-10   ← history (audit)        │
//! │  cfg-2  1500     markup  0       2026-03-02   ← history (audit)        │
//! │  cfg-3  1500     margin  1       2026-05-20   ← THE active row         │
//! │                                                                         │
//! │  activate(new) runs in ONE transaction:                                │
//! │    1. UPDATE pricing_config SET is_active = 0 WHERE is_active = 1      │
//! │    2. INSERT new row with is_active = 1                                │
//! │                                                                         │
//! │  A crash between the two steps rolls both back; there is never a       │
//! │  moment with zero or two active rows visible to readers.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use manav_core::{PricingConfig, PriceMode, RegionalPricingMode};

/// Raw row shape: mode columns come back as TEXT tags.
#[derive(Debug, sqlx::FromRow)]
struct ConfigRow {
    id: String,
    b2b_commission_bps: u32,
    b2c_commission_bps: u32,
    price_mode: String,
    regional_mode: String,
    rounding_step_kurus: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl ConfigRow {
    /// Unknown mode tags are a data error, not a default.
    fn into_config(self) -> DbResult<PricingConfig> {
        let price_mode: PriceMode = self
            .price_mode
            .parse()
            .map_err(|_| DbError::invalid_column("pricing_config.price_mode", &self.price_mode))?;
        let regional_mode: RegionalPricingMode = self.regional_mode.parse().map_err(|_| {
            DbError::invalid_column("pricing_config.regional_mode", &self.regional_mode)
        })?;

        Ok(PricingConfig {
            id: self.id,
            b2b_commission_bps: self.b2b_commission_bps,
            b2c_commission_bps: self.b2c_commission_bps,
            price_mode,
            regional_mode,
            rounding_step_kurus: self.rounding_step_kurus,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

const CONFIG_COLUMNS: &str = "id, b2b_commission_bps, b2c_commission_bps, price_mode, \
     regional_mode, rounding_step_kurus, is_active, created_at";

/// Repository for pricing configuration operations.
#[derive(Debug, Clone)]
pub struct PricingConfigRepository {
    pool: SqlitePool,
}

impl PricingConfigRepository {
    /// Creates a new PricingConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PricingConfigRepository { pool }
    }

    /// Fetches the currently active configuration.
    ///
    /// ## Returns
    /// * `Ok(Some(config))` - The active row
    /// * `Ok(None)` - No active config exists; the caller treats this as
    ///   an operational error (prices cannot be computed), never defaults
    pub async fn fetch_active(&self) -> DbResult<Option<PricingConfig>> {
        let sql = format!(
            "SELECT {CONFIG_COLUMNS} FROM pricing_config \
             WHERE is_active = 1 ORDER BY created_at DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, ConfigRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ConfigRow::into_config).transpose()
    }

    /// Activates a new configuration, deactivating the old one atomically.
    ///
    /// ## Returns
    /// The stored config (with generated id and timestamp).
    pub async fn activate(
        &self,
        b2b_commission_bps: u32,
        b2c_commission_bps: u32,
        price_mode: PriceMode,
        regional_mode: RegionalPricingMode,
        rounding_step_kurus: i64,
    ) -> DbResult<PricingConfig> {
        let config = PricingConfig {
            id: Uuid::new_v4().to_string(),
            b2b_commission_bps,
            b2c_commission_bps,
            price_mode,
            regional_mode,
            rounding_step_kurus,
            is_active: true,
            created_at: Utc::now(),
        };

        debug!(id = %config.id, "Activating pricing config");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query("UPDATE pricing_config SET is_active = 0 WHERE is_active = 1")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO pricing_config (
                id, b2b_commission_bps, b2c_commission_bps, price_mode,
                regional_mode, rounding_step_kurus, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&config.id)
        .bind(config.b2b_commission_bps)
        .bind(config.b2c_commission_bps)
        .bind(config.price_mode.as_str())
        .bind(config.regional_mode.as_str())
        .bind(config.rounding_step_kurus)
        .bind(config.is_active)
        .bind(config.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %config.id,
            price_mode = config.price_mode.as_str(),
            regional_mode = config.regional_mode.as_str(),
            "Pricing config activated"
        );

        Ok(config)
    }

    /// Lists all configuration rows, newest first (the audit trail).
    pub async fn list_history(&self, limit: u32) -> DbResult<Vec<PricingConfig>> {
        let sql = format!(
            "SELECT {CONFIG_COLUMNS} FROM pricing_config ORDER BY created_at DESC LIMIT ?1"
        );
        let rows = sqlx::query_as::<_, ConfigRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ConfigRow::into_config).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
