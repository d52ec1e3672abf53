//! # Listing Repository
//!
//! Database operations for region listings (the region × product pairing).
//!
//! ## The Batched Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Region-Switch Listing Fetch                            │
//! │                                                                         │
//! │  ❌ WRONG: One query per cart item (N+1)                               │
//! │     for item in cart { SELECT ... WHERE product_id = ? }               │
//! │                                                                         │
//! │  ✅ CORRECT: One query for the whole cart                              │
//! │     SELECT ... WHERE region_id = ? AND product_id IN (?, ?, ?, ...)    │
//! │                                                                         │
//! │  A 30-item cart costs the same round trip as a 3-item cart, and the    │
//! │  result is one consistent snapshot for the validator to classify       │
//! │  against.                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use manav_core::RegionListing;

const LISTING_COLUMNS: &str = "region_id, product_id, price_kurus, previous_price_kurus, \
     price_trend, stock_quantity, availability, is_active, updated_at";

/// Repository for region listing operations.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Creates a new ListingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ListingRepository { pool }
    }

    /// Fetches listings for a set of products in one region, in ONE query.
    ///
    /// ## Contract
    /// - Empty `product_ids` short-circuits without touching the database
    /// - Returns a map keyed by product_id; absent key = no listing exists
    /// - Inactive and sold-out listings ARE included: the cart validator
    ///   distinguishes "no listing" from "listed but unavailable", so
    ///   filtering them out here would misclassify delisted products
    ///
    /// ## Arguments
    /// * `region_id` - The target region
    /// * `product_ids` - Distinct product IDs (the cart's contents)
    pub async fn fetch_for_region(
        &self,
        region_id: &str,
        product_ids: &[String],
    ) -> DbResult<HashMap<String, RegionListing>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(
            region_id = %region_id,
            products = product_ids.len(),
            "Batched listing fetch"
        );

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {LISTING_COLUMNS} FROM region_products WHERE region_id = "
        ));
        builder.push_bind(region_id);
        builder.push(" AND product_id IN (");
        let mut separated = builder.separated(", ");
        for id in product_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let listings = builder
            .build_query_as::<RegionListing>()
            .fetch_all(&self.pool)
            .await?;

        debug!(found = listings.len(), "Batched fetch returned listings");

        Ok(listings
            .into_iter()
            .map(|l| (l.product_id.clone(), l))
            .collect())
    }

    /// Gets a single listing for a (region, product) pair.
    pub async fn get(&self, region_id: &str, product_id: &str) -> DbResult<Option<RegionListing>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM region_products \
             WHERE region_id = ?1 AND product_id = ?2"
        );
        let listing = sqlx::query_as::<_, RegionListing>(&sql)
            .bind(region_id)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    /// Lists purchasable listings for a region's catalog page.
    ///
    /// Unlike [`fetch_for_region`](Self::fetch_for_region), this IS filtered
    /// to active rows: the catalog never shows delisted products.
    pub async fn list_for_region(&self, region_id: &str, limit: u32) -> DbResult<Vec<RegionListing>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM region_products \
             WHERE region_id = ?1 AND is_active = 1 ORDER BY product_id LIMIT ?2"
        );
        let listings = sqlx::query_as::<_, RegionListing>(&sql)
            .bind(region_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    /// Inserts or updates a listing for a (region, product) pair.
    ///
    /// The UNIQUE(region_id, product_id) constraint guarantees at most one
    /// listing per pair; an upsert keeps that invariant without a separate
    /// existence check.
    pub async fn upsert(&self, listing: &RegionListing) -> DbResult<()> {
        debug!(
            region_id = %listing.region_id,
            product_id = %listing.product_id,
            price_kurus = listing.price_kurus,
            "Upserting listing"
        );

        sqlx::query(
            r#"
            INSERT INTO region_products (
                region_id, product_id, price_kurus, previous_price_kurus,
                price_trend, stock_quantity, availability, is_active, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (region_id, product_id) DO UPDATE SET
                price_kurus = excluded.price_kurus,
                previous_price_kurus = excluded.previous_price_kurus,
                price_trend = excluded.price_trend,
                stock_quantity = excluded.stock_quantity,
                availability = excluded.availability,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&listing.region_id)
        .bind(&listing.product_id)
        .bind(listing.price_kurus)
        .bind(listing.previous_price_kurus)
        .bind(listing.price_trend)
        .bind(listing.stock_quantity)
        .bind(listing.availability)
        .bind(listing.is_active)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sets the stock level for a listing.
    pub async fn update_stock(
        &self,
        region_id: &str,
        product_id: &str,
        stock_quantity: i64,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE region_products
            SET stock_quantity = ?3, updated_at = ?4
            WHERE region_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(region_id)
        .bind(product_id)
        .bind(stock_quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Listing",
                format!("{region_id}/{product_id}"),
            ));
        }

        Ok(())
    }

    /// Sets a listing's price, recording the old price for trend display.
    pub async fn update_price(
        &self,
        region_id: &str,
        product_id: &str,
        price_kurus: i64,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE region_products
            SET previous_price_kurus = price_kurus,
                price_trend = CASE
                    WHEN ?3 > price_kurus THEN 'up'
                    WHEN ?3 < price_kurus THEN 'down'
                    ELSE 'stable'
                END,
                price_kurus = ?3,
                updated_at = ?4
            WHERE region_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(region_id)
        .bind(product_id)
        .bind(price_kurus)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Listing",
                format!("{region_id}/{product_id}"),
            ));
        }

        Ok(())
    }

    /// Counts active listings in a region (for diagnostics).
    pub async fn count_for_region(&self, region_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM region_products WHERE region_id = ?1 AND is_active = 1",
        )
        .bind(region_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
