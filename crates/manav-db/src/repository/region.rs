//! # Region Repository
//!
//! Database operations for delivery regions.
//!
//! ## Storage Notes
//! `districts` and `delivery_slots` are JSON arrays stored in TEXT columns.
//! They are opaque to SQL (never filtered on), so JSON text keeps the schema
//! simple; decoding failures surface as `DbError::InvalidColumn`.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use manav_core::Region;

/// Raw row shape: JSON columns come back as strings.
#[derive(Debug, sqlx::FromRow)]
struct RegionRow {
    id: String,
    name: String,
    slug: String,
    is_active: bool,
    min_order_kurus: i64,
    delivery_fee_kurus: i64,
    price_multiplier_bps: u32,
    sort_order: i64,
    districts: String,
    delivery_slots: String,
}

impl RegionRow {
    fn into_region(self) -> DbResult<Region> {
        let districts: Vec<String> = serde_json::from_str(&self.districts)
            .map_err(|_| DbError::invalid_column("regions.districts", &self.districts))?;
        let delivery_slots: Vec<String> = serde_json::from_str(&self.delivery_slots)
            .map_err(|_| DbError::invalid_column("regions.delivery_slots", &self.delivery_slots))?;

        Ok(Region {
            id: self.id,
            name: self.name,
            slug: self.slug,
            is_active: self.is_active,
            min_order_kurus: self.min_order_kurus,
            delivery_fee_kurus: self.delivery_fee_kurus,
            price_multiplier_bps: self.price_multiplier_bps,
            sort_order: self.sort_order,
            districts,
            delivery_slots,
        })
    }
}

const REGION_COLUMNS: &str = "id, name, slug, is_active, min_order_kurus, delivery_fee_kurus, \
     price_multiplier_bps, sort_order, districts, delivery_slots";

/// Repository for region database operations.
#[derive(Debug, Clone)]
pub struct RegionRepository {
    pool: SqlitePool,
}

impl RegionRepository {
    /// Creates a new RegionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegionRepository { pool }
    }

    /// Lists active regions in picker order.
    pub async fn list_active(&self) -> DbResult<Vec<Region>> {
        let sql = format!(
            "SELECT {REGION_COLUMNS} FROM regions WHERE is_active = 1 ORDER BY sort_order, name"
        );
        let rows = sqlx::query_as::<_, RegionRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed active regions");
        rows.into_iter().map(RegionRow::into_region).collect()
    }

    /// Gets a region by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Region))` - Region found
    /// * `Ok(None)` - Region not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Region>> {
        let sql = format!("SELECT {REGION_COLUMNS} FROM regions WHERE id = ?1");
        let row = sqlx::query_as::<_, RegionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(RegionRow::into_region).transpose()
    }

    /// Gets a region by its slug (the URL-facing business identifier).
    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Region>> {
        let sql = format!("SELECT {REGION_COLUMNS} FROM regions WHERE slug = ?1");
        let row = sqlx::query_as::<_, RegionRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.map(RegionRow::into_region).transpose()
    }

    /// Inserts a new region.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - slug already exists
    pub async fn insert(&self, region: &Region) -> DbResult<()> {
        debug!(slug = %region.slug, "Inserting region");

        let districts = serde_json::to_string(&region.districts)
            .map_err(|e| DbError::Internal(e.to_string()))?;
        let delivery_slots = serde_json::to_string(&region.delivery_slots)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO regions (
                id, name, slug, is_active, min_order_kurus, delivery_fee_kurus,
                price_multiplier_bps, sort_order, districts, delivery_slots
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&region.id)
        .bind(&region.name)
        .bind(&region.slug)
        .bind(region.is_active)
        .bind(region.min_order_kurus)
        .bind(region.delivery_fee_kurus)
        .bind(region.price_multiplier_bps)
        .bind(region.sort_order)
        .bind(districts)
        .bind(delivery_slots)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a region's pricing multiplier.
    pub async fn update_multiplier(&self, id: &str, multiplier_bps: u32) -> DbResult<()> {
        let result = sqlx::query("UPDATE regions SET price_multiplier_bps = ?2 WHERE id = ?1")
            .bind(id)
            .bind(multiplier_bps)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Region", id));
        }

        Ok(())
    }

    /// Soft-deletes a region by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// Carts and orders still reference the region; deactivation just stops
    /// it appearing in pickers and accepting switches.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE regions SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Region", id));
        }

        Ok(())
    }

    /// Counts active regions (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regions WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new region ID.
pub fn generate_region_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_region(slug: &str, multiplier_bps: u32) -> Region {
        Region {
            id: generate_region_id(),
            name: slug.to_string(),
            slug: slug.to_string(),
            is_active: true,
            min_order_kurus: 15000,
            delivery_fee_kurus: 1500,
            price_multiplier_bps: multiplier_bps,
            sort_order: 0,
            districts: vec!["Moda".to_string(), "Fenerbahçe".to_string()],
            delivery_slots: vec!["09:00-12:00".to_string(), "14:00-18:00".to_string()],
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_slug() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.regions();

        let region = sample_region("kadikoy", 11500);
        repo.insert(&region).await.unwrap();

        let fetched = repo.get_by_slug("kadikoy").await.unwrap().unwrap();
        assert_eq!(fetched.id, region.id);
        assert_eq!(fetched.price_multiplier_bps, 11500);
        assert_eq!(fetched.districts, region.districts);
        assert_eq!(fetched.delivery_slots.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.regions();

        repo.insert(&sample_region("besiktas", 10000)).await.unwrap();
        let err = repo
            .insert(&sample_region("besiktas", 12000))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_active_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.regions();

        let region = sample_region("uskudar", 10000);
        repo.insert(&region).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.soft_delete(&region.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.list_active().await.unwrap().is_empty());

        // Still reachable by id for historical display
        assert!(repo.get_by_id(&region.id).await.unwrap().is_some());
    }
}
