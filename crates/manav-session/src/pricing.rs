//! # Pricing Service
//!
//! Glues the pure pricing calculator to stored configuration and catalog
//! data.
//!
//! ## Quote Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Price Quote Pipeline                              │
//! │                                                                         │
//! │  quote(product_id, region_id, customer)                                │
//! │       │                                                                 │
//! │       ├── fetch product        → ProductNotFound                       │
//! │       ├── fetch region         → RegionNotFound                        │
//! │       ├── fetch active config  → ConfigMissing (no fallback!)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  calculate_price(base, region facts, customer, config)  ← PURE         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Money (final listing price)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::QuoteError;
use manav_core::{calculate_price, CustomerType, Money, PricingConfig};
use manav_db::Database;

/// Computes listing prices from stored catalog and configuration data.
#[derive(Debug, Clone)]
pub struct PricingService {
    db: Database,
}

impl PricingService {
    /// Creates a new pricing service over the given database.
    pub fn new(db: Database) -> Self {
        PricingService { db }
    }

    /// Fetches the active pricing configuration.
    ///
    /// ## Errors
    /// `QuoteError::ConfigMissing` if no config row is active. There is no
    /// default config: quoting without explicit configuration would
    /// silently mis-price orders.
    pub async fn active_config(&self) -> Result<PricingConfig, QuoteError> {
        self.db
            .pricing_configs()
            .fetch_active()
            .await?
            .ok_or(QuoteError::ConfigMissing)
    }

    /// Quotes the final price of a product in a region for a customer type.
    pub async fn quote(
        &self,
        product_id: &str,
        region_id: &str,
        customer: CustomerType,
    ) -> Result<Money, QuoteError> {
        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| QuoteError::ProductNotFound(product_id.to_string()))?;

        let region = self
            .db
            .regions()
            .get_by_id(region_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| QuoteError::RegionNotFound(region_id.to_string()))?;

        let config = self.active_config().await?;

        let price = calculate_price(
            product.base_price(),
            &region.pricing_facts(),
            customer,
            &config,
        )?;

        debug!(
            product_id = %product_id,
            region_id = %region_id,
            base_kurus = product.base_price_kurus,
            quoted_kurus = price.kurus(),
            "Price quoted"
        );

        Ok(price)
    }

    /// Requotes a listing and writes the new price back, recording the
    /// trend.
    ///
    /// Used after a base-price or config change to bring a region's
    /// listing in line with the calculator.
    pub async fn refresh_listing(
        &self,
        product_id: &str,
        region_id: &str,
        customer: CustomerType,
    ) -> Result<Money, QuoteError> {
        let price = self.quote(product_id, region_id, customer).await?;

        self.db
            .listings()
            .update_price(region_id, product_id, price.kurus())
            .await?;

        Ok(price)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use manav_db::DbConfig;
    use uuid::Uuid;

    use manav_core::{
        PriceMode, PriceTrend, Product, Region, RegionListing, RegionalPricingMode, UnitOfMeasure,
    };

    async fn seeded_service() -> (PricingService, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let region = Region {
            id: Uuid::new_v4().to_string(),
            name: "Beşiktaş".to_string(),
            slug: "besiktas".to_string(),
            is_active: true,
            min_order_kurus: 0,
            delivery_fee_kurus: 0,
            price_multiplier_bps: 11500, // ×1.15
            sort_order: 0,
            districts: vec![],
            delivery_slots: vec![],
        };
        db.regions().insert(&region).await.unwrap();

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: "Domates (kg)".to_string(),
            base_price_kurus: 2000,
            unit: UnitOfMeasure::Kilogram,
            category: "produce".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        (PricingService::new(db), product.id, region.id)
    }

    #[tokio::test]
    async fn test_quote_without_config_fails() {
        let (service, product_id, region_id) = seeded_service().await;

        let err = service
            .quote(&product_id, &region_id, CustomerType::B2c)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::ConfigMissing));
    }

    #[tokio::test]
    async fn test_quote_applies_markup_multiplier_and_rounding() {
        let (service, product_id, region_id) = seeded_service().await;

        // 15% B2C markup, ×1.15 region, round to ₺0.50:
        // 2000 × 1.15 = 2300; 2300 × 1.15 = 2645; rounds to 2650
        service
            .db
            .pricing_configs()
            .activate(1000, 1500, PriceMode::Markup, RegionalPricingMode::Multiplier, 50)
            .await
            .unwrap();

        let price = service
            .quote(&product_id, &region_id, CustomerType::B2c)
            .await
            .unwrap();
        assert_eq!(price.kurus(), 2650);

        // B2B uses its own commission rate: 2000 × 1.10 = 2200; ×1.15 =
        // 2530; rounds to 2550
        let b2b = service
            .quote(&product_id, &region_id, CustomerType::B2b)
            .await
            .unwrap();
        assert_eq!(b2b.kurus(), 2550);
    }

    #[tokio::test]
    async fn test_quote_unknown_product_and_region() {
        let (service, product_id, region_id) = seeded_service().await;
        service
            .db
            .pricing_configs()
            .activate(1000, 1500, PriceMode::Markup, RegionalPricingMode::Multiplier, 50)
            .await
            .unwrap();

        assert!(matches!(
            service
                .quote("missing", &region_id, CustomerType::B2c)
                .await
                .unwrap_err(),
            QuoteError::ProductNotFound(_)
        ));
        assert!(matches!(
            service
                .quote(&product_id, "missing", CustomerType::B2c)
                .await
                .unwrap_err(),
            QuoteError::RegionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_refresh_listing_writes_price_and_trend() {
        let (service, product_id, region_id) = seeded_service().await;
        service
            .db
            .pricing_configs()
            .activate(1000, 1500, PriceMode::Markup, RegionalPricingMode::Multiplier, 50)
            .await
            .unwrap();

        // Seed a stale listing at the old price
        service
            .db
            .listings()
            .upsert(&RegionListing {
                region_id: region_id.clone(),
                product_id: product_id.clone(),
                price_kurus: 2300,
                previous_price_kurus: None,
                price_trend: PriceTrend::Stable,
                stock_quantity: 10,
                availability: manav_core::AvailabilityTier::Plenty,
                is_active: true,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let price = service
            .refresh_listing(&product_id, &region_id, CustomerType::B2c)
            .await
            .unwrap();
        assert_eq!(price.kurus(), 2650);

        let listing = service
            .db
            .listings()
            .get(&region_id, &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(listing.price_kurus, 2650);
        assert_eq!(listing.previous_price_kurus, Some(2300));
        assert_eq!(listing.price_trend, PriceTrend::Up);
    }
}
