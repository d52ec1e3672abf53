//! # Domain Types
//!
//! Core domain types for the Manav regional grocery marketplace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Region      │   │ RegionListing   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  region_id      │       │
//! │  │  name           │   │  slug           │   │  product_id     │       │
//! │  │  base_price     │   │  multiplier_bps │   │  price_kurus    │       │
//! │  │  unit, category │   │  districts      │   │  stock, tier    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PricingConfig   │   │   PriceMode     │   │RegionalPricing  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │Mode ─────────── │       │
//! │  │  b2b/b2c bps    │   │  Markup         │   │  Multiplier     │       │
//! │  │  rounding step  │   │  Margin         │   │  Fixed          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (region slug) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Customer Type
// =============================================================================

/// The kind of customer a price is being computed for.
///
/// Commission rates differ between wholesale (B2B) and retail (B2C)
/// customers; the active [`PricingConfig`] carries one rate per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    /// Wholesale buyer (restaurants, markets).
    B2b,
    /// Retail consumer.
    B2c,
}

// =============================================================================
// Pricing Modes
// =============================================================================

/// How commission is applied to a base price.
///
/// ## The Two Modes
/// ```text
/// Markup: final = base × (1 + rate)      rate is ON TOP of base
/// Margin: final = base ÷ (1 − rate)      rate is a share of FINAL
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    Markup,
    Margin,
}

impl PriceMode {
    /// Storage representation (TEXT column value).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PriceMode::Markup => "markup",
            PriceMode::Margin => "margin",
        }
    }
}

/// Unknown tags are rejected at the boundary; there is no silent fallback
/// to a default mode.
impl FromStr for PriceMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markup" => Ok(PriceMode::Markup),
            "margin" => Ok(PriceMode::Margin),
            other => Err(ValidationError::InvalidFormat {
                field: "price_mode".to_string(),
                reason: format!("unknown mode '{other}'"),
            }),
        }
    }
}

/// How the regional adjustment is applied after commission.
///
/// ## The Two Modes
/// - `Multiplier`: the computed price is scaled by the region's
///   price multiplier.
/// - `Fixed`: listings carry hand-set regional prices; the regional step
///   is a no-op because the listing price already encodes the adjustment.
///
/// The mode is a single tagged value, so "both modes active at once" is
/// unrepresentable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RegionalPricingMode {
    Multiplier,
    Fixed,
}

impl RegionalPricingMode {
    /// Storage representation (TEXT column value).
    pub const fn as_str(&self) -> &'static str {
        match self {
            RegionalPricingMode::Multiplier => "multiplier",
            RegionalPricingMode::Fixed => "fixed",
        }
    }
}

impl FromStr for RegionalPricingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiplier" => Ok(RegionalPricingMode::Multiplier),
            "fixed" => Ok(RegionalPricingMode::Fixed),
            other => Err(ValidationError::InvalidFormat {
                field: "regional_pricing_mode".to_string(),
                reason: format!("unknown mode '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Listing Enums
// =============================================================================

/// Direction of the last price change on a listing, for trend display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

impl Default for PriceTrend {
    fn default() -> Self {
        PriceTrend::Stable
    }
}

/// Coarse availability tier shown to customers.
///
/// Derived from stock quantity by the catalog side; the cart validator only
/// cares about `stock_quantity == 0`, tiers are display data it passes
/// through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityTier {
    /// Comfortable stock level.
    Plenty,
    /// Running low.
    Limited,
    /// Last units.
    Last,
}

/// Unit of measure a product is sold by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Piece,
    Kilogram,
    Liter,
    Bunch,
    Pack,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the supplier catalog.
///
/// Immutable once referenced by an order line; price changes happen on
/// listings, not here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to customers.
    pub name: String,

    /// Supplier base price in kuruş, before commission and regional
    /// adjustment.
    pub base_price_kurus: i64,

    /// Unit the product is sold by.
    pub unit: UnitOfMeasure,

    /// Category slug (e.g. "produce", "dairy").
    pub category: String,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_kurus(self.base_price_kurus)
    }
}

// =============================================================================
// Region
// =============================================================================

/// A delivery catchment area with its own pricing and serviceability rules.
///
/// Created and edited by administrators; read-only to the pricing core.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Region {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (e.g. "Kadıköy").
    pub name: String,

    /// URL-safe business identifier (e.g. "kadikoy").
    pub slug: String,

    /// Whether the region currently accepts orders.
    pub is_active: bool,

    /// Minimum order amount in kuruş.
    pub min_order_kurus: i64,

    /// Delivery fee in kuruş.
    pub delivery_fee_kurus: i64,

    /// Regional price multiplier in basis points (10000 = ×1.0).
    pub price_multiplier_bps: u32,

    /// Position in region pickers.
    pub sort_order: i64,

    /// Districts served by this region.
    pub districts: Vec<String>,

    /// Delivery time slots (e.g. "09:00-12:00").
    pub delivery_slots: Vec<String>,
}

impl Region {
    /// Projects the fields the pricing calculator needs.
    #[inline]
    pub fn pricing_facts(&self) -> RegionPricingFacts {
        RegionPricingFacts {
            price_multiplier_bps: self.price_multiplier_bps,
        }
    }
}

/// The slice of region data consumed by `calculate_price`.
///
/// A separate type so the calculator cannot accidentally depend on
/// serviceability fields, and so tests don't need to build full regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegionPricingFacts {
    /// Regional price multiplier in basis points (10000 = ×1.0).
    pub price_multiplier_bps: u32,
}

// =============================================================================
// Region Listing
// =============================================================================

/// The pairing of a Region and a Product: what the product costs and how
/// available it is in that region.
///
/// ## Invariant
/// At most one listing per (region, product) pair — enforced by a UNIQUE
/// constraint in the database layer. A product with no listing in a region
/// is implicitly "not sold there".
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RegionListing {
    /// Region this listing belongs to.
    pub region_id: String,

    /// Product being listed.
    pub product_id: String,

    /// Current price in kuruş (already regionalized).
    pub price_kurus: i64,

    /// Previous price, for trend display.
    pub previous_price_kurus: Option<i64>,

    /// Direction of the last price change.
    pub price_trend: PriceTrend,

    /// Units in stock. Zero means sold out.
    pub stock_quantity: i64,

    /// Coarse availability tier for display.
    pub availability: AvailabilityTier,

    /// Whether the listing is live (soft delete).
    pub is_active: bool,

    /// When the listing was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl RegionListing {
    /// Returns the listing price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_kurus(self.price_kurus)
    }

    /// Whether the listing can currently be purchased.
    #[inline]
    pub fn is_purchasable(&self) -> bool {
        self.is_active && self.stock_quantity > 0
    }
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Marketplace-wide commission and rounding configuration.
///
/// Exactly one row is active at a time (a repository-layer guarantee);
/// historical rows are soft-deactivated, never deleted, to preserve an
/// audit trail of how prices were computed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingConfig {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Commission for wholesale customers, in basis points (0..10000).
    pub b2b_commission_bps: u32,

    /// Commission for retail customers, in basis points (0..10000).
    pub b2c_commission_bps: u32,

    /// How commission is applied.
    pub price_mode: PriceMode,

    /// How regional adjustment is applied.
    pub regional_mode: RegionalPricingMode,

    /// Rounding granularity in kuruş (50 = nearest ₺0.50).
    pub rounding_step_kurus: i64,

    /// Whether this is the active config row.
    pub is_active: bool,

    /// When this config row was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl PricingConfig {
    /// Commission rate for the given customer type, in basis points.
    #[inline]
    pub fn commission_bps_for(&self, customer: CustomerType) -> u32 {
        match customer {
            CustomerType::B2b => self.b2b_commission_bps,
            CustomerType::B2c => self.b2c_commission_bps,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
