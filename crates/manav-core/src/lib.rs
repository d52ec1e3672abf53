//! # manav-core: Pure Business Logic for the Manav Marketplace
//!
//! This crate is the **heart** of the marketplace. It contains all pricing
//! and cart logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Manav Marketplace Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │   Region picker ──► Catalog ──► Cart ──► Switch-region modal   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              manav-session (Orchestration Layer)                │   │
//! │  │   RegionSwitchFlow, CartState, PricingService                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ manav-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  pricing  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ calculate │  │   │
//! │  │   │  Region   │  │ bps math  │  │ validator │  │  _price   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    manav-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Region, RegionListing, PricingConfig)
//! - [`money`] - Money type with integer kuruş arithmetic (no floating point!)
//! - [`pricing`] - The pricing calculator (markup/margin, regional adjustment)
//! - [`cart`] - Cart, the region-switch validator and applier
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in kuruş (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use manav_core::money::Money;
//! use manav_core::pricing::calculate_price;
//! use manav_core::types::{CustomerType, PriceMode, PricingConfig, RegionPricingFacts, RegionalPricingMode};
//! use chrono::Utc;
//!
//! // Create money from kuruş (never from floats!)
//! let base = Money::from_kurus(2000); // ₺20.00
//!
//! let config = PricingConfig {
//!     id: "cfg".to_string(),
//!     b2b_commission_bps: 1000,
//!     b2c_commission_bps: 1500, // 15%
//!     price_mode: PriceMode::Markup,
//!     regional_mode: RegionalPricingMode::Multiplier,
//!     rounding_step_kurus: 50,
//!     is_active: true,
//!     created_at: Utc::now(),
//! };
//! let region = RegionPricingFacts { price_multiplier_bps: 10000 }; // ×1.0
//!
//! let price = calculate_price(base, &region, CustomerType::B2c, &config).unwrap();
//! assert_eq!(price.kurus(), 2300); // ₺23.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use manav_core::Money` instead of
// `use manav_core::money::Money`

pub use cart::{
    apply_region_change, validate_for_region, Cart, CartItem, CartValidationResult, InvalidItem,
    InvalidReason, RepriceItem,
};
pub use error::{CoreError, CoreResult, PricingError, ValidationError};
pub use money::Money;
pub use pricing::calculate_price;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps the region-switch validator's batched
/// listing fetch at a bounded size.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
