//! # Validation Module
//!
//! Input validation utilities for the marketplace core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command / Service (Rust)                                     │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use manav_core::validation::{validate_region_slug, validate_quantity};
//!
//! // Validate a region slug before database insert
//! validate_region_slug("kadikoy").unwrap();
//!
//! // Validate quantity before cart operation
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::PricingConfig;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a region slug.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Lowercase letters, digits and hyphens only (URL-safe)
///
/// ## Example
/// ```rust
/// use manav_core::validation::validate_region_slug;
///
/// assert!(validate_region_slug("kadikoy").is_ok());
/// assert!(validate_region_slug("uskudar-merkez").is_ok());
/// assert!(validate_region_slug("").is_err());
/// assert!(validate_region_slug("Kadıköy").is_err());
/// ```
pub fn validate_region_slug(slug: &str) -> ValidationResult<()> {
    let slug = slug.trim();

    if slug.is_empty() {
        return Err(ValidationError::Required {
            field: "slug".to_string(),
        });
    }

    if slug.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "slug".to_string(),
            max: 50,
        });
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must contain only lowercase letters, digits, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a base price in kuruş.
///
/// ## Rules
/// - Must be positive (> 0): a listing without a real price has no
///   business being sold
///
/// ## Example
/// ```rust
/// use manav_core::validation::validate_base_price_kurus;
///
/// assert!(validate_base_price_kurus(1099).is_ok()); // ₺10.99
/// assert!(validate_base_price_kurus(0).is_err());
/// assert!(validate_base_price_kurus(-100).is_err());
/// ```
pub fn validate_base_price_kurus(kurus: i64) -> ValidationResult<()> {
    if kurus <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "base_price".to_string(),
        });
    }

    Ok(())
}

/// Validates a commission rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 9999 (0% up to, not including, 100%)
/// - 10000 bps is excluded: a 100% margin would divide by zero in the
///   margin formula
pub fn validate_commission_bps(bps: u32) -> ValidationResult<()> {
    if bps >= 10000 {
        return Err(ValidationError::OutOfRange {
            field: "commission_bps".to_string(),
            min: 0,
            max: 9999,
        });
    }

    Ok(())
}

/// Validates a regional price multiplier in basis points.
///
/// ## Rules
/// - Must be positive (10000 = ×1.0, 11500 = ×1.15)
/// - Upper bound of 100000 (×10) catches fat-fingered configs
pub fn validate_multiplier_bps(bps: u32) -> ValidationResult<()> {
    if bps == 0 || bps > 100_000 {
        return Err(ValidationError::OutOfRange {
            field: "price_multiplier_bps".to_string(),
            min: 1,
            max: 100_000,
        });
    }

    Ok(())
}

/// Validates a rounding step in kuruş.
///
/// ## Rules
/// - Must be positive (common values: 1, 5, 10, 25, 50, 100)
pub fn validate_rounding_step(step_kurus: i64) -> ValidationResult<()> {
    if step_kurus <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "rounding_step_kurus".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of unique items).
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a pricing configuration before it is activated.
///
/// Checks every numeric field the calculator depends on, so a config that
/// passes here cannot later fail `calculate_price` on its own account.
pub fn validate_pricing_config(config: &PricingConfig) -> ValidationResult<()> {
    validate_commission_bps(config.b2b_commission_bps)?;
    validate_commission_bps(config.b2c_commission_bps)?;
    validate_rounding_step(config.rounding_step_kurus)?;
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceMode, RegionalPricingMode};
    use chrono::Utc;

    #[test]
    fn test_validate_region_slug() {
        // Valid slugs
        assert!(validate_region_slug("kadikoy").is_ok());
        assert!(validate_region_slug("uskudar-merkez").is_ok());
        assert!(validate_region_slug("bolge-2").is_ok());

        // Invalid slugs
        assert!(validate_region_slug("").is_err());
        assert!(validate_region_slug("   ").is_err());
        assert!(validate_region_slug("Kadikoy").is_err());
        assert!(validate_region_slug("has space").is_err());
        assert!(validate_region_slug(&"a".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Domates (kg)").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_base_price_kurus() {
        assert!(validate_base_price_kurus(1099).is_ok());
        assert!(validate_base_price_kurus(0).is_err());
        assert!(validate_base_price_kurus(-100).is_err());
    }

    #[test]
    fn test_validate_commission_bps() {
        assert!(validate_commission_bps(0).is_ok());
        assert!(validate_commission_bps(1500).is_ok());
        assert!(validate_commission_bps(9999).is_ok());
        assert!(validate_commission_bps(10000).is_err());
    }

    #[test]
    fn test_validate_multiplier_bps() {
        assert!(validate_multiplier_bps(10000).is_ok());
        assert!(validate_multiplier_bps(11500).is_ok());
        assert!(validate_multiplier_bps(0).is_err());
        assert!(validate_multiplier_bps(200_000).is_err());
    }

    #[test]
    fn test_validate_rounding_step() {
        assert!(validate_rounding_step(1).is_ok());
        assert!(validate_rounding_step(50).is_ok());
        assert!(validate_rounding_step(0).is_err());
        assert!(validate_rounding_step(-5).is_err());
    }

    #[test]
    fn test_validate_pricing_config() {
        let config = PricingConfig {
            id: "cfg-1".to_string(),
            b2b_commission_bps: 1000,
            b2c_commission_bps: 1500,
            price_mode: PriceMode::Markup,
            regional_mode: RegionalPricingMode::Multiplier,
            rounding_step_kurus: 50,
            is_active: true,
            created_at: Utc::now(),
        };
        assert!(validate_pricing_config(&config).is_ok());

        let mut bad = config.clone();
        bad.b2c_commission_bps = 10000;
        assert!(validate_pricing_config(&bad).is_err());

        let mut bad = config;
        bad.rounding_step_kurus = 0;
        assert!(validate_pricing_config(&bad).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
