//! # Pricing Calculator
//!
//! Turns a supplier base price into the final delivered price for a region
//! and customer type.
//!
//! ## Price Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      calculate_price pipeline                           │
//! │                                                                         │
//! │  base price                                                            │
//! │      │                                                                 │
//! │      ▼                                                                 │
//! │  commission step                                                       │
//! │      ├── Markup:  base × (1 + rate)                                    │
//! │      └── Margin:  base ÷ (1 − rate)                                    │
//! │      │                                                                 │
//! │      ▼                                                                 │
//! │  regional step                                                         │
//! │      ├── Multiplier: × region.price_multiplier                         │
//! │      └── Fixed:      no-op (listing price already regionalized)        │
//! │      │                                                                 │
//! │      ▼                                                                 │
//! │  round to configured step (half-up), clamp to at least one step        │
//! │      │                                                                 │
//! │      ▼                                                                 │
//! │  final price                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Deterministic: same inputs always produce the same output. No hidden
//!   state, no clock reads.
//! - Never returns a non-positive price for a positive base price.
//! - Monotone in the commission rate: raising the rate never lowers the
//!   final price.

use crate::error::PricingError;
use crate::money::Money;
use crate::types::{CustomerType, PriceMode, PricingConfig, RegionPricingFacts, RegionalPricingMode};

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Computes the final delivered price for a product.
///
/// ## Arguments
/// * `base_price` - Supplier base price. In `Fixed` regional mode this is
///   the region's listing price, which already encodes the regional
///   adjustment.
/// * `region` - Regional pricing facts (price multiplier).
/// * `customer` - Whether a B2B or B2C commission rate applies.
/// * `config` - The active pricing configuration.
///
/// ## Errors
/// `PricingError::InvalidInput` when:
/// - `base_price` is not positive
/// - the selected commission rate is outside `[0, 10000)` bps
/// - the region multiplier is zero
/// - the rounding step is not positive
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use manav_core::money::Money;
/// use manav_core::pricing::calculate_price;
/// use manav_core::types::*;
///
/// let config = PricingConfig {
///     id: "cfg".to_string(),
///     b2b_commission_bps: 800,
///     b2c_commission_bps: 1500,
///     price_mode: PriceMode::Markup,
///     regional_mode: RegionalPricingMode::Multiplier,
///     rounding_step_kurus: 50,
///     is_active: true,
///     created_at: Utc::now(),
/// };
/// let region = RegionPricingFacts { price_multiplier_bps: 10000 };
///
/// // ₺20.00 × 1.15 = ₺23.00, already on a ₺0.50 boundary
/// let price = calculate_price(
///     Money::from_kurus(2000),
///     &region,
///     CustomerType::B2c,
///     &config,
/// ).unwrap();
/// assert_eq!(price.kurus(), 2300);
/// ```
pub fn calculate_price(
    base_price: Money,
    region: &RegionPricingFacts,
    customer: CustomerType,
    config: &PricingConfig,
) -> PricingResult<Money> {
    let commission_bps = config.commission_bps_for(customer);

    // Validate before any arithmetic so error cases never depend on
    // intermediate values.
    if !base_price.is_positive() {
        return Err(PricingError::invalid_input(
            "base_price",
            format!("must be positive, got {} kuruş", base_price.kurus()),
        ));
    }
    if commission_bps >= 10000 {
        return Err(PricingError::invalid_input(
            "commission_bps",
            format!("must be below 10000 (100%), got {commission_bps}"),
        ));
    }
    if region.price_multiplier_bps == 0 {
        return Err(PricingError::invalid_input(
            "price_multiplier_bps",
            "must be positive".to_string(),
        ));
    }
    if config.rounding_step_kurus <= 0 {
        return Err(PricingError::invalid_input(
            "rounding_step_kurus",
            format!("must be positive, got {}", config.rounding_step_kurus),
        ));
    }

    // Commission step
    let with_commission = match config.price_mode {
        PriceMode::Markup => base_price.scale_bps(10000 + commission_bps),
        PriceMode::Margin => base_price.gross_up_bps(commission_bps),
    };

    // Regional step
    let regionalized = match config.regional_mode {
        RegionalPricingMode::Multiplier => with_commission.scale_bps(region.price_multiplier_bps),
        // Fixed listing prices already encode the regional adjustment.
        RegionalPricingMode::Fixed => with_commission,
    };

    // Rounding step. Clamp so a tiny-but-positive price never rounds to
    // zero (e.g. 10 kuruş at step 50 becomes one step, not free).
    let rounded = regionalized.round_to_step(config.rounding_step_kurus);
    if rounded.kurus() < config.rounding_step_kurus {
        return Ok(Money::from_kurus(config.rounding_step_kurus));
    }

    Ok(rounded)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config(mode: PriceMode, regional: RegionalPricingMode, step: i64) -> PricingConfig {
        PricingConfig {
            id: "cfg-test".to_string(),
            b2b_commission_bps: 800,
            b2c_commission_bps: 1500,
            price_mode: mode,
            regional_mode: regional,
            rounding_step_kurus: step,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn unit_region() -> RegionPricingFacts {
        RegionPricingFacts {
            price_multiplier_bps: 10000,
        }
    }

    #[test]
    fn test_markup_b2c_unit_multiplier() {
        // ₺20.00, 15% markup, ×1.0, round to ₺0.50 → ₺23.00
        let cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 50);
        let price = calculate_price(
            Money::from_kurus(2000),
            &unit_region(),
            CustomerType::B2c,
            &cfg,
        )
        .unwrap();
        assert_eq!(price.kurus(), 2300);
    }

    #[test]
    fn test_markup_b2b_uses_b2b_rate() {
        // ₺20.00, 8% markup = ₺21.60 → rounds to ₺21.50
        let cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 50);
        let price = calculate_price(
            Money::from_kurus(2000),
            &unit_region(),
            CustomerType::B2b,
            &cfg,
        )
        .unwrap();
        assert_eq!(price.kurus(), 2150);
    }

    #[test]
    fn test_margin_mode() {
        // ₺20.00 / (1 − 0.15) = ₺23.53 → rounds to ₺23.50
        let cfg = config(PriceMode::Margin, RegionalPricingMode::Multiplier, 50);
        let price = calculate_price(
            Money::from_kurus(2000),
            &unit_region(),
            CustomerType::B2c,
            &cfg,
        )
        .unwrap();
        assert_eq!(price.kurus(), 2350);
    }

    #[test]
    fn test_margin_exceeds_markup_at_same_rate() {
        // Margin grosses up, so the same rate always yields at least as
        // much as markup.
        let markup_cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 1);
        let margin_cfg = config(PriceMode::Margin, RegionalPricingMode::Multiplier, 1);
        let base = Money::from_kurus(2000);

        let markup =
            calculate_price(base, &unit_region(), CustomerType::B2c, &markup_cfg).unwrap();
        let margin =
            calculate_price(base, &unit_region(), CustomerType::B2c, &margin_cfg).unwrap();
        assert!(margin >= markup);
    }

    #[test]
    fn test_regional_multiplier_applied() {
        // ₺20.00 × 1.15 = ₺23.00, × 1.10 regional = ₺25.30 → ₺25.50
        let cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 50);
        let region = RegionPricingFacts {
            price_multiplier_bps: 11000,
        };
        let price =
            calculate_price(Money::from_kurus(2000), &region, CustomerType::B2c, &cfg).unwrap();
        assert_eq!(price.kurus(), 2550);
    }

    #[test]
    fn test_fixed_mode_ignores_multiplier() {
        // In fixed mode the listing price already encodes the region, so a
        // wild multiplier must have no effect.
        let cfg = config(PriceMode::Markup, RegionalPricingMode::Fixed, 50);
        let region = RegionPricingFacts {
            price_multiplier_bps: 30000,
        };
        let price =
            calculate_price(Money::from_kurus(2000), &region, CustomerType::B2c, &cfg).unwrap();
        assert_eq!(price.kurus(), 2300);
    }

    #[test]
    fn test_rejects_non_positive_base_price() {
        let cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 50);
        for kurus in [0, -100] {
            let err = calculate_price(
                Money::from_kurus(kurus),
                &unit_region(),
                CustomerType::B2c,
                &cfg,
            )
            .unwrap_err();
            assert!(matches!(err, PricingError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_rejects_commission_at_or_above_100_percent() {
        let mut cfg = config(PriceMode::Margin, RegionalPricingMode::Multiplier, 50);
        cfg.b2c_commission_bps = 10000; // would divide by zero in margin mode
        let err = calculate_price(
            Money::from_kurus(2000),
            &unit_region(),
            CustomerType::B2c,
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_zero_multiplier() {
        let cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 50);
        let region = RegionPricingFacts {
            price_multiplier_bps: 0,
        };
        let err = calculate_price(Money::from_kurus(2000), &region, CustomerType::B2c, &cfg)
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_non_positive_rounding_step() {
        let cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 0);
        let err = calculate_price(
            Money::from_kurus(2000),
            &unit_region(),
            CustomerType::B2c,
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { .. }));
    }

    #[test]
    fn test_tiny_price_never_rounds_to_zero() {
        // 10 kuruş at step 50 would round to 0; it clamps to one step.
        let mut cfg = config(PriceMode::Markup, RegionalPricingMode::Multiplier, 50);
        cfg.b2c_commission_bps = 0;
        let price = calculate_price(
            Money::from_kurus(10),
            &unit_region(),
            CustomerType::B2c,
            &cfg,
        )
        .unwrap();
        assert_eq!(price.kurus(), 50);
    }

    #[test]
    fn test_monotone_in_commission_rate() {
        // Raising the commission rate (base and multiplier fixed) never
        // decreases the final price, in either mode.
        for mode in [PriceMode::Markup, PriceMode::Margin] {
            let mut previous = Money::zero();
            for bps in (0..9900).step_by(137) {
                let mut cfg = config(mode, RegionalPricingMode::Multiplier, 50);
                cfg.b2c_commission_bps = bps;
                let price = calculate_price(
                    Money::from_kurus(2000),
                    &unit_region(),
                    CustomerType::B2c,
                    &cfg,
                )
                .unwrap();
                assert!(
                    price >= previous,
                    "price decreased at {bps} bps in {mode:?} mode"
                );
                previous = price;
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let cfg = config(PriceMode::Margin, RegionalPricingMode::Multiplier, 25);
        let region = RegionPricingFacts {
            price_multiplier_bps: 10700,
        };
        let first =
            calculate_price(Money::from_kurus(1337), &region, CustomerType::B2b, &cfg).unwrap();
        for _ in 0..10 {
            let again =
                calculate_price(Money::from_kurus(1337), &region, CustomerType::B2b, &cfg).unwrap();
            assert_eq!(first, again);
        }
    }
}
