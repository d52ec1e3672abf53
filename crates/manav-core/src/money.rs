//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A marketplace that prices in floats leaks kuruş on every order:        │
//! │    ₺10.00 × 1.15 commission = ₺11.499999999999998                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Kuruş                                            │
//! │    1000 kuruş × 11500 bps = 1150 kuruş, exactly                         │
//! │    Rounding is explicit, once, at a documented point                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use manav_core::money::Money;
//!
//! // Create from kuruş (preferred)
//! let price = Money::from_kurus(1099); // ₺10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                       // ₺21.98
//! let total = price + Money::from_kurus(500);    // ₺15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in kuruş (the smallest TRY unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// Product.base_price ──► calculate_price ──► RegionListing.price
///                                                  │
///                           CartItem.unit_price_at_add ◄──┘
///                                                  │
///                                Cart.subtotal ◄───┘
/// ```
/// Every monetary value in the system flows through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kuruş (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use manav_core::money::Money;
    ///
    /// let price = Money::from_kurus(1099); // Represents ₺10.99
    /// assert_eq!(price.kurus(), 1099);
    /// ```
    #[inline]
    pub const fn from_kurus(kurus: i64) -> Self {
        Money(kurus)
    }

    /// Creates a Money value from major and minor units (lira and kuruş).
    ///
    /// ## Example
    /// ```rust
    /// use manav_core::money::Money;
    ///
    /// let price = Money::from_lira_kurus(10, 99); // ₺10.99
    /// assert_eq!(price.kurus(), 1099);
    ///
    /// let negative = Money::from_lira_kurus(-5, 50); // -₺5.50 (refund)
    /// assert_eq!(negative.kurus(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_lira_kurus(-5, 50)` = -₺5.50, not -₺4.50
    #[inline]
    pub const fn from_lira_kurus(lira: i64, kurus: i64) -> Self {
        if lira < 0 {
            Money(lira * 100 - kurus)
        } else {
            Money(lira * 100 + kurus)
        }
    }

    /// Returns the value in kuruş (smallest currency unit).
    #[inline]
    pub const fn kurus(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (lira) portion.
    #[inline]
    pub const fn lira(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (kuruş) portion (always 0-99).
    #[inline]
    pub const fn kurus_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Scales by basis points with round-half-up.
    ///
    /// ## Basis Points
    /// 1 bps = 0.01% = 1/10000. `scale_bps(11500)` multiplies by 1.15,
    /// `scale_bps(10000)` is the identity.
    ///
    /// ## Implementation
    /// Integer math in i128 to prevent overflow on large amounts:
    /// `(kurus * bps + 5000) / 10000`. The +5000 provides the half-up
    /// rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use manav_core::money::Money;
    ///
    /// let base = Money::from_kurus(2000);          // ₺20.00
    /// let marked_up = base.scale_bps(11500);       // × 1.15
    /// assert_eq!(marked_up.kurus(), 2300);         // ₺23.00
    /// ```
    pub fn scale_bps(&self, bps: u32) -> Money {
        let scaled = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_kurus(scaled as i64)
    }

    /// Grosses up by a retained fraction in basis points (margin pricing).
    ///
    /// ## Margin vs Markup
    /// ```text
    /// Markup 15%:  final = base × 1.15          (commission on top of base)
    /// Margin 15%:  final = base / (1 − 0.15)    (commission is 15% of FINAL)
    /// ```
    ///
    /// `gross_up_bps(1500)` divides by 0.85 with round-half-up.
    ///
    /// ## Precondition
    /// `bps` must be < 10000; the pricing calculator validates this before
    /// calling. Division by the retained share is exact integer math:
    /// `(kurus * 10000 + retained/2) / retained`.
    pub fn gross_up_bps(&self, bps: u32) -> Money {
        let retained = (10000 - bps) as i128;
        let grossed = (self.0 as i128 * 10000 + retained / 2) / retained;
        Money::from_kurus(grossed as i64)
    }

    /// Rounds to the nearest multiple of `step` kuruş, half-up.
    ///
    /// ## Rounding Granularity
    /// ```text
    /// step = 50  → nearest ₺0.50:   ₺23.49 → ₺23.50,  ₺23.24 → ₺23.00
    /// step = 25  → nearest ₺0.25:   ₺23.49 → ₺23.50,  ₺23.37 → ₺23.25
    /// step = 1   → no-op (kuruş precision)
    /// ```
    ///
    /// Exact halves round up: with step 50, ₺23.25 → ₺23.50.
    ///
    /// ## Precondition
    /// `step` must be positive; the pricing calculator validates this.
    pub fn round_to_step(&self, step: i64) -> Money {
        let rounded = (self.0 + step / 2).div_euclid(step) * step;
        Money::from_kurus(rounded)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use manav_core::money::Money;
    ///
    /// let unit_price = Money::from_kurus(299); // ₺2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.kurus(), 897); // ₺8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₺{}.{:02}", sign, self.lira().abs(), self.kurus_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kurus() {
        let money = Money::from_kurus(1099);
        assert_eq!(money.kurus(), 1099);
        assert_eq!(money.lira(), 10);
        assert_eq!(money.kurus_part(), 99);
    }

    #[test]
    fn test_from_lira_kurus() {
        let money = Money::from_lira_kurus(10, 99);
        assert_eq!(money.kurus(), 1099);

        let negative = Money::from_lira_kurus(-5, 50);
        assert_eq!(negative.kurus(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_kurus(1099)), "₺10.99");
        assert_eq!(format!("{}", Money::from_kurus(500)), "₺5.00");
        assert_eq!(format!("{}", Money::from_kurus(-550)), "-₺5.50");
        assert_eq!(format!("{}", Money::from_kurus(0)), "₺0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_kurus(1000);
        let b = Money::from_kurus(500);

        assert_eq!((a + b).kurus(), 1500);
        assert_eq!((a - b).kurus(), 500);
        let result: Money = a * 3;
        assert_eq!(result.kurus(), 3000);
    }

    #[test]
    fn test_scale_bps_identity() {
        let amount = Money::from_kurus(1234);
        assert_eq!(amount.scale_bps(10000).kurus(), 1234);
    }

    #[test]
    fn test_scale_bps_rounds_half_up() {
        // 1000 × 1.0825 = 1082.5 → 1083
        let amount = Money::from_kurus(1000);
        assert_eq!(amount.scale_bps(10825).kurus(), 1083);

        // 333 × 1.15 = 382.95 → 383
        let amount = Money::from_kurus(333);
        assert_eq!(amount.scale_bps(11500).kurus(), 383);
    }

    #[test]
    fn test_gross_up_bps() {
        // 2000 / 0.85 = 2352.94... → 2353
        let amount = Money::from_kurus(2000);
        assert_eq!(amount.gross_up_bps(1500).kurus(), 2353);

        // Zero commission is the identity
        assert_eq!(amount.gross_up_bps(0).kurus(), 2000);
    }

    #[test]
    fn test_round_to_step() {
        // Nearest ₺0.50
        assert_eq!(Money::from_kurus(2349).round_to_step(50).kurus(), 2350);
        assert_eq!(Money::from_kurus(2324).round_to_step(50).kurus(), 2300);
        // Exact half rounds up: ₺23.25 → ₺23.50
        assert_eq!(Money::from_kurus(2325).round_to_step(50).kurus(), 2350);
        // Already on a step boundary
        assert_eq!(Money::from_kurus(2300).round_to_step(50).kurus(), 2300);
        // Step of 1 is a no-op
        assert_eq!(Money::from_kurus(2349).round_to_step(1).kurus(), 2349);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_kurus(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::from_kurus(-100);
        assert!(!negative.is_zero());
        assert!(!negative.is_positive());
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_kurus(299);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.kurus(), 897);
    }
}
