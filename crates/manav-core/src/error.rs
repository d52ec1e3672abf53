//! # Error Types
//!
//! Domain-specific error types for manav-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  manav-core errors (this file)                                         │
//! │  ├── CoreError        - Cart / business rule violations                │
//! │  ├── PricingError     - Pricing calculator failures                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  manav-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  manav-session errors (separate crate)                                 │
//! │  ├── SwitchError      - Region-switch flow failures                    │
//! │  └── QuoteError       - Price quoting failures                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SwitchError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, region id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not present in the cart.
    #[error("Product not in cart: {0}")]
    ProductNotInCart(String),

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// An item captured for one region was added to a cart scoped to another.
    ///
    /// ## When This Occurs
    /// - Caller priced an item against region X but the cart is scoped to
    ///   region Y (stale UI state, usually)
    ///
    /// The cart rejects the add instead of silently mixing regions; the
    /// caller should re-quote the item for the cart's region.
    #[error("Item priced for region {item_region} cannot join a cart scoped to region {cart_region}")]
    CartRegionMismatch {
        cart_region: String,
        item_region: String,
    },

    /// A validation result computed for one region was applied for another.
    ///
    /// ## When This Occurs
    /// - `apply_region_change` invoked with a report from an earlier switch
    ///   attempt targeting a different region
    ///
    /// This is a programmer error on the caller's side. The applier fails
    /// fast rather than guessing which region the caller meant.
    #[error("Validation result was computed for region {expected}, not {actual}")]
    StaleValidation { expected: String, actual: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Pricing Error
// =============================================================================

/// Pricing calculator errors.
///
/// The calculator is a pure function; both variants are surfaced to the
/// caller and never retried automatically.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Malformed arguments to the pricing calculator.
    ///
    /// ## When This Occurs
    /// - Non-positive base price
    /// - Commission rate outside [0, 100%)
    /// - Non-positive region multiplier or rounding step
    ///
    /// Recoverable only by the caller fixing its input.
    #[error("Invalid pricing input: {field} {reason}")]
    InvalidInput { field: String, reason: String },

    /// No active pricing configuration exists.
    ///
    /// Treated as an operational failure and surfaced to an operator.
    /// Defaulting silently would mis-price orders, so there is no fallback.
    #[error("No active pricing configuration found")]
    ConfigMissing,
}

impl PricingError {
    /// Creates an InvalidInput error for a given field.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, unknown enum tag).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::StaleValidation {
            expected: "kadikoy".to_string(),
            actual: "besiktas".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Validation result was computed for region kadikoy, not besiktas"
        );
    }

    #[test]
    fn test_pricing_error_messages() {
        let err = PricingError::invalid_input("base_price", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid pricing input: base_price must be positive"
        );

        assert_eq!(
            PricingError::ConfigMissing.to_string(),
            "No active pricing configuration found"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "region_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
