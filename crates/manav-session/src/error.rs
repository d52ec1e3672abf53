//! # Session Error Types
//!
//! Error types for the orchestration layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  LookupError (listing source)      DbError / PricingError              │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  SwitchError                        QuoteError                          │
//! │  (region-switch flow)               (price quoting)                     │
//! │       │                                  │                              │
//! │       └────────────┬─────────────────────┘                              │
//! │                    ▼                                                    │
//! │  Frontend displays user-friendly message                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use manav_core::{CoreError, PricingError};
use manav_db::DbError;

// =============================================================================
// Lookup Error
// =============================================================================

/// A listing source failed to produce a snapshot.
///
/// Deliberately opaque: the flow treats every lookup failure the same way
/// (abort the switch, keep the cart as it was), so the source's transport
/// details stay behind this one type.
#[derive(Debug, Error)]
#[error("Listing lookup failed: {message}")]
pub struct LookupError {
    message: String,
}

impl LookupError {
    /// Creates a lookup error with a human-readable cause.
    pub fn new(message: impl Into<String>) -> Self {
        LookupError {
            message: message.into(),
        }
    }
}

impl From<DbError> for LookupError {
    fn from(err: DbError) -> Self {
        LookupError::new(err.to_string())
    }
}

// =============================================================================
// Switch Error
// =============================================================================

/// Region-switch flow errors.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// The listing snapshot could not be fetched.
    ///
    /// The flow returns to Idle and the cart is untouched; the caller may
    /// retry the switch.
    #[error(transparent)]
    LookupFailed(#[from] LookupError),

    /// A newer switch attempt replaced this one while it was in flight.
    ///
    /// ## When This Occurs
    /// - User taps region B while the validation for region A is still
    ///   awaiting its listing fetch
    /// - User cancels while validation is in flight
    ///
    /// Not a failure of the newer attempt; the caller simply discards this
    /// result.
    #[error("Switch to region {region_id} was superseded by a newer attempt")]
    Superseded { region_id: String },

    /// The operation is not valid in the flow's current phase.
    ///
    /// ## When This Occurs
    /// - `confirm` or `cancel` with no validation awaiting confirmation
    #[error("No region switch awaiting confirmation (flow is {phase})")]
    InvalidState { phase: &'static str },

    /// Cart-level failure while applying the switch.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Quote Error
// =============================================================================

/// Price quoting errors.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// No active pricing configuration exists.
    ///
    /// Surfaced to an operator; quoting never falls back to a default
    /// config because that would silently mis-price orders.
    #[error("No active pricing configuration")]
    ConfigMissing,

    /// The region does not exist or is inactive.
    #[error("Region not found: {0}")]
    RegionNotFound(String),

    /// The product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The pricing calculator rejected its input.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbError),
}
