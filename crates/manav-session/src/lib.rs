//! # manav-session: Session Orchestration for the Manav Marketplace
//!
//! This crate ties the pure logic in `manav-core` to the storage in
//! `manav-db` for one customer session: the live cart, price quotes, and
//! the region-change confirmation flow.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Orchestration                               │
//! │                                                                         │
//! │  Frontend (region picker, cart, switch-region modal)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  manav-session (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐  ┌──────────────────┐  ┌────────────────┐  │   │
//! │  │   │  CartState   │  │ RegionSwitchFlow │  │ PricingService │  │   │
//! │  │   │ Arc<Mutex<>> │  │  begin/confirm/  │  │  quote,        │  │   │
//! │  │   │              │  │  cancel          │  │  refresh       │  │   │
//! │  │   └──────────────┘  └──────────────────┘  └────────────────┘  │   │
//! │  │                            │                                    │   │
//! │  │                     ListingSource (trait seam)                 │   │
//! │  └────────────────────────────┼────────────────────────────────────┘   │
//! │                               ▼                                        │
//! │  manav-db (ListingRepository implements ListingSource)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart_state`] - Shared, thread-safe cart
//! - [`switch`] - The region-change confirmation flow (the state machine)
//! - [`pricing`] - Price quoting against stored config
//! - [`listing_source`] - The mockable listing snapshot seam
//! - [`error`] - Session error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manav_session::{CartState, RegionSwitchFlow};
//!
//! let cart = CartState::new(old_region_id);
//! let flow = RegionSwitchFlow::new(db.listings(), cart);
//!
//! let report = flow.begin(&new_region_id).await?;
//! if report.has_changes {
//!     // show the confirmation dialog, then:
//! }
//! let outcome = flow.confirm()?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_state;
pub mod error;
pub mod listing_source;
pub mod pricing;
pub mod switch;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart_state::{CartState, CartSummary};
pub use error::{LookupError, QuoteError, SwitchError};
pub use listing_source::ListingSource;
pub use pricing::PricingService;
pub use switch::{FlowPhase, RegionSwitchFlow, SwitchOutcome};
