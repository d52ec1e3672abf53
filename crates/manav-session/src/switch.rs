//! # Region Switch Flow
//!
//! The confirmation flow a cart goes through when the customer changes
//! delivery regions.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Region Switch State Machine                          │
//! │                                                                         │
//! │            begin(region)                                                │
//! │   ┌──────┐ ────────────► ┌────────────┐                                 │
//! │   │ Idle │               │ Validating │──── lookup failed ──┐           │
//! │   └──────┘ ◄──────────── └────────────┘                     │           │
//! │      ▲  ▲                      │ snapshot classified        │           │
//! │      │  │                      ▼                            │           │
//! │      │  │              ┌──────────────────────┐             │           │
//! │      │  └── cancel ─── │ AwaitingConfirmation │             │           │
//! │      │                 └──────────────────────┘             │           │
//! │      │                         │ confirm()                  │           │
//! │      │                         ▼                            │           │
//! │      │                 ┌──────────┐                         │           │
//! │      └──────────────── │ Applying │                         │           │
//! │        cart rewritten  └──────────┘                         │           │
//! │                                                             ▼           │
//! │   The cart is only ever mutated inside Applying.        back to Idle    │
//! │                                                                         │
//! │   SUPERSEDE: begin() while Validating/AwaitingConfirmation replaces     │
//! │   the older attempt; the older attempt's in-flight validation returns   │
//! │   Superseded when it lands, and its report can never be applied.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Notes
//! - `state` is a `std::sync::Mutex` and is never held across an `.await`:
//!   the listing fetch runs between two short lock windows
//! - `generation` is a monotonic counter; every `begin` and `cancel` bumps
//!   it, and an in-flight validation compares its captured generation after
//!   the fetch to detect that it was superseded

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cart_state::CartState;
use crate::error::SwitchError;
use crate::listing_source::ListingSource;
use manav_core::{apply_region_change, validate_for_region, CartValidationResult};

// =============================================================================
// Phases
// =============================================================================

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    /// No switch in progress.
    Idle,
    /// A listing snapshot is being fetched and classified.
    Validating,
    /// A validation report is parked, waiting for the user's decision.
    AwaitingConfirmation,
    /// The cart is being rewritten.
    Applying,
}

impl FlowPhase {
    fn as_str(&self) -> &'static str {
        match self {
            FlowPhase::Idle => "idle",
            FlowPhase::Validating => "validating",
            FlowPhase::AwaitingConfirmation => "awaiting_confirmation",
            FlowPhase::Applying => "applying",
        }
    }
}

/// What `confirm` did to the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchOutcome {
    /// The region the cart now belongs to.
    pub region_id: String,
    /// Items dropped because they were invalid in the new region.
    pub dropped_items: usize,
    /// Items whose captured price was updated.
    pub repriced_items: usize,
    /// Items remaining in the cart after the switch.
    pub remaining_items: usize,
}

// =============================================================================
// Flow
// =============================================================================

/// A validation report parked between begin() and confirm().
#[derive(Debug)]
struct PendingSwitch {
    result: CartValidationResult,
    generation: u64,
}

#[derive(Debug)]
struct FlowState {
    phase: FlowPhase,
    pending: Option<PendingSwitch>,
}

/// Orchestrates region switches for one session's cart.
///
/// Generic over the listing source so the supersede/cancel behavior is
/// testable with canned snapshots and controlled interleavings.
#[derive(Debug)]
pub struct RegionSwitchFlow<S> {
    source: S,
    cart: CartState,
    state: Mutex<FlowState>,
    generation: AtomicU64,
}

impl<S: ListingSource> RegionSwitchFlow<S> {
    /// Creates a new flow for the given cart.
    pub fn new(source: S, cart: CartState) -> Self {
        RegionSwitchFlow {
            source,
            cart,
            state: Mutex::new(FlowState {
                phase: FlowPhase::Idle,
                pending: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the flow's current phase.
    pub fn phase(&self) -> FlowPhase {
        self.state.lock().expect("Flow mutex poisoned").phase
    }

    /// Returns the shared cart state.
    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Starts a switch to `new_region_id`: fetches one listing snapshot,
    /// classifies every cart item against it, and parks the report for
    /// confirmation.
    ///
    /// Read-only with respect to the cart. Calling `begin` again before
    /// confirming replaces the earlier attempt (the earlier call returns
    /// `Superseded` when its fetch lands).
    ///
    /// ## Returns
    /// The validation report. `has_changes == false` means the cart
    /// survives untouched apart from the region stamp; the caller may
    /// confirm immediately without showing a dialog.
    pub async fn begin(&self, new_region_id: &str) -> Result<CartValidationResult, SwitchError> {
        // Claim a generation. Any older in-flight attempt is now stale.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (items, product_ids) = {
            let mut state = self.state.lock().expect("Flow mutex poisoned");
            state.phase = FlowPhase::Validating;
            state.pending = None;

            self.cart
                .with_cart(|cart| (cart.items.clone(), cart.distinct_product_ids()))
        };

        debug!(
            region_id = %new_region_id,
            items = items.len(),
            generation,
            "Region switch validation started"
        );

        // One batched fetch for the whole cart. Empty carts skip it: the
        // report is trivially empty and the database owes us nothing.
        let listings = if product_ids.is_empty() {
            Default::default()
        } else {
            match self.source.fetch_listings(new_region_id, &product_ids).await {
                Ok(listings) => listings,
                Err(err) => {
                    warn!(region_id = %new_region_id, error = %err, "Listing lookup failed");
                    let mut state = self.state.lock().expect("Flow mutex poisoned");
                    // Only reset the phase if no newer attempt took over.
                    if self.generation.load(Ordering::SeqCst) == generation {
                        state.phase = FlowPhase::Idle;
                    }
                    return Err(err.into());
                }
            }
        };

        let result = validate_for_region(&items, new_region_id, &listings);

        let mut state = self.state.lock().expect("Flow mutex poisoned");
        if self.generation.load(Ordering::SeqCst) != generation {
            // A newer begin() or cancel() arrived while we awaited the
            // fetch. Our report must never be parked.
            debug!(region_id = %new_region_id, generation, "Validation superseded");
            return Err(SwitchError::Superseded {
                region_id: new_region_id.to_string(),
            });
        }

        state.phase = FlowPhase::AwaitingConfirmation;
        state.pending = Some(PendingSwitch {
            result: result.clone(),
            generation,
        });

        info!(
            region_id = %new_region_id,
            invalid = result.invalid_items.len(),
            repriced = result.reprice_items.len(),
            "Region switch awaiting confirmation"
        );

        Ok(result)
    }

    /// Applies the parked validation report: drops invalid items, reprices
    /// the rest, and stamps the cart with the new region.
    ///
    /// ## Errors
    /// - `InvalidState` if nothing is awaiting confirmation
    /// - `Superseded` if a newer attempt replaced the parked report
    pub fn confirm(&self) -> Result<SwitchOutcome, SwitchError> {
        let mut state = self.state.lock().expect("Flow mutex poisoned");

        let pending = match state.pending.take() {
            Some(p) => p,
            None => {
                return Err(SwitchError::InvalidState {
                    phase: state.phase.as_str(),
                })
            }
        };

        if self.generation.load(Ordering::SeqCst) != pending.generation {
            return Err(SwitchError::Superseded {
                region_id: pending.result.region_id.clone(),
            });
        }

        state.phase = FlowPhase::Applying;
        let result = pending.result;
        let region_id = result.region_id.clone();

        // The cart mutex nests inside the flow mutex here; both are
        // synchronous and released before any await point.
        let outcome = self.cart.with_cart_mut(|cart| -> Result<_, SwitchError> {
            let items = std::mem::take(&mut cart.items);
            let before = items.len();

            let survivors = apply_region_change(items, &region_id, &result)?;
            let remaining = survivors.len();

            cart.items = survivors;
            cart.region_id = region_id.clone();

            Ok(SwitchOutcome {
                region_id: region_id.clone(),
                dropped_items: before - remaining,
                repriced_items: result.reprice_items.len(),
                remaining_items: remaining,
            })
        });

        state.phase = FlowPhase::Idle;

        let outcome = outcome?;
        info!(
            region_id = %outcome.region_id,
            dropped = outcome.dropped_items,
            repriced = outcome.repriced_items,
            "Region switch applied"
        );

        Ok(outcome)
    }

    /// Abandons the current switch attempt. The cart is untouched.
    ///
    /// Valid while Validating (the in-flight fetch will land as
    /// `Superseded`) or AwaitingConfirmation.
    pub fn cancel(&self) -> Result<(), SwitchError> {
        let mut state = self.state.lock().expect("Flow mutex poisoned");

        match state.phase {
            FlowPhase::Validating | FlowPhase::AwaitingConfirmation => {
                // Invalidate any in-flight validation.
                self.generation.fetch_add(1, Ordering::SeqCst);
                state.pending = None;
                state.phase = FlowPhase::Idle;
                debug!("Region switch cancelled");
                Ok(())
            }
            phase => Err(SwitchError::InvalidState {
                phase: phase.as_str(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    use crate::error::LookupError;
    use manav_core::{
        AvailabilityTier, CartItem, InvalidReason, Money, PriceTrend, RegionListing,
    };

    /// Canned listing source with injectable failures and an await gate
    /// for one region, to pin down interleavings.
    struct MockSource {
        /// region_id -> product_id -> listing
        snapshots: HashMap<String, HashMap<String, RegionListing>>,
        calls: AtomicUsize,
        fail: bool,
        gated_region: Option<(String, Arc<Notify>)>,
    }

    impl MockSource {
        fn new(snapshots: HashMap<String, HashMap<String, RegionListing>>) -> Self {
            MockSource {
                snapshots,
                calls: AtomicUsize::new(0),
                fail: false,
                gated_region: None,
            }
        }

        fn failing() -> Self {
            MockSource {
                snapshots: HashMap::new(),
                calls: AtomicUsize::new(0),
                fail: true,
                gated_region: None,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ListingSource for MockSource {
        async fn fetch_listings(
            &self,
            region_id: &str,
            product_ids: &[String],
        ) -> Result<HashMap<String, RegionListing>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some((gated, notify)) = &self.gated_region {
                if gated == region_id {
                    notify.notified().await;
                }
            }

            if self.fail {
                return Err(LookupError::new("connection reset"));
            }

            let region = self.snapshots.get(region_id).cloned().unwrap_or_default();
            Ok(product_ids
                .iter()
                .filter_map(|id| region.get(id).map(|l| (id.clone(), l.clone())))
                .collect())
        }
    }

    fn listing(region: &str, product: &str, price_kurus: i64, stock: i64) -> RegionListing {
        RegionListing {
            region_id: region.to_string(),
            product_id: product.to_string(),
            price_kurus,
            previous_price_kurus: None,
            price_trend: PriceTrend::Stable,
            stock_quantity: stock,
            availability: AvailabilityTier::Plenty,
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    fn snapshot(entries: Vec<RegionListing>) -> HashMap<String, HashMap<String, RegionListing>> {
        let mut map: HashMap<String, HashMap<String, RegionListing>> = HashMap::new();
        for l in entries {
            map.entry(l.region_id.clone())
                .or_default()
                .insert(l.product_id.clone(), l);
        }
        map
    }

    /// Cart in region "a" with a keeper, a repriced item, and a goner.
    fn seeded_cart() -> CartState {
        let cart = CartState::new("a");
        cart.with_cart_mut(|c| {
            c.add_item(CartItem::new("keep", "Ekmek", 1, Money::from_kurus(1000), "a"))?;
            c.add_item(CartItem::new("reprice", "Süt", 2, Money::from_kurus(2800), "a"))?;
            c.add_item(CartItem::new("gone", "Simit", 3, Money::from_kurus(750), "a"))
        })
        .unwrap();
        cart
    }

    fn region_b_snapshot() -> HashMap<String, HashMap<String, RegionListing>> {
        snapshot(vec![
            listing("b", "keep", 1000, 5),
            listing("b", "reprice", 3200, 5),
            // "gone" has no listing in b
        ])
    }

    #[tokio::test]
    async fn test_begin_parks_report_with_one_fetch() {
        let flow = RegionSwitchFlow::new(MockSource::new(region_b_snapshot()), seeded_cart());

        let result = flow.begin("b").await.unwrap();

        assert_eq!(flow.source.call_count(), 1);
        assert_eq!(flow.phase(), FlowPhase::AwaitingConfirmation);
        assert!(result.has_changes);
        assert_eq!(result.invalid_items.len(), 1);
        assert_eq!(result.invalid_items[0].reason, InvalidReason::NotInRegion);
        assert_eq!(result.reprice_items.len(), 1);
        assert_eq!(result.reprice_items[0].new_price_kurus, 3200);

        // Validation alone never mutates the cart
        let summary = flow.cart().summary();
        assert_eq!(summary.region_id, "a");
        assert_eq!(summary.item_count, 3);
    }

    #[tokio::test]
    async fn test_empty_cart_skips_fetch() {
        let flow = RegionSwitchFlow::new(MockSource::new(HashMap::new()), CartState::new("a"));

        let result = flow.begin("b").await.unwrap();

        assert_eq!(flow.source.call_count(), 0);
        assert!(!result.has_changes);
        assert_eq!(flow.phase(), FlowPhase::AwaitingConfirmation);

        // Confirming an all-clear report still restamps the region
        let outcome = flow.confirm().unwrap();
        assert_eq!(outcome.region_id, "b");
        assert_eq!(flow.cart().summary().region_id, "b");
    }

    #[tokio::test]
    async fn test_lookup_failure_returns_to_idle() {
        let flow = RegionSwitchFlow::new(MockSource::failing(), seeded_cart());

        let err = flow.begin("b").await.unwrap_err();
        assert!(matches!(err, SwitchError::LookupFailed(_)));
        assert_eq!(flow.phase(), FlowPhase::Idle);

        // Cart untouched, still in the old region
        let summary = flow.cart().summary();
        assert_eq!(summary.region_id, "a");
        assert_eq!(summary.item_count, 3);

        // And there is nothing to confirm
        assert!(matches!(
            flow.confirm().unwrap_err(),
            SwitchError::InvalidState { .. }
        ));
    }

    #[tokio::test]
    async fn test_confirm_applies_and_returns_to_idle() {
        let flow = RegionSwitchFlow::new(MockSource::new(region_b_snapshot()), seeded_cart());

        flow.begin("b").await.unwrap();
        let outcome = flow.confirm().unwrap();

        assert_eq!(outcome.region_id, "b");
        assert_eq!(outcome.dropped_items, 1);
        assert_eq!(outcome.repriced_items, 1);
        assert_eq!(outcome.remaining_items, 2);
        assert_eq!(flow.phase(), FlowPhase::Idle);

        let cart = flow.cart().snapshot();
        assert_eq!(cart.region_id, "b");
        assert_eq!(cart.items.len(), 2);
        for item in &cart.items {
            assert_eq!(item.region_id_at_add, "b");
        }
        let repriced = cart.items.iter().find(|i| i.product_id == "reprice").unwrap();
        assert_eq!(repriced.unit_price_at_add_kurus, 3200);
        // Quantity survives the reprice
        assert_eq!(repriced.quantity, 2);
    }

    #[tokio::test]
    async fn test_switch_round_trip_is_stable() {
        // Switching to b and immediately re-validating b finds no changes.
        let flow = RegionSwitchFlow::new(MockSource::new(region_b_snapshot()), seeded_cart());

        flow.begin("b").await.unwrap();
        flow.confirm().unwrap();

        let second = flow.begin("b").await.unwrap();
        assert!(!second.has_changes);
        flow.confirm().unwrap();
        assert_eq!(flow.cart().summary().item_count, 2);
    }

    #[tokio::test]
    async fn test_confirm_without_pending_is_invalid_state() {
        let flow = RegionSwitchFlow::new(MockSource::new(HashMap::new()), seeded_cart());
        assert!(matches!(
            flow.confirm().unwrap_err(),
            SwitchError::InvalidState { phase: "idle" }
        ));
    }

    #[tokio::test]
    async fn test_cancel_discards_report() {
        let flow = RegionSwitchFlow::new(MockSource::new(region_b_snapshot()), seeded_cart());

        flow.begin("b").await.unwrap();
        flow.cancel().unwrap();

        assert_eq!(flow.phase(), FlowPhase::Idle);
        assert_eq!(flow.cart().summary().region_id, "a");
        assert!(matches!(
            flow.confirm().unwrap_err(),
            SwitchError::InvalidState { .. }
        ));

        // Cancel twice is an error too
        assert!(matches!(
            flow.cancel().unwrap_err(),
            SwitchError::InvalidState { .. }
        ));
    }

    #[tokio::test]
    async fn test_second_switch_supersedes_first() {
        // Gate region b's fetch so the attempt hangs mid-validation, then
        // complete a switch to c, then release the gate.
        let gate = Arc::new(Notify::new());
        let mut snapshots = region_b_snapshot();
        snapshots.extend(snapshot(vec![
            listing("c", "keep", 1100, 5),
            listing("c", "reprice", 2800, 5),
            listing("c", "gone", 700, 5),
        ]));

        let mut source = MockSource::new(snapshots);
        source.gated_region = Some(("b".to_string(), gate.clone()));

        let flow = Arc::new(RegionSwitchFlow::new(source, seeded_cart()));

        let first = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.begin("b").await })
        };

        // Let the first attempt reach its gated fetch.
        while flow.phase() != FlowPhase::Validating {
            tokio::task::yield_now().await;
        }

        let second = flow.begin("c").await.unwrap();
        assert_eq!(second.region_id, "c");

        // Release the stalled fetch; the first attempt must come back
        // superseded and must not clobber the parked report for c.
        gate.notify_one();
        let first_result = first.await.unwrap();
        assert!(matches!(
            first_result.unwrap_err(),
            SwitchError::Superseded { region_id } if region_id == "b"
        ));

        assert_eq!(flow.phase(), FlowPhase::AwaitingConfirmation);
        let outcome = flow.confirm().unwrap();
        assert_eq!(outcome.region_id, "c");
        assert_eq!(flow.cart().summary().region_id, "c");
        // In c everything is listed: keep repriced to 1100, gone survives
        assert_eq!(outcome.remaining_items, 3);
    }

    #[tokio::test]
    async fn test_cancel_supersedes_in_flight_validation() {
        let gate = Arc::new(Notify::new());
        let mut source = MockSource::new(region_b_snapshot());
        source.gated_region = Some(("b".to_string(), gate.clone()));

        let flow = Arc::new(RegionSwitchFlow::new(source, seeded_cart()));

        let attempt = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.begin("b").await })
        };
        while flow.phase() != FlowPhase::Validating {
            tokio::task::yield_now().await;
        }

        flow.cancel().unwrap();
        assert_eq!(flow.phase(), FlowPhase::Idle);

        gate.notify_one();
        let result = attempt.await.unwrap();
        assert!(matches!(result.unwrap_err(), SwitchError::Superseded { .. }));

        // Nothing parked, cart untouched
        assert_eq!(flow.phase(), FlowPhase::Idle);
        assert_eq!(flow.cart().summary().region_id, "a");
    }
}
