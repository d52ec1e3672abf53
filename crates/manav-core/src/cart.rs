//! # Cart, Validator and Region-Switch Applier
//!
//! The shopping cart, plus the pure logic that revalidates it when the
//! customer switches delivery regions.
//!
//! ## Region Switch Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Region Switch Data Flow                              │
//! │                                                                         │
//! │  Cart items (captured prices, old region)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_for_region(items, "besiktas", listings)   ← PURE             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartValidationResult                                                  │
//! │  ├── invalid_items   [P2: not_in_region, P3: out_of_stock]             │
//! │  ├── reprice_items   [P1: ₺10.00 → ₺12.50]                             │
//! │  └── has_changes     true                                              │
//! │       │                                                                 │
//! │       │  (user confirms in manav-session)                              │
//! │       ▼                                                                 │
//! │  apply_region_change(items, "besiktas", &result)     ← PURE            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  New items: P2/P3 dropped, P1 repriced, everyone stamped "besiktas"    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions are pure: the validator never mutates the cart and may be
//! re-run freely; the applier is a deterministic transform whose output
//! depends only on its arguments.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::RegionListing;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the shopping cart.
///
/// ## Price Capturing
/// `unit_price_at_add_kurus` freezes the listing price valid in
/// `region_id_at_add` at the moment the item was added. It goes stale the
/// instant the customer switches regions — which is exactly what the
/// validator detects.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen, for display and reports).
    pub product_name: String,

    /// Quantity in cart.
    pub quantity: i64,

    /// Listing price in kuruş captured at time of adding.
    pub unit_price_at_add_kurus: i64,

    /// Region the captured price belongs to.
    pub region_id_at_add: String,

    /// Optional variation reference (e.g. size/grade).
    pub variation_id: Option<String>,

    /// Optional supplier reference.
    pub supplier_id: Option<String>,

    /// When this item was added to cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart item from a listing snapshot.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        region_id: impl Into<String>,
    ) -> Self {
        CartItem {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price_at_add_kurus: unit_price.kurus(),
            region_id_at_add: region_id.into(),
            variation_id: None,
            supplier_id: None,
            added_at: Utc::now(),
        }
    }

    /// Returns the captured unit price as Money.
    #[inline]
    pub fn unit_price_at_add(&self) -> Money {
        Money::from_kurus(self.unit_price_at_add_kurus)
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total_kurus(&self) -> i64 {
        self.unit_price_at_add_kurus * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart, scoped to one session and one region.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding same product merges quantity)
/// - Every item's `region_id_at_add` equals the cart's `region_id`
///   (the applier is the only code allowed to restamp it)
/// - Maximum items: 100; maximum quantity per item: 999
/// - Every mutation either fully applies or is rejected before any item
///   changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// The active delivery region.
    pub region_id: String,

    /// Items in the cart.
    pub items: Vec<CartItem>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart scoped to a region.
    pub fn new(region_id: impl Into<String>) -> Self {
        Cart {
            region_id: region_id.into(),
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds an item to the cart or merges quantity if already present.
    ///
    /// ## Behavior
    /// - Item priced for a different region: rejected
    ///   (`CoreError::CartRegionMismatch`)
    /// - Product already in cart: quantities merge
    /// - Otherwise: appended as a new line
    pub fn add_item(&mut self, item: CartItem) -> CoreResult<()> {
        if item.region_id_at_add != self.region_id {
            return Err(CoreError::CartRegionMismatch {
                cart_region: self.region_id.clone(),
                item_region: item.region_id_at_add,
            });
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            let new_qty = existing.quantity + item.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: item.quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items.push(item);
        Ok(())
    }

    /// Updates the quantity of an item in the cart.
    ///
    /// ## Behavior
    /// - Quantity 0: removes the item
    /// - Product not found: returns error
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ProductNotInCart(product_id.to_string())),
        }
    }

    /// Removes an item from the cart by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::ProductNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Returns the distinct product ids in the cart, for batched lookups.
    pub fn distinct_product_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|i| seen.insert(i.product_id.clone()))
            .map(|i| i.product_id.clone())
            .collect()
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Calculates the subtotal.
    pub fn subtotal_kurus(&self) -> i64 {
        self.items.iter().map(|i| i.line_total_kurus()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Validation Report Types
// =============================================================================

/// Why a cart item cannot survive a region switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// The product has no active listing in the new region.
    NotInRegion,
    /// A listing exists but is sold out or deactivated.
    OutOfStock,
}

/// A cart item that must be dropped on region switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvalidItem {
    pub product_id: String,
    pub product_name: String,
    pub reason: InvalidReason,
}

/// A cart item whose captured price must be updated on region switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RepriceItem {
    pub product_id: String,
    pub product_name: String,
    pub old_price_kurus: i64,
    pub new_price_kurus: i64,
}

/// The validator's report: what would change if the cart moved to
/// `region_id`.
///
/// Ephemeral by design — produced fresh on every switch attempt, never
/// persisted, never cached across switches. Items absent from both lists
/// are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartValidationResult {
    /// The region this report was computed for. The applier checks this
    /// against its own target region and fails fast on a mismatch.
    pub region_id: String,

    /// Items that must be dropped.
    pub invalid_items: Vec<InvalidItem>,

    /// Items that survive with a new price.
    pub reprice_items: Vec<RepriceItem>,

    /// True iff either list is non-empty.
    pub has_changes: bool,
}

impl CartValidationResult {
    /// An empty report: nothing to drop, nothing to reprice.
    pub fn empty(region_id: impl Into<String>) -> Self {
        CartValidationResult {
            region_id: region_id.into(),
            invalid_items: Vec::new(),
            reprice_items: Vec::new(),
            has_changes: false,
        }
    }
}

// =============================================================================
// Cart Validator
// =============================================================================

/// Classifies every cart item against a snapshot of the new region's
/// listings.
///
/// ## Classification Order (per item)
/// ```text
/// 1. no listing                        → invalid: not_in_region
/// 2. stock == 0 OR listing inactive    → invalid: out_of_stock
/// 3. listing price ≠ captured price    → reprice {old, new}
/// 4. otherwise                         → unchanged (in neither list)
/// ```
///
/// Every item lands in exactly one bucket; there is no "unknown" outcome.
/// Read-only: never mutates the cart, safe to call repeatedly.
///
/// The `listings` map is one consistent snapshot (a single batched fetch in
/// the db layer); this function never triggers I/O.
pub fn validate_for_region(
    items: &[CartItem],
    new_region_id: &str,
    listings: &HashMap<String, RegionListing>,
) -> CartValidationResult {
    let mut invalid_items = Vec::new();
    let mut reprice_items = Vec::new();

    for item in items {
        match listings.get(&item.product_id) {
            None => invalid_items.push(InvalidItem {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                reason: InvalidReason::NotInRegion,
            }),
            Some(listing) if listing.stock_quantity == 0 || !listing.is_active => {
                invalid_items.push(InvalidItem {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    reason: InvalidReason::OutOfStock,
                })
            }
            Some(listing) if listing.price_kurus != item.unit_price_at_add_kurus => {
                reprice_items.push(RepriceItem {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    old_price_kurus: item.unit_price_at_add_kurus,
                    new_price_kurus: listing.price_kurus,
                })
            }
            Some(_) => {} // unchanged
        }
    }

    let has_changes = !invalid_items.is_empty() || !reprice_items.is_empty();
    CartValidationResult {
        region_id: new_region_id.to_string(),
        invalid_items,
        reprice_items,
        has_changes,
    }
}

// =============================================================================
// Region-Switch Applier
// =============================================================================

/// Transforms the cart for its new region, given a validation report.
///
/// ## Transform
/// 1. Drop every item named in `result.invalid_items`
/// 2. Overwrite `unit_price_at_add` for items named in `result.reprice_items`
/// 3. Stamp every surviving item's `region_id_at_add` with `new_region_id`,
///    whether or not its price changed
///
/// ## Idempotence
/// Applying the same report twice yields the same items as applying it
/// once: dropped items simply aren't present for the second pass, reprices
/// overwrite to the same value, and the region stamp is unconditional.
///
/// ## Errors
/// `CoreError::StaleValidation` if `result` was computed for a different
/// region than `new_region_id`. The caller mixed up reports from two switch
/// attempts; failing fast beats silently mis-pricing the cart.
pub fn apply_region_change(
    items: Vec<CartItem>,
    new_region_id: &str,
    result: &CartValidationResult,
) -> CoreResult<Vec<CartItem>> {
    if result.region_id != new_region_id {
        return Err(CoreError::StaleValidation {
            expected: result.region_id.clone(),
            actual: new_region_id.to_string(),
        });
    }

    let invalid_ids: HashSet<&str> = result
        .invalid_items
        .iter()
        .map(|i| i.product_id.as_str())
        .collect();
    let new_prices: HashMap<&str, i64> = result
        .reprice_items
        .iter()
        .map(|r| (r.product_id.as_str(), r.new_price_kurus))
        .collect();

    let survivors = items
        .into_iter()
        .filter(|item| !invalid_ids.contains(item.product_id.as_str()))
        .map(|mut item| {
            if let Some(&price) = new_prices.get(item.product_id.as_str()) {
                item.unit_price_at_add_kurus = price;
            }
            item.region_id_at_add = new_region_id.to_string();
            item
        })
        .collect();

    Ok(survivors)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AvailabilityTier, PriceTrend};

    fn item(product_id: &str, price_kurus: i64, region: &str) -> CartItem {
        CartItem::new(
            product_id,
            format!("Product {product_id}"),
            1,
            Money::from_kurus(price_kurus),
            region,
        )
    }

    fn listing(product_id: &str, region: &str, price_kurus: i64, stock: i64) -> RegionListing {
        RegionListing {
            region_id: region.to_string(),
            product_id: product_id.to_string(),
            price_kurus,
            previous_price_kurus: None,
            price_trend: PriceTrend::Stable,
            stock_quantity: stock,
            availability: if stock > 10 {
                AvailabilityTier::Plenty
            } else {
                AvailabilityTier::Limited
            },
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    fn listings(entries: Vec<RegionListing>) -> HashMap<String, RegionListing> {
        entries
            .into_iter()
            .map(|l| (l.product_id.clone(), l))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Cart basics
    // -------------------------------------------------------------------------

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new("kadikoy");
        cart.add_item(item("p1", 999, "kadikoy")).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal_kurus(), 999);
    }

    #[test]
    fn test_cart_add_same_product_merges_quantity() {
        let mut cart = Cart::new("kadikoy");
        let mut first = item("p1", 999, "kadikoy");
        first.quantity = 2;
        let mut second = item("p1", 999, "kadikoy");
        second.quantity = 3;

        cart.add_item(first).unwrap();
        cart.add_item(second).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_rejects_item_from_other_region() {
        let mut cart = Cart::new("kadikoy");
        let err = cart.add_item(item("p1", 999, "besiktas")).unwrap_err();
        assert!(matches!(err, CoreError::CartRegionMismatch { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_update_and_remove() {
        let mut cart = Cart::new("kadikoy");
        cart.add_item(item("p1", 999, "kadikoy")).unwrap();

        cart.update_quantity("p1", 4).unwrap();
        assert_eq!(cart.total_quantity(), 4);

        cart.update_quantity("p1", 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.remove_item("p1").unwrap_err(),
            CoreError::ProductNotInCart(_)
        ));
    }

    #[test]
    fn test_distinct_product_ids_preserves_order() {
        let mut cart = Cart::new("kadikoy");
        cart.add_item(item("p2", 100, "kadikoy")).unwrap();
        cart.add_item(item("p1", 200, "kadikoy")).unwrap();
        assert_eq!(cart.distinct_product_ids(), vec!["p2", "p1"]);
    }

    // -------------------------------------------------------------------------
    // Validator
    // -------------------------------------------------------------------------

    #[test]
    fn test_reprice_detected() {
        // Item captured at ₺10.00 in region A; region B lists it at ₺12.50,
        // active and in stock.
        let items = vec![item("p1", 1000, "region-a")];
        let snapshot = listings(vec![listing("p1", "region-b", 1250, 20)]);

        let result = validate_for_region(&items, "region-b", &snapshot);

        assert!(result.invalid_items.is_empty());
        assert_eq!(result.reprice_items.len(), 1);
        assert_eq!(result.reprice_items[0].old_price_kurus, 1000);
        assert_eq!(result.reprice_items[0].new_price_kurus, 1250);
        assert!(result.has_changes);
    }

    #[test]
    fn test_missing_listing_is_not_in_region() {
        // No listing at all for the product in region B.
        let items = vec![item("p2", 500, "region-a")];
        let snapshot = listings(vec![]);

        let result = validate_for_region(&items, "region-b", &snapshot);

        assert_eq!(result.invalid_items.len(), 1);
        assert_eq!(result.invalid_items[0].reason, InvalidReason::NotInRegion);
        assert!(result.reprice_items.is_empty());
        assert!(result.has_changes);
    }

    #[test]
    fn test_zero_stock_is_out_of_stock() {
        // Listed in region B but with stock_quantity = 0.
        let items = vec![item("p3", 750, "region-a")];
        let snapshot = listings(vec![listing("p3", "region-b", 750, 0)]);

        let result = validate_for_region(&items, "region-b", &snapshot);

        assert_eq!(result.invalid_items.len(), 1);
        assert_eq!(result.invalid_items[0].reason, InvalidReason::OutOfStock);
    }

    #[test]
    fn test_inactive_listing_is_out_of_stock() {
        let items = vec![item("p3", 750, "region-a")];
        let mut delisted = listing("p3", "region-b", 750, 5);
        delisted.is_active = false;
        let snapshot = listings(vec![delisted]);

        let result = validate_for_region(&items, "region-b", &snapshot);
        assert_eq!(result.invalid_items[0].reason, InvalidReason::OutOfStock);
    }

    #[test]
    fn test_out_of_stock_wins_over_reprice() {
        // Stock check comes before the price comparison: a sold-out listing
        // with a different price is invalid, not repriced.
        let items = vec![item("p3", 750, "region-a")];
        let snapshot = listings(vec![listing("p3", "region-b", 999, 0)]);

        let result = validate_for_region(&items, "region-b", &snapshot);
        assert_eq!(result.invalid_items.len(), 1);
        assert!(result.reprice_items.is_empty());
    }

    #[test]
    fn test_unchanged_item_in_neither_list() {
        let items = vec![item("p1", 1000, "region-a")];
        let snapshot = listings(vec![listing("p1", "region-b", 1000, 20)]);

        let result = validate_for_region(&items, "region-b", &snapshot);

        assert!(result.invalid_items.is_empty());
        assert!(result.reprice_items.is_empty());
        assert!(!result.has_changes);
    }

    #[test]
    fn test_empty_cart_yields_empty_report() {
        let result = validate_for_region(&[], "region-b", &HashMap::new());
        assert_eq!(result, CartValidationResult::empty("region-b"));
    }

    #[test]
    fn test_classification_is_complete_and_exclusive() {
        // Every item appears in exactly one of {invalid, reprice, unchanged}.
        let items = vec![
            item("keep", 1000, "a"),
            item("reprice", 1000, "a"),
            item("gone", 1000, "a"),
            item("soldout", 1000, "a"),
        ];
        let snapshot = listings(vec![
            listing("keep", "b", 1000, 5),
            listing("reprice", "b", 1100, 5),
            listing("soldout", "b", 1000, 0),
        ]);

        let result = validate_for_region(&items, "b", &snapshot);

        let invalid: HashSet<_> = result
            .invalid_items
            .iter()
            .map(|i| i.product_id.clone())
            .collect();
        let repriced: HashSet<_> = result
            .reprice_items
            .iter()
            .map(|r| r.product_id.clone())
            .collect();

        assert!(invalid.is_disjoint(&repriced));
        for it in &items {
            let buckets =
                invalid.contains(&it.product_id) as u8 + repriced.contains(&it.product_id) as u8;
            assert!(buckets <= 1, "{} in two buckets", it.product_id);
        }
        assert_eq!(invalid.len() + repriced.len(), 3); // "keep" is unchanged
    }

    // -------------------------------------------------------------------------
    // Applier
    // -------------------------------------------------------------------------

    fn mixed_cart_and_report() -> (Vec<CartItem>, CartValidationResult) {
        let items = vec![
            item("keep", 1000, "a"),
            item("reprice", 1000, "a"),
            item("gone", 1000, "a"),
        ];
        let snapshot = listings(vec![
            listing("keep", "b", 1000, 5),
            listing("reprice", "b", 1250, 5),
        ]);
        let report = validate_for_region(&items, "b", &snapshot);
        (items, report)
    }

    #[test]
    fn test_apply_drops_reprices_and_stamps() {
        let (items, report) = mixed_cart_and_report();
        let applied = apply_region_change(items, "b", &report).unwrap();

        assert_eq!(applied.len(), 2);
        for it in &applied {
            assert_eq!(it.region_id_at_add, "b");
        }
        let repriced = applied.iter().find(|i| i.product_id == "reprice").unwrap();
        assert_eq!(repriced.unit_price_at_add_kurus, 1250);
        let kept = applied.iter().find(|i| i.product_id == "keep").unwrap();
        assert_eq!(kept.unit_price_at_add_kurus, 1000);
        assert!(!applied.iter().any(|i| i.product_id == "gone"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (items, report) = mixed_cart_and_report();
        let once = apply_region_change(items, "b", &report).unwrap();
        let twice = apply_region_change(once.clone(), "b", &report).unwrap();

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.product_id, b.product_id);
            assert_eq!(a.unit_price_at_add_kurus, b.unit_price_at_add_kurus);
            assert_eq!(a.region_id_at_add, b.region_id_at_add);
        }
    }

    #[test]
    fn test_apply_rejects_mismatched_region() {
        let (items, report) = mixed_cart_and_report();
        let err = apply_region_change(items, "c", &report).unwrap_err();
        assert!(matches!(err, CoreError::StaleValidation { .. }));
    }

    #[test]
    fn test_revalidation_after_apply_is_stable() {
        // Round-trip stability: apply, then validate against the same
        // region with the same snapshot → no changes.
        let (items, report) = mixed_cart_and_report();
        let snapshot = listings(vec![
            listing("keep", "b", 1000, 5),
            listing("reprice", "b", 1250, 5),
        ]);

        let applied = apply_region_change(items, "b", &report).unwrap();
        let second = validate_for_region(&applied, "b", &snapshot);

        assert!(!second.has_changes);
        assert!(second.invalid_items.is_empty());
        assert!(second.reprice_items.is_empty());
    }
}
