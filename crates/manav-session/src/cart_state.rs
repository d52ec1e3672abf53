//! # Cart State
//!
//! Manages the current session's shopping cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple session operations may access/modify the cart
//! 2. Only one operation should modify the cart at a time
//! 3. Session flows run concurrently on the async runtime
//!
//! The mutex is a `std::sync::Mutex`, never held across an `.await`:
//! every closure passed to `with_cart`/`with_cart_mut` is synchronous.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Frontend Action          Session Operation        Cart State Change   │
//! │  ───────────────          ─────────────────        ─────────────────   │
//! │                                                                         │
//! │  Click Product ──────────► add item ─────────────► items.push(item)    │
//! │                                                                         │
//! │  Change Quantity ────────► update quantity ──────► items[i].qty = n    │
//! │                                                                         │
//! │  Switch Region ──────────► RegionSwitchFlow ─────► validated rewrite   │
//! │                            (separate module)       of items + region   │
//! │                                                                         │
//! │  View Cart ──────────────► summary() ────────────► (read only)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use manav_core::Cart;

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub region_id: String,
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_kurus: i64,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        CartSummary {
            region_id: cart.region_id.clone(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_kurus: cart.subtotal_kurus(),
        }
    }
}

/// Shared, thread-safe cart state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Cart>>` because:
/// - `Arc`: Allows shared ownership across tasks
/// - `Mutex`: Ensures only one task modifies the cart at a time
///
/// ## Why Not RwLock?
/// Cart operations are typically quick, and most operations modify state.
/// A RwLock would add complexity with minimal benefit.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart scoped to the given region.
    pub fn new(region_id: impl Into<String>) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new(region_id))),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let summary = cart_state.with_cart(CartSummary::from);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(item))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    /// Returns a point-in-time copy of the cart.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    /// Returns the cart totals summary.
    pub fn summary(&self) -> CartSummary {
        self.with_cart(|cart| CartSummary::from(cart))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
