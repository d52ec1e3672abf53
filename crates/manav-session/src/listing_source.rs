//! # Listing Source
//!
//! The seam between the region-switch flow and whatever supplies listing
//! snapshots.
//!
//! ## Why a Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ListingSource Seam                                   │
//! │                                                                         │
//! │  RegionSwitchFlow<S: ListingSource>                                    │
//! │       │                                                                 │
//! │       ├── production: S = ListingRepository (manav-db, SQLite)         │
//! │       │                                                                 │
//! │       └── tests: S = a mock with canned snapshots, injectable          │
//! │                      failures, and await gates for interleaving        │
//! │                                                                         │
//! │  The flow's supersede/cancel hardening is tested without a database.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::LookupError;
use manav_core::RegionListing;
use manav_db::ListingRepository;

/// Supplies one consistent listing snapshot for a region.
#[async_trait]
pub trait ListingSource {
    /// Fetches listings for the given products in the given region.
    ///
    /// ## Contract
    /// - One batched lookup; implementations must not fan out per product
    /// - Absent key = no listing exists for that product in the region
    /// - Inactive and sold-out listings are included (the validator
    ///   classifies them, the source does not)
    async fn fetch_listings(
        &self,
        region_id: &str,
        product_ids: &[String],
    ) -> Result<HashMap<String, RegionListing>, LookupError>;
}

/// The production source: the SQLite listing repository.
#[async_trait]
impl ListingSource for ListingRepository {
    async fn fetch_listings(
        &self,
        region_id: &str,
        product_ids: &[String],
    ) -> Result<HashMap<String, RegionListing>, LookupError> {
        let listings = self.fetch_for_region(region_id, product_ids).await?;
        Ok(listings)
    }
}
