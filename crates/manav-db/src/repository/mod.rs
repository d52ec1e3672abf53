//! # Repository Module
//!
//! Database repository implementations for the Manav marketplace.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Session Flow (region switch)                                          │
//! │       │                                                                 │
//! │       │  db.listings().fetch_for_region(region_id, &ids)               │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ListingRepository                                                     │
//! │  ├── fetch_for_region(&self, region_id, product_ids)  ← ONE query     │
//! │  ├── get(&self, region_id, product_id)                                 │
//! │  ├── upsert(&self, listing)                                            │
//! │  └── update_stock(&self, region_id, product_id, qty)                   │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (mock the repository)                                  │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`region::RegionRepository`] - Region CRUD
//! - [`product::ProductRepository`] - Product catalog operations
//! - [`listing::ListingRepository`] - Region listings, batched lookups
//! - [`pricing_config::PricingConfigRepository`] - Active config management

pub mod listing;
pub mod pricing_config;
pub mod product;
pub mod region;
