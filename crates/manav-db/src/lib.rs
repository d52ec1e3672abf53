//! # manav-db: Database Layer for the Manav Marketplace
//!
//! This crate provides database access for the regional marketplace.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Marketplace Data Flow                               │
//! │                                                                         │
//! │  Session flow (region switch, quote)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     manav-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (listing.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ RegionRepo    │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ ListingRepo   │    │ ...          │  │   │
//! │  │   │ Management    │    │ ConfigRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (region, product, listing, config)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manav_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/manav.db")).await?;
//!
//! let regions = db.regions().list_active().await?;
//! let listings = db.listings().fetch_for_region(&region.id, &product_ids).await?;
//! let config = db.pricing_configs().fetch_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::listing::ListingRepository;
pub use repository::pricing_config::PricingConfigRepository;
pub use repository::product::ProductRepository;
pub use repository::region::RegionRepository;
