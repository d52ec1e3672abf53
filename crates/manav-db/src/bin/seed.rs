//! # Seed Data Generator
//!
//! Populates the database with regions, products and listings for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p manav-db --bin seed
//!
//! # Specify database path
//! cargo run -p manav-db --bin seed -- --db ./data/manav.db
//! ```
//!
//! ## Generated Data
//! - 4 Istanbul regions with distinct price multipliers
//! - A grocery catalog (produce, dairy, pantry, bakery)
//! - One listing per (region, product) pair, priced through the
//!   marketplace pricing calculator
//! - An active pricing config (15% B2C markup, round to ₺0.50)

use chrono::Utc;
use std::env;
use uuid::Uuid;

use manav_core::{
    calculate_price, AvailabilityTier, CustomerType, Money, PriceMode, PriceTrend, Product, Region,
    RegionListing, RegionalPricingMode, UnitOfMeasure,
};
use manav_db::{Database, DbConfig};

/// (name, slug, multiplier_bps, min_order_kurus, districts)
const REGIONS: &[(&str, &str, u32, i64, &[&str])] = &[
    ("Kadıköy", "kadikoy", 10000, 15000, &["Moda", "Fenerbahçe", "Göztepe"]),
    ("Beşiktaş", "besiktas", 11500, 20000, &["Levent", "Etiler", "Ortaköy"]),
    ("Üsküdar", "uskudar", 10500, 15000, &["Kuzguncuk", "Çengelköy"]),
    ("Maltepe", "maltepe", 9500, 10000, &["Cevizli", "Bağlarbaşı"]),
];

const DELIVERY_SLOTS: &[&str] = &["09:00-12:00", "12:00-15:00", "15:00-18:00", "18:00-21:00"];

/// (category, [(name, unit, base_price_kurus)])
const CATALOG: &[(&str, &[(&str, UnitOfMeasure, i64)])] = &[
    (
        "produce",
        &[
            ("Domates (kg)", UnitOfMeasure::Kilogram, 2000),
            ("Salatalık (kg)", UnitOfMeasure::Kilogram, 1500),
            ("Biber (kg)", UnitOfMeasure::Kilogram, 3000),
            ("Patlıcan (kg)", UnitOfMeasure::Kilogram, 2500),
            ("Maydanoz (demet)", UnitOfMeasure::Bunch, 500),
            ("Roka (demet)", UnitOfMeasure::Bunch, 600),
            ("Elma (kg)", UnitOfMeasure::Kilogram, 1800),
            ("Muz (kg)", UnitOfMeasure::Kilogram, 4500),
            ("Limon (kg)", UnitOfMeasure::Kilogram, 2200),
        ],
    ),
    (
        "dairy",
        &[
            ("Süt (1L)", UnitOfMeasure::Liter, 2800),
            ("Yoğurt (1kg)", UnitOfMeasure::Kilogram, 4200),
            ("Beyaz Peynir (kg)", UnitOfMeasure::Kilogram, 18000),
            ("Kaşar Peyniri (kg)", UnitOfMeasure::Kilogram, 24000),
            ("Yumurta (15'li)", UnitOfMeasure::Pack, 7500),
            ("Tereyağı (500g)", UnitOfMeasure::Piece, 16000),
        ],
    ),
    (
        "pantry",
        &[
            ("Pirinç (kg)", UnitOfMeasure::Kilogram, 5500),
            ("Bulgur (kg)", UnitOfMeasure::Kilogram, 3200),
            ("Mercimek (kg)", UnitOfMeasure::Kilogram, 4000),
            ("Zeytinyağı (1L)", UnitOfMeasure::Liter, 22000),
            ("Makarna (500g)", UnitOfMeasure::Pack, 1200),
            ("Salça (700g)", UnitOfMeasure::Piece, 4800),
        ],
    ),
    (
        "bakery",
        &[
            ("Ekmek", UnitOfMeasure::Piece, 1000),
            ("Simit", UnitOfMeasure::Piece, 750),
            ("Pide", UnitOfMeasure::Piece, 1500),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./manav_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Manav Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./manav_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Manav Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.regions().count().await? > 0 {
        println!("⚠ Database already has regions");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Active pricing config: 15% B2C markup, 10% B2B, round to ₺0.50
    let config = db
        .pricing_configs()
        .activate(1000, 1500, PriceMode::Markup, RegionalPricingMode::Multiplier, 50)
        .await?;
    println!("✓ Pricing config activated ({})", config.id);

    // Regions
    let mut regions = Vec::new();
    for (idx, (name, slug, multiplier_bps, min_order, districts)) in REGIONS.iter().enumerate() {
        let region = Region {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            is_active: true,
            min_order_kurus: *min_order,
            delivery_fee_kurus: 1500,
            price_multiplier_bps: *multiplier_bps,
            sort_order: idx as i64,
            districts: districts.iter().map(|d| d.to_string()).collect(),
            delivery_slots: DELIVERY_SLOTS.iter().map(|s| s.to_string()).collect(),
        };
        db.regions().insert(&region).await?;
        regions.push(region);
    }
    println!("✓ Seeded {} regions", regions.len());

    // Products and listings
    let mut product_count = 0;
    let mut listing_count = 0;
    let start = std::time::Instant::now();

    for (category, entries) in CATALOG {
        for (seed_idx, (name, unit, base_price_kurus)) in entries.iter().enumerate() {
            let now = Utc::now();
            let product = Product {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                base_price_kurus: *base_price_kurus,
                unit: *unit,
                category: category.to_string(),
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            db.products().insert(&product).await?;
            product_count += 1;

            for region in &regions {
                let price = calculate_price(
                    Money::from_kurus(product.base_price_kurus),
                    &region.pricing_facts(),
                    CustomerType::B2c,
                    &config,
                )?;

                // Deterministic pseudo-random stock, with some sold out
                let stock = ((seed_idx * 7 + region.sort_order as usize * 3) % 25) as i64;

                let listing = RegionListing {
                    region_id: region.id.clone(),
                    product_id: product.id.clone(),
                    price_kurus: price.kurus(),
                    previous_price_kurus: None,
                    price_trend: PriceTrend::Stable,
                    stock_quantity: stock,
                    availability: if stock > 10 {
                        AvailabilityTier::Plenty
                    } else if stock > 2 {
                        AvailabilityTier::Limited
                    } else {
                        AvailabilityTier::Last
                    },
                    is_active: true,
                    updated_at: now,
                };
                db.listings().upsert(&listing).await?;
                listing_count += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Seeded {} products, {} listings in {:?}",
        product_count, listing_count, elapsed
    );

    // Verify a listing round-trips through the batched fetch
    let first_region = &regions[0];
    let sample_ids: Vec<String> = db
        .listings()
        .list_for_region(&first_region.id, 5)
        .await?
        .into_iter()
        .map(|l| l.product_id)
        .collect();
    let map = db
        .listings()
        .fetch_for_region(&first_region.id, &sample_ids)
        .await?;
    println!(
        "  Batched fetch for {}: {} of {} listings",
        first_region.slug,
        map.len(),
        sample_ids.len()
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
