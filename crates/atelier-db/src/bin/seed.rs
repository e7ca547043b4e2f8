//! # Seed Data Generator
//!
//! Populates the database with development data: an apparel catalog, a few
//! contacts, and an active discount offer with a coupon code.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p atelier-db --bin seed
//!
//! # Custom catalog size or database path
//! cargo run -p atelier-db --bin seed -- --count 200
//! cargo run -p atelier-db --bin seed -- --db ./data/atelier.db
//! ```

use chrono::{Duration, Utc};
use std::env;
use uuid::Uuid;

use atelier_core::{Contact, ContactType, Product, ProductCategory, SalesChannel};
use atelier_db::service::CreateOfferRequest;
use atelier_db::{Database, DbConfig};

/// Apparel catalog shapes: (category, type, names).
const CATALOG: &[(ProductCategory, &str, &[&str])] = &[
    (
        ProductCategory::Men,
        "t-shirt",
        &["Classic Tee", "Heavy Crew Tee", "Pocket Tee", "Henley Tee"],
    ),
    (
        ProductCategory::Men,
        "shirt",
        &["Oxford Shirt", "Flannel Shirt", "Linen Shirt"],
    ),
    (
        ProductCategory::Women,
        "dress",
        &["Wrap Dress", "Shirt Dress", "Maxi Dress", "Slip Dress"],
    ),
    (
        ProductCategory::Women,
        "top",
        &["Ribbed Top", "Silk Blouse", "Boxy Tee"],
    ),
    (
        ProductCategory::Children,
        "t-shirt",
        &["Mini Tee", "Dino Print Tee", "Striped Tee"],
    ),
    (
        ProductCategory::Unisex,
        "hoodie",
        &["Fleece Hoodie", "Zip Hoodie", "Oversized Hoodie"],
    ),
];

/// Sales tax rates in basis points.
const TAX_RATES: &[u32] = &[500, 1200, 1800];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./atelier_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Atelier Commerce Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./atelier_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Atelier Commerce Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Contacts: one shopper, one vendor
    let now = Utc::now();
    let customer = Contact {
        id: Uuid::new_v4().to_string(),
        name: "Jane Shopper".into(),
        contact_type: ContactType::Customer,
        email: Some("jane@example.com".into()),
        mobile: Some("9876543210".into()),
        city: Some("Pune".into()),
        state: Some("Maharashtra".into()),
        pincode: Some("411001".into()),
        created_at: now,
    };
    db.contacts().insert(&customer).await?;

    let vendor = Contact {
        id: Uuid::new_v4().to_string(),
        name: "Mill & Loom Textiles".into(),
        contact_type: ContactType::Vendor,
        email: Some("orders@millandloom.example".into()),
        mobile: None,
        city: Some("Surat".into()),
        state: Some("Gujarat".into()),
        pincode: None,
        created_at: now,
    };
    db.contacts().insert(&vendor).await?;
    println!("✓ Contacts seeded (customer {}, vendor {})", customer.name, vendor.name);

    // Catalog
    println!();
    println!("Generating products...");

    let mut generated = 0usize;
    'outer: loop {
        for (category, product_type, names) in CATALOG {
            for name in *names {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(*category, product_type, name, generated);
                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }
                generated += 1;
            }
        }
    }
    println!("✓ Generated {} products", generated);

    // An active website offer with a redeemable coupon
    let (offer, coupon) = db
        .coupon_service()
        .create_offer(CreateOfferRequest {
            name: "Summer Sale".into(),
            discount_bps: 1500,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(30),
            channel: SalesChannel::Website,
            coupon_code: Some("SUMMER15".into()),
            coupon_contact_id: None,
            coupon_expiration: None,
        })
        .await?;
    println!(
        "✓ Offer '{}' seeded with coupon {}",
        offer.name,
        coupon.map(|c| c.code).unwrap_or_default()
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with plausible pricing.
fn generate_product(
    category: ProductCategory,
    product_type: &str,
    name: &str,
    seed: usize,
) -> Product {
    let now = Utc::now();

    // price 299.00 - 1798.00, deterministic per seed
    let sales_price_cents = 29900 + ((seed * 7919) % 1500) as i64 * 100;
    // purchase cost 50-70% of sales price
    let cost_pct = 50 + (seed % 21) as i64;
    let purchase_price_cents = sales_price_cents * cost_pct / 100;

    Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {}", name, seed + 1),
        category,
        product_type: product_type.to_string(),
        current_stock: ((seed * 13) % 80) as i64,
        sales_price_cents,
        sales_tax_bps: TAX_RATES[seed % TAX_RATES.len()],
        purchase_price_cents,
        purchase_tax_bps: TAX_RATES[(seed + 1) % TAX_RATES.len()],
        is_published: true,
        created_at: now,
        updated_at: now,
    }
}
