//! # Seed Data Generator
//!
//! Populates the database with a demo catalogue, and optionally some sales.
//!
//! ## Usage
//! ```bash
//! # Catalogue only
//! cargo run -p kasir-db --bin seed
//!
//! # Catalogue plus 50 demo checkouts
//! cargo run -p kasir-db --bin seed -- --orders 50
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! Every product is sold in one of several pack sizes; each size gets its
//! own row with a scaled price.

use std::env;

use kasir_core::{CategoryInput, CheckoutItem, Money, ProductInput};
use kasir_db::{Database, DbConfig, DbError};

/// Demo catalogue: (category, description, [(product, base price)]).
const CATALOGUE: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Makanan",
        "Makanan instan dan bahan pokok",
        &[
            ("Indomie Goreng", 3000),
            ("Indomie Soto", 3000),
            ("Mie Sedaap Goreng", 3100),
            ("Beras Pandan Wangi 1kg", 15000),
            ("Gula Pasir 1kg", 17000),
            ("Minyak Goreng 1L", 18000),
            ("Roti Tawar", 16000),
            ("Sarden Kaleng", 12000),
        ],
    ),
    (
        "Minuman",
        "Minuman kemasan",
        &[
            ("Teh Botol Sosro", 5000),
            ("Aqua 600ml", 3500),
            ("Kopi Kapal Api", 1500),
            ("Susu Ultra Coklat", 6500),
            ("Pocari Sweat", 7500),
            ("Coca-Cola 390ml", 6000),
        ],
    ),
    (
        "Snack",
        "Makanan ringan",
        &[
            ("Chitato Sapi Panggang", 11000),
            ("Qtela Singkong", 9000),
            ("Tango Wafer", 8500),
            ("Beng-Beng", 2500),
            ("Silverqueen", 15000),
        ],
    ),
];

/// Pack sizes: (label, price multiplier).
const PACKS: &[(&str, i64)] = &[("", 1), ("(Isi 5)", 5), ("(Dus)", 40)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut orders: usize = 0;
    let mut db_path = String::from("./kasir_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    orders = args[i + 1].parse().unwrap_or(0);
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
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --orders <N>   Demo checkouts to run after seeding (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Kasir POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping catalogue to avoid duplicates.");
    } else {
        let inserted = seed_catalogue(&db).await?;
        println!("✓ Inserted {} products", inserted);
    }

    if orders > 0 {
        let (committed, rejected) = run_demo_checkouts(&db, orders).await?;
        println!(
            "✓ Demo checkouts: {} committed, {} rejected",
            committed, rejected
        );

        let today = db.reports().today_summary().await?;
        println!();
        println!("Today: {} revenue over {} orders", today.total_revenue, today.total_orders);
        if let Some(best) = today.best_seller {
            println!("Best seller: {} ({} sold)", best.name, best.quantity_sold);
        }
    }

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

async fn seed_catalogue(db: &Database) -> Result<usize, DbError> {
    let mut inserted = 0;

    for (category_idx, (category, description, products)) in CATALOGUE.iter().enumerate() {
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: category.to_string(),
                description: Some(description.to_string()),
            })
            .await?;

        for (product_idx, (name, base_price)) in products.iter().enumerate() {
            for (pack_idx, (pack, multiplier)) in PACKS.iter().enumerate() {
                let seed = category_idx * 100 + product_idx * 10 + pack_idx;
                let input = ProductInput {
                    name: format!("{} {}", name, pack).trim().to_string(),
                    price: Money::new(base_price * multiplier),
                    stock: 10 + (seed % 91) as i64,
                    category_id: Some(category.id),
                };

                match db.products().insert(&input).await {
                    Ok(_) => inserted += 1,
                    Err(e) => eprintln!("Failed to insert {}: {}", input.name, e),
                }
            }
        }
    }

    Ok(inserted)
}

/// Runs `count` small checkouts over the catalogue. Stock-outs are expected
/// once stock runs low and are counted, not fatal.
async fn run_demo_checkouts(db: &Database, count: usize) -> Result<(usize, usize), DbError> {
    let products = db.products().list().await?;
    if products.is_empty() {
        return Ok((0, 0));
    }

    let engine = db.checkout();
    let mut committed = 0;
    let mut rejected = 0;

    for n in 0..count {
        let lines = 1 + n % 3;
        let cart: Vec<CheckoutItem> = (0..lines)
            .map(|k| {
                let product = &products[(n * 7 + k * 13) % products.len()];
                CheckoutItem::new(product.id, 1 + ((n + k) % 4) as i64)
            })
            .collect();

        match engine.checkout(&cart).await {
            Ok(_) => committed += 1,
            Err(e) if e.is_retryable() => rejected += 1,
            Err(e) => return Err(e),
        }
    }

    Ok((committed, rejected))
}
