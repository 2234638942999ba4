//! # Seed Data Generator
//!
//! Populates the database with a demo catalog and one fully-specified
//! product, then prices it and prints the breakdown.
//!
//! ## Usage
//! ```bash
//! # Seed and price against the default dev database
//! cargo run -p fabcost-db --bin seed
//!
//! # Specify database path
//! cargo run -p fabcost-db --bin seed -- --db ./data/fabcost.db
//! ```
//!
//! ## Generated Data
//! - A small material catalog spanning every shape class:
//!   pipes and profiles (length × quantity), sheet steel (dimensions),
//!   fasteners (quantity only), and a paint line
//! - One product ("СТ-001 Кронштейн") with a bill of materials and
//!   labor operations drawn from the seeded rate sheet

use std::env;

use fabcost_core::material_cost::MaterialDimensions;
use fabcost_core::MaterialCatalogEntry;
use fabcost_db::{Database, DbConfig};
use uuid::Uuid;

/// Demo catalog rows: (category, name, diameter, section l/w, thickness,
/// kg per meter, price per kg).
const CATALOG: &[(&str, &str, f64, f64, f64, f64, f64, f64)] = &[
    ("Труба", "Труба 25х2", 25.0, 0.0, 0.0, 2.0, 1.5, 20.0),
    ("Труба", "Труба 32х3", 32.0, 0.0, 0.0, 3.0, 2.15, 20.0),
    ("Профиль", "Профиль 40х20х2", 0.0, 40.0, 20.0, 2.0, 1.78, 22.0),
    ("Прут", "Прут 10", 10.0, 0.0, 0.0, 0.0, 0.617, 19.0),
    ("Лист", "Лист 2мм", 0.0, 0.0, 0.0, 2.0, 0.0, 18.0),
    ("Метизы", "Болт М8х40", 0.0, 0.0, 0.0, 0.0, 0.0, 0.45),
    ("Краска", "Краска ПФ-115 серая", 0.0, 0.0, 0.0, 0.0, 0.0, 95.0),
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
    let mut db_path = String::from("./fabcost_dev.db");

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
                println!("Fabcost Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fabcost_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Fabcost Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.products().count().await? > 0 {
        println!("⚠ Database already has products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Material catalog
    let entries: Vec<MaterialCatalogEntry> = CATALOG
        .iter()
        .map(
            |&(category, name, diameter, sec_l, sec_w, thickness, kg_per_m, price)| {
                MaterialCatalogEntry {
                    id: Uuid::new_v4().to_string(),
                    category: category.to_string(),
                    name: name.to_string(),
                    diameter_mm: diameter,
                    section_length_mm: sec_l,
                    section_width_mm: sec_w,
                    thickness_mm: thickness,
                    weight_per_meter: kg_per_m,
                    purchase_price_t: 0.0,
                    delivery_price_t: 0.0,
                    waste_price: 0.0,
                    final_price_kg: price,
                    unit_of_measurement: if category == "Метизы" { "шт" } else { "м" }.to_string(),
                    our_price_per_kg: price,
                }
            },
        )
        .collect();

    let inserted = db.materials().insert_many(&entries).await?;
    println!("✓ Seeded {} catalog materials", inserted);

    // One demo product with a bill of materials across shape classes
    let product = db.products().create("СТ-001", "A-17", "Кронштейн").await?;

    let id_of = |name: &str| {
        entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id.clone())
            .expect("seeded material")
    };

    db.bom()
        .add_line(
            &product.id,
            &id_of("Труба 25х2"),
            &MaterialDimensions {
                length_m: 2.0,
                quantity: 3,
                ..Default::default()
            },
        )
        .await?;
    db.bom()
        .add_line(
            &product.id,
            &id_of("Лист 2мм"),
            &MaterialDimensions {
                length_m: 1.0,
                width_m: 0.5,
                thickness_m: 0.002,
                quantity: 2,
            },
        )
        .await?;
    db.bom()
        .add_line(
            &product.id,
            &id_of("Болт М8х40"),
            &MaterialDimensions {
                quantity: 24,
                ..Default::default()
            },
        )
        .await?;
    db.bom()
        .add_line(
            &product.id,
            &id_of("Краска ПФ-115 серая"),
            &MaterialDimensions {
                quantity: 1,
                ..Default::default()
            },
        )
        .await?;
    println!("✓ Product {} with 4 BOM lines", product.product_id);

    // Operations from the seeded rate sheet
    for (name, qty, time) in [("Сверление", 24_i64, 36.0), ("Сборка", 1, 45.0)] {
        let rate = db
            .rates()
            .get_by_name(name)
            .await?
            .expect("seeded rate")
            .rate_per_minute;
        db.operations()
            .add_operation(&product.id, name, qty, time, rate, None)
            .await?;
    }
    println!("✓ 2 labor operations");

    // Price it
    println!();
    println!("Pricing {}...", product.product_id);
    let result = db.pricing().save_calculated_price(&product.id).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
