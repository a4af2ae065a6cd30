//! # Seed Data Generator
//!
//! Populates the database with stationery articles for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p papyrus-db --bin seed
//!
//! # Specify database path
//! cargo run -p papyrus-db --bin seed -- --db ./data/papyrus.db
//! ```
//!
//! ## Generated Data
//! The articles of a small Colombian stationery shop: notebooks, pens,
//! pencils, art supplies, and office goods. Each article gets:
//! - Sequential code: `PRO-0001`, `PRO-0002`, ...
//! - An EAN-13-shaped barcode
//! - Realistic peso prices (purchase below sale)
//! - Starting stock via a recorded restock, so the purchase history
//!   feeds the profit/valuation reports from day one

use std::env;

use papyrus_db::{Database, DbConfig, NewArticle};
use tracing_subscriber::EnvFilter;

/// (name, description, purchase price, sale price, starting units)
const ARTICLES: &[(&str, &str, i64, i64, i64)] = &[
    ("Cuaderno rayado 100 hojas", "Norma, tapa dura", 3000, 5500, 40),
    ("Cuaderno cuadriculado 80 hojas", "Norma, argollado", 2600, 4800, 35),
    ("Lapiz HB", "Mirado No. 2", 400, 1000, 120),
    ("Lapiz 2B", "Para dibujo", 500, 1200, 60),
    ("Boligrafo negro", "Kilometrico retractil", 700, 1500, 100),
    ("Boligrafo azul", "Kilometrico retractil", 700, 1500, 100),
    ("Borrador de nata", "Pelikan ps-20", 300, 800, 80),
    ("Tajalapiz metalico", "Una cavidad", 400, 900, 50),
    ("Regla 30 cm", "Plastico transparente", 600, 1400, 45),
    ("Tijeras escolares", "Punta roma", 1800, 3500, 30),
    ("Pegante en barra 21 g", "Pritt", 2200, 4000, 40),
    ("Block iris carta", "Colores surtidos", 2800, 5000, 25),
    ("Caja de colores x12", "Prismacolor escolar", 8500, 14000, 20),
    ("Marcador permanente negro", "Sharpie fino", 1900, 3500, 60),
    ("Resaltador amarillo", "Stabilo Boss", 1600, 3000, 55),
    ("Carpeta plastica oficio", "Con gancho legajador", 900, 2000, 70),
    ("Grapadora", "Rank metalica, 20 hojas", 7500, 13500, 12),
    ("Caja de grapas 26/6", "x5000", 1800, 3200, 30),
    ("Cinta pegante 12mm x 40m", "Transparente", 1100, 2200, 48),
    ("Resma papel carta 75 g", "Reprograf x500", 11500, 18500, 15),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./papyrus_dev.db");

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
                println!("Papyrus POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./papyrus_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Papyrus POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.articles().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} articles", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding articles...");

    let mut seeded = 0;
    let start = std::time::Instant::now();

    for (idx, (name, description, purchase, sale, units)) in ARTICLES.iter().enumerate() {
        let new_article = NewArticle {
            name: name.to_string(),
            description: Some(description.to_string()),
            barcode: Some(format!("770{:010}", idx + 1)),
            image: None,
            purchase_price_cents: *purchase,
            sale_price_cents: *sale,
            initial_units: 0,
        };

        let article = match db.articles().insert(&new_article).await {
            Ok(article) => article,
            Err(e) => {
                eprintln!("Failed to insert {}: {}", name, e);
                continue;
            }
        };

        // Stock arrives as a recorded purchase so the reports have history
        if *units > 0 {
            if let Err(e) = db.inventory().restock(&article.id, *units, *purchase).await {
                eprintln!("Failed to restock {}: {}", article.code, e);
                continue;
            }
        }

        seeded += 1;
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seeded {} articles in {:?}", seeded, elapsed);

    let stocked = db.inventory().list_stocked().await?;
    let total_units: i64 = stocked.iter().map(|s| s.units_on_hand).sum();
    println!("  Catalog: {} articles, {} units on hand", stocked.len(), total_units);
    println!(
        "  Next code: {}",
        papyrus_core::sequence::next_article_code(db.articles().last_code().await?.as_deref())?
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
