//! # Seed Data Generator
//!
//! Populates a database with a demo tenant and inventory for development.
//!
//! ## Usage
//! ```bash
//! # Default database (./balanza.db) and product count
//! cargo run -p balanza-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p balanza-db --bin seed -- --count 500 --db ./data/balanza.db
//! ```
//!
//! Each product has a unique SKU `{CATEGORY}-{INDEX}`, a cost between
//! $1.00 and $20.00, a margin-bearing sale price, and a random stock
//! level, so the low-stock report and the settlement paths all have
//! something to chew on.

use std::env;

use balanza_db::repository::product::NewProduct;
use balanza_db::repository::tenant::NewTenant;
use balanza_db::{Database, DbConfig};

/// Product categories for realistic test data.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "PAP",
        &[
            "Cuaderno argollado",
            "Resma carta",
            "Caja esferos",
            "Marcadores",
            "Carpeta legajadora",
            "Sobres manila",
            "Cinta adhesiva",
            "Grapadora",
        ],
    ),
    (
        "TEC",
        &[
            "Mouse",
            "Teclado",
            "Cable USB",
            "Audífonos",
            "Memoria USB 32GB",
            "Cargador universal",
            "Base refrigerante",
        ],
    ),
    (
        "ASE",
        &[
            "Jabón líquido",
            "Toallas de papel",
            "Desinfectante",
            "Bolsas de basura",
            "Guantes de nitrilo",
        ],
    ),
    (
        "CAF",
        &[
            "Café molido 500g",
            "Azúcar 1kg",
            "Vasos desechables",
            "Mezcladores",
            "Aromática surtida",
        ],
    ),
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let count = arg_value(&args, "--count")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(200);
    let config = match arg_value(&args, "--db") {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env(),
    };

    println!(
        "Seeding {} products into {}",
        count,
        config.database_path.display()
    );

    let db = Database::new(config)
        .await
        .expect("failed to open database");

    let tenant = db
        .tenants()
        .create(NewTenant {
            name: "Papelería Demo".to_string(),
            tax_id: "900000000-1".to_string(),
            address: Some("Calle 10 # 4-21".to_string()),
            phone: Some("601 555 0100".to_string()),
            email: Some("demo@balanza.app".to_string()),
        })
        .await
        .expect("failed to create demo tenant");

    println!("Created tenant {} ({})", tenant.name, tenant.id);

    let mut created = 0usize;
    'outer: for index in 0.. {
        for (prefix, names) in CATEGORIES {
            if created >= count {
                break 'outer;
            }

            let name = names[index % names.len()];
            // Deterministic pseudo-variety; good enough for dev data
            let cost = 100 + ((index * 37) % 1900) as i64;
            let markup = 30 + ((index * 13) % 70) as i64; // 30% to 99%
            let stock = ((index * 7) % 100) as i64;

            let result = db
                .products()
                .create(
                    &tenant.id,
                    NewProduct {
                        sku: format!("{}-{:04}", prefix, index),
                        name: format!("{} {}", name, index),
                        category: Some(prefix.to_string()),
                        unit_cost_cents: cost,
                        sale_price_cents: cost + cost * markup / 100,
                        quantity_on_hand: stock,
                        ..Default::default()
                    },
                )
                .await;

            match result {
                Ok(_) => created += 1,
                Err(err) => {
                    eprintln!("Failed to insert product: {}", err);
                    std::process::exit(1);
                }
            }
        }
    }

    println!("Seeded {} products", created);
}

/// Returns the value following `flag` in the argument list.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
