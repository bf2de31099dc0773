//! # Sample Wallet Seeder
//!
//! Writes the sample loyalty cards into a wallet database for development.
//!
//! ## Usage
//! ```bash
//! # Seed the database from config (or the platform default)
//! cargo run -p cardholdr-store --bin seed
//!
//! # Specify database path
//! cargo run -p cardholdr-store --bin seed -- --db ./data/cardholdr.db
//!
//! # Wipe existing cards and seed again
//! cargo run -p cardholdr-store --bin seed -- --db ./data/cardholdr.db --reset
//! ```
//!
//! ## Output
//! After seeding, the wallet is listed in display order together with the
//! barcode layout each card would render to, so encoding problems show up
//! here before they show up on a phone.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use cardholdr_core::barcode::{BarcodeLayout, BarcodeRenderer};
use cardholdr_store::{CardStore, CardStoreOptions, CardholdrConfig, Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut reset = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--reset" | "-r" => reset = true,
            "--help" | "-h" => {
                println!("Cardholdr Sample Wallet Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>       Database file path (default: from config)");
                println!("  -c, --config <PATH>   Config file path");
                println!("  -r, --reset           Remove existing cards before seeding");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let config = CardholdrConfig::load_or_default(config_path);
    let db_path = match db_path {
        Some(path) => path,
        None => config.database_path()?,
    };

    println!("🌱 Cardholdr Sample Wallet Seeder");
    println!("=================================");
    println!("Database: {}", db_path.display());
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let options = CardStoreOptions {
        seed_sample_cards: true,
        ..CardStoreOptions::from(&config)
    };
    let store = CardStore::with_options(Arc::new(db.kv_store()), options);

    if reset {
        store.clear_all_cards().await?;
        println!("✓ Existing cards removed");
    }

    if store.initialize().await? {
        println!("✓ Sample cards written");
    } else {
        let existing = store.get_cards().await?.len();
        println!("⚠ Wallet already initialized ({} cards)", existing);
        println!("  Skipping seed to keep existing cards.");
        println!("  Run with --reset to start over.");
    }

    // Show the wallet the way the list screen would
    println!();
    println!("Wallet order:");

    let mut renderer = BarcodeRenderer::new(config.barcode);
    for (position, card) in store.get_cards().await?.iter().enumerate() {
        let layout = match renderer.render(&card.card_number, card.barcode_type) {
            BarcodeLayout::Linear { bars, .. } => format!("{} bars", bars.len()),
            BarcodeLayout::Qr { size, .. } => format!("QR {:.0}px", size),
            BarcodeLayout::Invalid { reason } => format!("INVALID: {}", reason),
        };

        println!(
            "  {}. {:<20} {:<22} {:<8} opens={} [{}]",
            position + 1,
            card.name,
            card.formatted_number(),
            card.barcode_type.as_str(),
            card.open_count,
            layout
        );
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise debug output for our crates only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cardholdr=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
