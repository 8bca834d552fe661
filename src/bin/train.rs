//! Train the digit OCR network on a labeled sample file
//!
//! Usage: cargo run --bin train -- --data digits.json --store model_store

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use digit_ocr::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the digit OCR network on a labeled sample file")]
struct Args {
    /// JSON file holding an array of {"pixels": [...], "label": n} samples
    #[arg(short, long)]
    data: PathBuf,

    /// Directory for the snapshot and its backups
    #[arg(short, long, default_value = "model_store")]
    store: PathBuf,

    /// Full passes over the sample file
    #[arg(long, default_value_t = 1)]
    epochs: usize,

    /// Input pixels per sample (used when starting fresh)
    #[arg(long, default_value_t = 400)]
    input_size: usize,

    /// Hidden layer width (used when starting fresh)
    #[arg(long, default_value_t = 20)]
    hidden_nodes: usize,

    /// Learning rate (used when starting fresh)
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Backups to retain
    #[arg(long, default_value_t = 5)]
    max_backups: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let samples = load_samples(&args.data)
        .with_context(|| format!("failed to load samples from {}", args.data.display()))?;
    println!("Loaded {} samples", samples.len());

    let mut manager = SnapshotManager::new(DiskStore::open(&args.store)?, args.max_backups);

    // Resume from an existing snapshot; otherwise start fresh.
    let network = match manager.load() {
        Ok(network) => {
            println!(
                "Resuming from snapshot ({} hidden nodes)",
                network.hidden_nodes()
            );
            network
        }
        Err(Error::SnapshotNotFound) => {
            let config = NetworkConfig::default()
                .with_input_size(args.input_size)
                .with_hidden_nodes(args.hidden_nodes)
                .with_learning_rate(args.learning_rate);
            Network::new(&config)?
        }
        Err(e) => return Err(e.into()),
    };

    let mut trainer = Trainer::new(network).with_epochs(args.epochs);
    trainer.train(&samples)?;

    let accuracy = trainer.accuracy(&samples)?;
    manager.save(trainer.network())?;

    println!(
        "Training accuracy: {:.4} over {} samples",
        accuracy,
        samples.len()
    );
    println!("Snapshot saved under {}", args.store.display());
    Ok(())
}
