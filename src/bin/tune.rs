//! Search for a good hidden-layer width over a labeled sample file
//!
//! Usage: cargo run --bin tune -- --data digits.json --min-nodes 5 --max-nodes 50

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use digit_ocr::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hidden-width search for the digit OCR network")]
struct Args {
    /// JSON file holding an array of {"pixels": [...], "label": n} samples
    #[arg(short, long)]
    data: PathBuf,

    /// Smallest hidden width to try
    #[arg(long, default_value_t = 5)]
    min_nodes: usize,

    /// Largest hidden width to try (inclusive)
    #[arg(long, default_value_t = 50)]
    max_nodes: usize,

    /// Width increment between candidates
    #[arg(long, default_value_t = 5)]
    step: usize,

    /// Training epochs per candidate
    #[arg(long, default_value_t = 3)]
    epochs: usize,

    /// Repeated evaluation passes per candidate
    #[arg(long, default_value_t = 10)]
    eval_trials: usize,

    /// Fraction of the file used for training; the rest evaluates
    #[arg(long, default_value_t = 0.7)]
    train_ratio: f64,

    /// Input pixels per sample
    #[arg(long, default_value_t = 400)]
    input_size: usize,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Retrain the winning width and snapshot it here
    #[arg(long)]
    store: Option<PathBuf>,

    /// Backups to retain when saving the winner
    #[arg(long, default_value_t = 5)]
    max_backups: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let samples = load_samples(&args.data)
        .with_context(|| format!("failed to load samples from {}", args.data.display()))?;

    let split = (samples.len() as f64 * args.train_ratio) as usize;
    let (train_set, test_set) = samples.split_at(split.min(samples.len()));
    println!(
        "Data split: {} train / {} test",
        train_set.len(),
        test_set.len()
    );

    let base = NetworkConfig::default()
        .with_input_size(args.input_size)
        .with_learning_rate(args.learning_rate);
    let search_config = SearchConfig::default()
        .with_epochs(args.epochs)
        .with_eval_trials(args.eval_trials);

    let outcome = search(
        &base,
        &search_config,
        train_set,
        test_set,
        args.min_nodes,
        args.max_nodes,
        args.step,
    )?;

    println!("\nhidden_nodes  accuracy");
    for candidate in &outcome.ranked {
        println!("{:>12}  {:.4}", candidate.hidden_nodes, candidate.accuracy);
    }

    println!("\n=== Optimal ===");
    println!("Hidden nodes: {}", outcome.optimal.hidden_nodes);
    println!("Accuracy:     {:.4}", outcome.optimal.accuracy);

    if let Some(store_dir) = args.store {
        // Retrain the winning width on the training split and snapshot it
        let config = base.with_hidden_nodes(outcome.optimal.hidden_nodes);
        let mut trainer = Trainer::new(Network::new(&config)?).with_epochs(args.epochs);
        trainer.train(train_set)?;

        let mut manager = SnapshotManager::new(DiskStore::open(&store_dir)?, args.max_backups);
        manager.save(trainer.network())?;
        println!("Best model saved under {}", store_dir.display());
    }

    Ok(())
}
