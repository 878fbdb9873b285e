//! Reads a saved histogram (the last line printed by `block-intervals`) and prints the share
//! of intervals falling within a bucket.

use anyhow::Context;
use block_intervals::{Bucket, OffsetTally};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    tally: PathBuf,
    /// Inclusive offset range in seconds
    #[arg(long, default_value = "1..9")]
    bucket: Bucket,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let file = File::open(&args.tally)
        .with_context(|| format!("Failed to open {}", args.tally.display()))?;
    let tally: OffsetTally = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a histogram", args.tally.display()))?;

    println!("bucket: {:.2}", tally.share(&args.bucket));
    Ok(())
}
