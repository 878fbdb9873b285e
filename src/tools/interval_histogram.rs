//! Draws a saved histogram (the last line printed by `block-intervals`) as a text bar chart:
//! offset in seconds against number of occurrences.

use anyhow::Context;
use block_intervals::histogram::{Chart, DEFAULT_TITLE};
use block_intervals::OffsetTally;
use clap::Parser;
use std::fs::File;
use std::io::{stdout, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    tally: PathBuf,
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,
    /// Width of the longest bar
    #[arg(long, default_value_t = 60)]
    width: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let file = File::open(&args.tally)
        .with_context(|| format!("Failed to open {}", args.tally.display()))?;
    let tally: OffsetTally = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a histogram", args.tally.display()))?;

    let chart = Chart {
        title: &args.title,
        width: args.width,
    };
    chart.render(&tally, stdout().lock())?;
    Ok(())
}
