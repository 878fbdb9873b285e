//! Block time interval histogram.
//!
//! Walks blocks `start..=end` on a node and counts how many blocks came exactly N seconds after
//! their parent. Prints the first block, the last block and the histogram as JSON.
//!
//! Defaults to Ethereum Classic blocks 13M..14M on a local core-geth with HTTP RPC enabled.

use anyhow::Context;
use block_intervals::{
    rpc_auth, scan, set_up_logging, BlockRange, Bucket, Chain, DEFAULT_END_BLOCK,
    DEFAULT_START_BLOCK,
};
use clap::Parser;
use log::{info, LevelFilter};
use std::io::{stdout, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Histogram of timestamp offsets between consecutive blocks")]
struct Args {
    /// First block whose interval to its parent is counted
    #[arg(long, env = "BLOCK_INTERVALS_START", default_value_t = DEFAULT_START_BLOCK)]
    start: u64,
    /// Last block, inclusive
    #[arg(long, env = "BLOCK_INTERVALS_END", default_value_t = DEFAULT_END_BLOCK)]
    end: u64,
    #[arg(long, env = "BLOCK_INTERVALS_CHAIN", value_enum, default_value = "eth")]
    chain: Chain,
    /// Node RPC endpoint. Defaults to the chain's usual local port
    #[arg(long, env = "BLOCK_INTERVALS_RPC_URL")]
    rpc_url: Option<String>,
    #[arg(long, env = "BLOCK_INTERVALS_RPC_USER")]
    rpc_user: Option<String>,
    #[arg(
        long,
        env = "BLOCK_INTERVALS_RPC_PASSWORD",
        hide_env_values = true,
        requires = "rpc_user"
    )]
    rpc_password: Option<String>,
    /// Bitcoin Core `.cookie` file; overrides user/password
    #[arg(long, env = "BLOCK_INTERVALS_COOKIE_FILE")]
    cookie_file: Option<PathBuf>,
    /// Also print the share of intervals within `MIN..MAX` seconds
    #[arg(long)]
    bucket: Option<Bucket>,
    /// Log progress every N blocks; 0 disables
    #[arg(long, default_value_t = block_intervals::scan::DEFAULT_PROGRESS_EVERY)]
    progress_every: u64,
    #[arg(long, env = "BLOCK_INTERVALS_LOG", default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    set_up_logging(args.log_level)?;

    let range = BlockRange::new(args.start, args.end)?;
    let url = args
        .rpc_url
        .unwrap_or_else(|| args.chain.default_rpc_url().into());
    let auth = rpc_auth(args.rpc_user, args.rpc_password, args.cookie_file);

    info!("Scanning {:?} blocks {}..={} via {url}", args.chain, range.start, range.end);
    let source = args
        .chain
        .connect(&url, auth)
        .with_context(|| format!("Failed to set up RPC client for {url}"))?;
    let report = scan(source, range, args.progress_every)?;
    info!(
        "Done: {} intervals, {} distinct offsets",
        report.tally.total(),
        report.tally.iter().filter(|&(_, c)| c != 0).count()
    );

    let mut out = stdout().lock();
    report.write_to(&mut out)?;
    if let Some(bucket) = args.bucket {
        writeln!(out, "bucket: {:.2}", report.tally.share(&bucket))?;
    }
    out.flush()?;
    Ok(())
}
