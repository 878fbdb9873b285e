//! Histograms of block time intervals, read from a node over RPC.

pub mod block;
pub mod histogram;
pub mod rpc;
pub mod scan;
pub mod source;
pub mod tally;

pub use block::Block;
pub use rpc::{BitcoinRpc, Chain, EthRpc};
pub use scan::{scan, BlockRange, ScanError, ScanReport};
pub use source::{BlockFetchError, BlockSource, MemorySource};
pub use tally::{Bucket, OffsetTally};

use bitcoincore_rpc::Auth;
use log::{warn, LevelFilter};
use std::path::PathBuf;

pub const DEFAULT_START_BLOCK: u64 = 13_000_000;
pub const DEFAULT_END_BLOCK: u64 = 14_000_000;

/// Logs go to stderr; stdout is reserved for the report.
pub fn set_up_logging(level: LevelFilter) -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

/// Picks RPC credentials: a cookie file wins over user/password; nothing given means no auth.
pub fn rpc_auth(
    user: Option<String>,
    password: Option<String>,
    cookie_file: Option<PathBuf>,
) -> Auth {
    match (cookie_file, user) {
        (Some(path), _) => Auth::CookieFile(path),
        (None, Some(user)) => Auth::UserPass(user, password.unwrap_or_default()),
        (None, None) => {
            if password.is_some() {
                warn!("RPC password given without a user; connecting without auth");
            }
            Auth::None
        }
    }
}
