use crate::block::Block;
use crate::source::{BlockFetchError, BlockSource};
use crate::tally::OffsetTally;
use log::{debug, info};
use std::io::{self, Write};

/// Log progress every this many blocks.
pub const DEFAULT_PROGRESS_EVERY: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid block range {start}..={end}: need 1 <= start <= end")]
    InvalidRange { start: u64, end: u64 },
    #[error(transparent)]
    Fetch(#[from] BlockFetchError),
}

/// Closed block range `start..=end`. The block before `start` is also fetched as the first
/// predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    pub fn new(start: u64, end: u64) -> Result<Self, ScanError> {
        if start == 0 || start > end {
            return Err(ScanError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of tallied intervals.
    pub fn interval_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub first_block: Block,
    pub last_block: Block,
    pub tally: OffsetTally,
}

impl ScanReport {
    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        writeln!(writer, "start block {}", serde_json::to_string(&self.first_block)?)?;
        writeln!(writer, "end block {}", serde_json::to_string(&self.last_block)?)?;
        writeln!(writer, "{}", serde_json::to_string(&self.tally)?)?;
        Ok(())
    }
}

/// Tallies the timestamp offset of every block in `range` against its predecessor.
///
/// Fetches `range.interval_count() + 1` blocks, one at a time; the boundary blocks for the
/// report are kept from the walk. The first failed fetch aborts the scan.
pub fn scan(
    source: impl BlockSource,
    range: BlockRange,
    progress_every: u64,
) -> Result<ScanReport, ScanError> {
    let BlockRange { start, end } = range;
    if start == 0 || start > end {
        return Err(ScanError::InvalidRange { start, end });
    }

    let mut previous = source.block_by_number(start - 1)?;
    let mut tally = OffsetTally::new();
    let mut first_block = None;

    for number in start..=end {
        let current = source.block_by_number(number)?;
        let offset = current
            .timestamp
            .checked_sub(previous.timestamp)
            .ok_or_else(|| BlockFetchError::Malformed {
                number,
                reason: format!(
                    "offset {} - {} overflows",
                    current.timestamp, previous.timestamp
                ),
            })?;
        tally.record(offset);

        if progress_every != 0 && number % progress_every == 0 {
            match current.time() {
                Some(time) => info!("{number} / {end} ({})", time.to_rfc3339()),
                None => info!("{number} / {end}"),
            }
        }
        if offset < 0 {
            debug!("Block #{number} is {} s older than its parent", -offset);
        }

        if number == start {
            first_block = Some(current.clone());
        }
        previous = current;
    }

    Ok(ScanReport {
        // the loop runs at least once, with `number == start`
        first_block: first_block.unwrap_or_else(|| previous.clone()),
        last_block: previous,
        tally,
    })
}
