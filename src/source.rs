use crate::block::Block;
use std::cell::Cell;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum BlockFetchError {
    #[error("block {number} not found")]
    NotFound { number: u64 },
    #[error("RPC call for block {number} failed")]
    Rpc {
        number: u64,
        #[source]
        source: bitcoincore_rpc::Error,
    },
    #[error("block {number} is malformed: {reason}")]
    Malformed { number: u64, reason: String },
}

impl BlockFetchError {
    pub fn number(&self) -> u64 {
        match self {
            BlockFetchError::NotFound { number }
            | BlockFetchError::Rpc { number, .. }
            | BlockFetchError::Malformed { number, .. } => *number,
        }
    }
}

/// Resolves block numbers to blocks.
///
/// Calls are blocking; any timeout or retry policy is up to the implementation.
pub trait BlockSource {
    fn block_by_number(&self, number: u64) -> Result<Block, BlockFetchError>;
}

impl<S: BlockSource + ?Sized> BlockSource for &S {
    fn block_by_number(&self, number: u64) -> Result<Block, BlockFetchError> {
        (**self).block_by_number(number)
    }
}

impl<S: BlockSource + ?Sized> BlockSource for Box<S> {
    fn block_by_number(&self, number: u64) -> Result<Block, BlockFetchError> {
        (**self).block_by_number(number)
    }
}

/// Blocks held in memory. Numbers not inserted resolve to [`BlockFetchError::NotFound`].
#[derive(Debug, Default)]
pub struct MemorySource {
    blocks: BTreeMap<u64, Block>,
    fetches: Cell<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive bare blocks starting at `first`, one per timestamp.
    pub fn from_timestamps(first: u64, timestamps: &[i64]) -> Self {
        let mut source = Self::new();
        for (number, &timestamp) in (first..).zip(timestamps) {
            source.insert(Block::bare(number, timestamp));
        }
        source
    }

    pub fn insert(&mut self, block: Block) {
        self.blocks.insert(block.number, block);
    }

    pub fn remove(&mut self, number: u64) -> Option<Block> {
        self.blocks.remove(&number)
    }

    /// How many lookups have been made, including failed ones.
    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl FromIterator<Block> for MemorySource {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        let mut source = Self::new();
        for block in iter {
            source.insert(block);
        }
        source
    }
}

impl BlockSource for MemorySource {
    fn block_by_number(&self, number: u64) -> Result<Block, BlockFetchError> {
        self.fetches.set(self.fetches.get() + 1);
        self.blocks
            .get(&number)
            .cloned()
            .ok_or(BlockFetchError::NotFound { number })
    }
}
