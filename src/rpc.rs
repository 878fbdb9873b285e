//! Node backends over JSON-RPC.
//!
//! Both use the HTTP client from `bitcoincore-rpc`. Ethereum-family nodes are reached through
//! its generic `call`, as the JSON-RPC envelope is the same.

use crate::block::Block;
use crate::source::{BlockFetchError, BlockSource};
use bitcoincore_rpc::jsonrpc::error::Error as JsonRpcError;
use bitcoincore_rpc::{Auth, Client, RpcApi};
use log::debug;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Chain {
    /// Ethereum-family node (geth, core-geth): `eth_getBlockByNumber`.
    Eth,
    /// Bitcoin Core: `getblockhash` + `getblockheader`.
    Bitcoin,
}

impl Chain {
    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Chain::Eth => "http://localhost:8545",
            Chain::Bitcoin => "http://localhost:8332",
        }
    }

    pub fn connect(self, url: &str, auth: Auth) -> bitcoincore_rpc::Result<Box<dyn BlockSource>> {
        let client = Client::new(url, auth)?;
        Ok(match self {
            Chain::Eth => Box::new(EthRpc::new(client)),
            Chain::Bitcoin => Box::new(BitcoinRpc::new(client)),
        })
    }
}

pub struct EthRpc {
    client: Client,
}

impl EthRpc {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Maps an `eth_getBlockByNumber` result. The node answers `null` for unknown blocks.
    pub fn block_from_response(number: u64, response: Value) -> Result<Block, BlockFetchError> {
        if response.is_null() {
            return Err(BlockFetchError::NotFound { number });
        }
        Block::from_json(number, response, "number", "timestamp")
    }
}

impl BlockSource for EthRpc {
    fn block_by_number(&self, number: u64) -> Result<Block, BlockFetchError> {
        // `false`: transaction hashes only, not full bodies
        let response: Value = self
            .client
            .call(
                "eth_getBlockByNumber",
                &[json!(format!("{number:#x}")), json!(false)],
            )
            .map_err(|source| BlockFetchError::Rpc { number, source })?;
        debug!("eth_getBlockByNumber({number}) answered");
        Self::block_from_response(number, response)
    }
}

const RPC_INVALID_PARAMETER: i32 = -8;

pub struct BitcoinRpc {
    client: Client,
}

impl BitcoinRpc {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `getblockhash` answers RPC_INVALID_PARAMETER for heights past the tip.
    pub fn hash_error(height: u64, source: bitcoincore_rpc::Error) -> BlockFetchError {
        match source {
            bitcoincore_rpc::Error::JsonRpc(JsonRpcError::Rpc(ref e))
                if e.code == RPC_INVALID_PARAMETER =>
            {
                BlockFetchError::NotFound { number: height }
            }
            source => BlockFetchError::Rpc {
                number: height,
                source,
            },
        }
    }

    /// Maps a verbose `getblockheader` result.
    pub fn block_from_header(height: u64, header: Value) -> Result<Block, BlockFetchError> {
        Block::from_json(height, header, "height", "time")
    }
}

impl BlockSource for BitcoinRpc {
    fn block_by_number(&self, number: u64) -> Result<Block, BlockFetchError> {
        let hash = self
            .client
            .get_block_hash(number)
            .map_err(|source| Self::hash_error(number, source))?;
        let header: Value = self
            .client
            .call("getblockheader", &[json!(hash.to_string()), json!(true)])
            .map_err(|source| BlockFetchError::Rpc { number, source })?;
        debug!("Block #{number}: {hash}");
        Self::block_from_header(number, header)
    }
}
