//! Block types for RPC.

use crate::{ZkSyncRpcTransaction, ZkSyncTransaction};
use alloc::{boxed::Box, vec::Vec};
use alloy_primitives::{B256, U64};
use alloy_rpc_types_eth::Header;
use serde::{Deserialize, Serialize};

/// An entry of a block's `transactions` list: a bare hash or the full object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransaction<T> {
    /// Only the transaction hash.
    Hash(B256),
    /// The full transaction.
    Full(Box<T>),
}

impl<T> BlockTransaction<T> {
    /// Returns the full transaction, if present.
    pub fn as_transaction(&self) -> Option<&T> {
        match self {
            Self::Hash(_) => None,
            Self::Full(tx) => Some(tx),
        }
    }
}

/// A block as returned by `eth_getBlockByNumber` on a zkSync node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncRpcBlock {
    /// Standard header fields.
    #[serde(flatten)]
    pub header: Header,
    /// Uncle hashes, always empty on zkSync.
    #[serde(default)]
    pub uncles: Vec<B256>,
    /// Transaction hashes or full transactions.
    pub transactions: Vec<BlockTransaction<ZkSyncRpcTransaction>>,
    /// L1 batch containing the block, `None` until sealed.
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Timestamp of the L1 batch, `None` until sealed.
    #[serde(default)]
    pub l1_batch_timestamp: Option<U64>,
}

/// A zkSync Era block with formatted transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncBlock {
    /// Standard header fields.
    #[serde(flatten)]
    pub header: Header,
    /// Uncle hashes.
    #[serde(default)]
    pub uncles: Vec<B256>,
    /// Transaction hashes or formatted transactions.
    pub transactions: Vec<BlockTransaction<ZkSyncTransaction>>,
    /// L1 batch containing the block.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub l1_batch_number: Option<u64>,
    /// Timestamp of the L1 batch.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub l1_batch_timestamp: Option<u64>,
}

impl From<ZkSyncRpcBlock> for ZkSyncBlock {
    fn from(block: ZkSyncRpcBlock) -> Self {
        let ZkSyncRpcBlock { header, uncles, transactions, l1_batch_number, l1_batch_timestamp } =
            block;

        let transactions = transactions
            .into_iter()
            .map(|tx| match tx {
                BlockTransaction::Hash(hash) => BlockTransaction::Hash(hash),
                BlockTransaction::Full(tx) => BlockTransaction::Full(Box::new((*tx).into())),
            })
            .collect();

        Self {
            header,
            uncles,
            transactions,
            l1_batch_number: l1_batch_number.map(|n| n.to()),
            l1_batch_timestamp: l1_batch_timestamp.map(|ts| ts.to()),
        }
    }
}
