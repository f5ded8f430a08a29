//! Receipt types for RPC

use alloc::{string::String, vec::Vec};
use alloy_consensus::Eip658Value;
use alloy_primitives::{Address, B256, BlockHash, Bloom, Bytes, TxHash, U8, U64};
use serde::{Deserialize, Serialize};
use zksync_alloy_consensus::ZkSyncTxType;

/// An event log, with its coordinates kept as returned by the node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncLog {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Non-indexed data.
    pub data: Bytes,
    /// Block hash.
    #[serde(default)]
    pub block_hash: Option<BlockHash>,
    /// Block number.
    #[serde(default)]
    pub block_number: Option<U64>,
    /// L1 batch number.
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Transaction hash.
    #[serde(default)]
    pub transaction_hash: Option<TxHash>,
    /// Index of the transaction in the block.
    #[serde(default)]
    pub transaction_index: Option<U64>,
    /// Index of the log in the block.
    #[serde(default)]
    pub log_index: Option<U64>,
    /// Index of the log in the transaction.
    #[serde(default)]
    pub transaction_log_index: Option<U64>,
    /// Log type, unused by zkSync.
    #[serde(default)]
    pub log_type: Option<String>,
    /// Whether the log was removed by a reorg.
    #[serde(default)]
    pub removed: Option<bool>,
}

/// A message sent from L2 to L1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L2ToL1Log {
    /// Block number.
    pub block_number: U64,
    /// Block hash.
    pub block_hash: BlockHash,
    /// L1 batch number.
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Index of the transaction in the block.
    pub transaction_index: U64,
    /// Shard id.
    pub shard_id: U64,
    /// Whether the log was emitted by a system contract.
    pub is_service: bool,
    /// Sender of the message.
    pub sender: Address,
    /// Message key.
    pub key: B256,
    /// Message value.
    pub value: B256,
    /// Transaction hash.
    pub transaction_hash: TxHash,
    /// Index of the log in the block.
    pub log_index: U64,
}

/// A receipt as returned by `eth_getTransactionReceipt` on a zkSync node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncRpcTransactionReceipt {
    /// Transaction hash.
    pub transaction_hash: TxHash,
    /// Index in the block.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub transaction_index: Option<u64>,
    /// Block hash.
    #[serde(default)]
    pub block_hash: Option<BlockHash>,
    /// Block number.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub block_number: Option<u64>,
    /// Sender.
    pub from: Address,
    /// Recipient, `None` for deployments.
    #[serde(default)]
    pub to: Option<Address>,
    /// Gas used by this and all preceding transactions in the block.
    #[serde(with = "alloy_serde::quantity")]
    pub cumulative_gas_used: u64,
    /// Gas used by this transaction.
    #[serde(with = "alloy_serde::quantity")]
    pub gas_used: u64,
    /// Price paid per unit of gas.
    #[serde(with = "alloy_serde::quantity")]
    pub effective_gas_price: u128,
    /// Deployed contract, if any.
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Event logs.
    pub logs: Vec<ZkSyncLog>,
    /// L2 to L1 messages.
    #[serde(default)]
    pub l2_to_l1_logs: Vec<L2ToL1Log>,
    /// Bloom filter of the logs.
    pub logs_bloom: Bloom,
    /// `0x1` on success, `0x0` on failure.
    #[serde(default)]
    pub status: Option<U64>,
    /// Pre-Byzantium state root.
    #[serde(default)]
    pub root: Option<B256>,
    /// Raw type tag.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<U8>,
    /// L1 batch containing the transaction.
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Index within the L1 batch.
    #[serde(default)]
    pub l1_batch_tx_index: Option<U64>,
}

/// A zkSync Era transaction receipt with decoded batch coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[doc(alias = "ZkSyncTxReceipt")]
pub struct ZkSyncTransactionReceipt {
    /// Transaction hash.
    pub transaction_hash: TxHash,
    /// Index in the block.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub transaction_index: Option<u64>,
    /// Block hash.
    #[serde(default)]
    pub block_hash: Option<BlockHash>,
    /// Block number.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub block_number: Option<u64>,
    /// Sender.
    pub from: Address,
    /// Recipient, `None` for deployments.
    #[serde(default)]
    pub to: Option<Address>,
    /// Gas used by this and all preceding transactions in the block.
    #[serde(with = "alloy_serde::quantity")]
    pub cumulative_gas_used: u64,
    /// Gas used by this transaction.
    #[serde(with = "alloy_serde::quantity")]
    pub gas_used: u64,
    /// Price paid per unit of gas.
    #[serde(with = "alloy_serde::quantity")]
    pub effective_gas_price: u128,
    /// Deployed contract, if any.
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Event logs.
    pub logs: Vec<ZkSyncLog>,
    /// L2 to L1 messages.
    #[serde(default)]
    pub l2_to_l1_logs: Vec<L2ToL1Log>,
    /// Bloom filter of the logs.
    pub logs_bloom: Bloom,
    /// Execution outcome.
    #[serde(alias = "root")]
    pub status: Eip658Value,
    /// Symbolic type.
    #[serde(
        default,
        rename = "type",
        with = "crate::transaction::type_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub tx_type: Option<ZkSyncTxType>,
    /// L1 batch containing the transaction, `None` until sealed.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub l1_batch_number: Option<u64>,
    /// Index within the L1 batch, `None` until sealed.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub l1_batch_tx_index: Option<u64>,
}

impl ZkSyncTransactionReceipt {
    /// Returns `true` if the transaction succeeded.
    pub fn is_success(&self) -> bool {
        self.status.coerce_status()
    }
}

/// Decodes a batch coordinate, treating zero the same as absent.
fn batch_coordinate(value: Option<U64>) -> Option<u64> {
    value.map(|v| v.to::<u64>()).filter(|v| *v != 0)
}

impl From<ZkSyncRpcTransactionReceipt> for ZkSyncTransactionReceipt {
    fn from(receipt: ZkSyncRpcTransactionReceipt) -> Self {
        let ZkSyncRpcTransactionReceipt {
            transaction_hash,
            transaction_index,
            block_hash,
            block_number,
            from,
            to,
            cumulative_gas_used,
            gas_used,
            effective_gas_price,
            contract_address,
            logs,
            l2_to_l1_logs,
            logs_bloom,
            status,
            root,
            transaction_type,
            l1_batch_number,
            l1_batch_tx_index,
        } = receipt;

        let status = match (status, root) {
            (Some(status), _) => Eip658Value::Eip658(!status.is_zero()),
            (None, Some(root)) => Eip658Value::PostState(root),
            (None, None) => Eip658Value::Eip658(false),
        };

        Self {
            transaction_hash,
            transaction_index,
            block_hash,
            block_number,
            from,
            to,
            cumulative_gas_used,
            gas_used,
            effective_gas_price,
            contract_address,
            logs,
            l2_to_l1_logs,
            logs_bloom,
            status,
            tx_type: transaction_type.and_then(|ty| ZkSyncTxType::try_from(ty.to::<u8>()).ok()),
            l1_batch_number: batch_coordinate(l1_batch_number),
            l1_batch_tx_index: batch_coordinate(l1_batch_tx_index),
        }
    }
}
