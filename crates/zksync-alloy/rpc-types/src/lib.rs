#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod block;
pub use block::{BlockTransaction, ZkSyncBlock, ZkSyncRpcBlock};

mod classify;
pub use classify::EnvelopeMarkers;

mod meta;
pub use meta::{Eip712Meta, PaymasterParams};

mod receipt;
pub use receipt::{L2ToL1Log, ZkSyncLog, ZkSyncRpcTransactionReceipt, ZkSyncTransactionReceipt};

mod transaction;
pub use transaction::{
    ZkSyncRpcTransaction, ZkSyncRpcTransactionRequest, ZkSyncTransaction,
    ZkSyncTransactionRequest,
};
