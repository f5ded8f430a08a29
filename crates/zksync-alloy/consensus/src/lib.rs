#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod transaction;
pub use transaction::{
    EIP712_TX_TYPE_ID, Eip712Error, PRIORITY_TX_TYPE_ID, TxEip712, ZkSyncTxType,
};
