#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod actions;
pub use actions::{
    Account, AccountKind, PrepareParameter, PrepareTransactionRequestArgs, ZkSyncClient,
    prepare_transaction_request, send_transaction, sign_transaction,
};

mod chains;
pub use chains::{
    BlockExplorer, ChainContracts, ContractDeployment, NativeCurrency, RpcEndpoints, RpcUrls,
    ZKSYNC_MULTICALL3, ZkSyncChain,
};

mod serializer;
pub use serializer::{TransactionSerializeError, serialize_transaction};
