//! Transaction types for zkSync Era.

mod eip712;
pub use eip712::TxEip712;

mod error;
pub use error::Eip712Error;

mod tx_type;
pub use tx_type::{EIP712_TX_TYPE_ID, PRIORITY_TX_TYPE_ID, ZkSyncTxType};
