//! Errors raised while validating or decoding an EIP-712 envelope.

use alloy_primitives::{Bytes, ChainId};

/// An error validating, encoding or decoding a [`TxEip712`](crate::TxEip712).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Eip712Error {
    /// The chain id is not a positive integer.
    #[error("chain id {chain_id} is invalid")]
    InvalidChainId {
        /// The rejected chain id.
        chain_id: ChainId,
    },
    /// The destination is not a well-formed 20 byte address.
    #[error("address {address} is invalid")]
    InvalidAddress {
        /// The rejected destination bytes.
        address: Bytes,
    },
    /// Exactly one of `paymaster` and `paymasterInput` was set.
    #[error("`paymaster` and `paymasterInput` must be provided together, missing `{0}`")]
    PaymasterConfiguration(&'static str),
    /// A field required to build the envelope is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// The serialized payload does not start with the EIP-712 type byte.
    #[error("unexpected transaction type {0:#04x}")]
    UnexpectedType(u8),
    /// The payload is not valid RLP for the envelope.
    #[error("rlp decoding failed: {0}")]
    Rlp(alloy_rlp::Error),
}

impl From<alloy_rlp::Error> for Eip712Error {
    fn from(err: alloy_rlp::Error) -> Self {
        Self::Rlp(err)
    }
}
