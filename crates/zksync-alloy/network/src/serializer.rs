//! Serializes zkSync Era transaction requests into raw transaction bytes.

use alloy_consensus::{SignableTransaction, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Bytes, Signature};
use tracing::{debug, trace};
use zksync_alloy_consensus::{Eip712Error, TxEip712};
use zksync_alloy_rpc_types::ZkSyncTransactionRequest;

/// An error serializing a transaction request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionSerializeError {
    /// The EIP-712 envelope could not be built or failed validation.
    #[error(transparent)]
    Eip712(#[from] Eip712Error),
    /// The request lacks fields required by its standard transaction type.
    #[error("transaction request is missing keys: {0:?}")]
    MissingKeys(Vec<&'static str>),
}

/// Serializes a request into raw transaction bytes.
///
/// Requests classified as EIP-712 (see [`ZkSyncTransactionRequest::is_eip712`]) are encoded
/// with the `0x71` envelope. Everything else is built into a standard typed transaction and
/// encoded as a signed EIP-2718 envelope when a signature is given, or as its signing payload
/// otherwise.
pub fn serialize_transaction(
    request: &ZkSyncTransactionRequest,
    signature: Option<&Signature>,
) -> Result<Bytes, TransactionSerializeError> {
    if request.is_eip712() {
        debug!(target: "zksync::serializer", signed = signature.is_some(), "Serializing EIP-712 transaction");
        let tx = TxEip712::try_from(request.clone())?;
        let encoded = tx.serialize(signature)?;
        trace!(target: "zksync::serializer", len = encoded.len(), "Encoded EIP-712 envelope");
        return Ok(encoded);
    }

    debug!(target: "zksync::serializer", signed = signature.is_some(), "Serializing standard transaction");
    let inner = request.inner.clone();
    let tx = inner.build_typed_tx().map_err(|request| {
        let missing = request.missing_keys().err().map(|(_, keys)| keys).unwrap_or_default();
        TransactionSerializeError::MissingKeys(missing)
    })?;

    let encoded: Bytes = match signature {
        Some(signature) => TxEnvelope::from(tx.into_signed(*signature)).encoded_2718().into(),
        None => tx.encoded_for_signing().into(),
    };
    trace!(target: "zksync::serializer", len = encoded.len(), "Encoded standard transaction");
    Ok(encoded)
}
