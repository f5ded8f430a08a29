use crate::{EnvelopeMarkers, meta::Eip712Meta};
use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes, ChainId, TxKind, U256};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};
use zksync_alloy_consensus::{EIP712_TX_TYPE_ID, Eip712Error, TxEip712, ZkSyncTxType};

/// Builder for zkSync Era transactions, with the EIP-712 fields at the top level.
///
/// Use [`ZkSyncRpcTransactionRequest`] for the shape sent over RPC.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Deref,
    derive_more::DerefMut,
)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncTransactionRequest {
    /// Standard request fields.
    #[serde(flatten)]
    #[deref]
    #[deref_mut]
    pub inner: TransactionRequest,
    /// Gas limit per byte of pubdata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_per_pubdata: Option<U256>,
    /// Signature for custom accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_signature: Option<Bytes>,
    /// Account paying the fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    /// Input passed to the paymaster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_input: Option<Bytes>,
    /// Bytecode of contracts deployed by the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_deps: Option<Vec<Bytes>>,
}

impl ZkSyncTransactionRequest {
    /// Sets the `from` field in the call to the provided address
    #[inline]
    pub const fn from(mut self, from: Address) -> Self {
        self.inner.from = Some(from);
        self
    }

    /// Sets the recipient address for the transaction.
    #[inline]
    pub const fn to(mut self, to: Address) -> Self {
        self.inner.to = Some(TxKind::Call(to));
        self
    }

    /// Sets the chain id for the transaction.
    pub const fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.inner.chain_id = Some(chain_id);
        self
    }

    /// Sets the nonce for the transaction.
    pub const fn nonce(mut self, nonce: u64) -> Self {
        self.inner.nonce = Some(nonce);
        self
    }

    /// Sets the gas limit for the transaction.
    pub const fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.inner.gas = Some(gas_limit);
        self
    }

    /// Sets the maximum fee per gas for the transaction.
    pub const fn max_fee_per_gas(mut self, max_fee_per_gas: u128) -> Self {
        self.inner.max_fee_per_gas = Some(max_fee_per_gas);
        self
    }

    /// Sets the maximum priority fee per gas for the transaction.
    pub const fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: u128) -> Self {
        self.inner.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// Sets the value (amount) for the transaction.
    pub const fn value(mut self, value: U256) -> Self {
        self.inner.value = Some(value);
        self
    }

    /// Sets the input data for the transaction.
    pub fn input(mut self, input: TransactionInput) -> Self {
        self.inner.input = input;
        self
    }

    /// Sets the transaction type.
    #[doc(alias = "tx_type")]
    pub const fn transaction_type(mut self, tx_type: ZkSyncTxType) -> Self {
        self.inner.transaction_type = Some(tx_type as u8);
        self
    }

    /// Sets the gas limit per byte of pubdata.
    pub const fn gas_per_pubdata(mut self, gas_per_pubdata: U256) -> Self {
        self.gas_per_pubdata = Some(gas_per_pubdata);
        self
    }

    /// Sets the custom account signature.
    pub fn custom_signature(mut self, custom_signature: Bytes) -> Self {
        self.custom_signature = Some(custom_signature);
        self
    }

    /// Sets the paymaster and its input.
    pub fn paymaster(mut self, paymaster: Address, paymaster_input: Bytes) -> Self {
        self.paymaster = Some(paymaster);
        self.paymaster_input = Some(paymaster_input);
        self
    }

    /// Sets the factory dependencies.
    pub fn factory_deps(mut self, factory_deps: Vec<Bytes>) -> Self {
        self.factory_deps = Some(factory_deps);
        self
    }

    /// Returns the declared transaction type, if set and known.
    pub fn tx_type(&self) -> Option<ZkSyncTxType> {
        self.inner.transaction_type.and_then(|ty| ZkSyncTxType::try_from(ty).ok())
    }

    /// Presence of the fields relevant to envelope classification.
    pub const fn envelope_markers(&self) -> EnvelopeMarkers {
        EnvelopeMarkers {
            max_fee_per_gas: self.inner.max_fee_per_gas.is_some(),
            max_priority_fee_per_gas: self.inner.max_priority_fee_per_gas.is_some(),
            paymaster: self.paymaster.is_some(),
            paymaster_input: self.paymaster_input.is_some(),
            gas_per_pubdata: self.gas_per_pubdata.is_some(),
            factory_deps: self.factory_deps.is_some(),
        }
    }

    /// Returns `true` if this request must be encoded with the EIP-712 envelope.
    ///
    /// The declared type is ignored; see [`EnvelopeMarkers::is_eip712`].
    pub const fn is_eip712(&self) -> bool {
        self.envelope_markers().is_eip712()
    }
}

impl From<TransactionRequest> for ZkSyncTransactionRequest {
    fn from(inner: TransactionRequest) -> Self {
        Self { inner, ..Default::default() }
    }
}

impl TryFrom<ZkSyncTransactionRequest> for TxEip712 {
    type Error = Eip712Error;

    /// Builds the envelope, defaulting unset numeric fields to zero.
    fn try_from(request: ZkSyncTransactionRequest) -> Result<Self, Self::Error> {
        let ZkSyncTransactionRequest {
            inner,
            gas_per_pubdata,
            custom_signature,
            paymaster,
            paymaster_input,
            factory_deps,
        } = request;

        Ok(Self {
            chain_id: inner.chain_id.ok_or(Eip712Error::MissingField("chainId"))?,
            nonce: inner.nonce.unwrap_or_default(),
            max_priority_fee_per_gas: inner.max_priority_fee_per_gas.unwrap_or_default(),
            max_fee_per_gas: inner
                .max_fee_per_gas
                .ok_or(Eip712Error::MissingField("maxFeePerGas"))?,
            gas_limit: inner.gas.unwrap_or_default(),
            to: inner.to.and_then(|kind| kind.to().map(|to| Bytes::copy_from_slice(to.as_slice()))),
            value: inner.value.unwrap_or_default(),
            input: inner.input.into_input().unwrap_or_default(),
            from: inner.from,
            gas_per_pubdata,
            factory_deps: factory_deps.unwrap_or_default(),
            custom_signature,
            paymaster,
            paymaster_input,
        })
    }
}

impl From<TxEip712> for ZkSyncTransactionRequest {
    /// A `to` that is not a 20 byte address is dropped.
    fn from(tx: TxEip712) -> Self {
        let TxEip712 {
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to,
            value,
            input,
            from,
            gas_per_pubdata,
            factory_deps,
            custom_signature,
            paymaster,
            paymaster_input,
        } = tx;

        let to = match to {
            Some(to) => (to.len() == Address::len_bytes())
                .then(|| TxKind::Call(Address::from_slice(&to))),
            None => Some(TxKind::Create),
        };

        Self {
            inner: TransactionRequest {
                from,
                to,
                chain_id: Some(chain_id),
                nonce: Some(nonce),
                gas: Some(gas_limit),
                max_fee_per_gas: Some(max_fee_per_gas),
                max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
                value: Some(value),
                input: input.into(),
                transaction_type: Some(EIP712_TX_TYPE_ID),
                ..Default::default()
            },
            gas_per_pubdata,
            custom_signature,
            paymaster,
            paymaster_input,
            factory_deps: Some(factory_deps),
        }
    }
}

/// A transaction request in the shape a zkSync node accepts, with the EIP-712 fields nested
/// under `customData`.
///
/// A request typed [`ZkSyncTxType::Eip712`] keeps its `0x71` tag in `type`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncRpcTransactionRequest {
    /// Standard request fields.
    #[serde(flatten)]
    pub inner: TransactionRequest,
    /// Nested EIP-712 fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Eip712Meta>,
}

impl From<ZkSyncTransactionRequest> for ZkSyncRpcTransactionRequest {
    fn from(request: ZkSyncTransactionRequest) -> Self {
        let ZkSyncTransactionRequest {
            inner,
            gas_per_pubdata,
            custom_signature,
            paymaster,
            paymaster_input,
            factory_deps,
        } = request;

        Self {
            inner,
            custom_data: Eip712Meta::from_fields(
                gas_per_pubdata,
                custom_signature,
                paymaster,
                paymaster_input,
                factory_deps,
            ),
        }
    }
}

impl From<ZkSyncRpcTransactionRequest> for ZkSyncTransactionRequest {
    fn from(request: ZkSyncRpcTransactionRequest) -> Self {
        let meta = request.custom_data.unwrap_or_default();
        Self {
            inner: request.inner,
            paymaster: meta.paymaster(),
            paymaster_input: meta.paymaster_input().cloned(),
            gas_per_pubdata: meta.gas_per_pubdata,
            custom_signature: meta.custom_signature,
            factory_deps: meta.factory_deps,
        }
    }
}
