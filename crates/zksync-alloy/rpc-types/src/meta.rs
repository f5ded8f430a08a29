//! The `customData` object carried by zkSync Era RPC transactions and requests.

use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Paymaster address and input, nested under `customData.paymasterParams`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterParams {
    /// Account paying the fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    /// Input passed to the paymaster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_input: Option<Bytes>,
}

/// EIP-712 specific fields as they travel over RPC.
///
/// The wire protocol never puts these at the top level of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Meta {
    /// Gas limit per byte of pubdata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_per_pubdata: Option<U256>,
    /// Signature for custom accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_signature: Option<Bytes>,
    /// Paymaster configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_params: Option<PaymasterParams>,
    /// Bytecode of contracts deployed by the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_deps: Option<Vec<Bytes>>,
}

impl Eip712Meta {
    /// Builds the nested object from flat fields, returning `None` when all are absent.
    pub fn from_fields(
        gas_per_pubdata: Option<U256>,
        custom_signature: Option<Bytes>,
        paymaster: Option<Address>,
        paymaster_input: Option<Bytes>,
        factory_deps: Option<Vec<Bytes>>,
    ) -> Option<Self> {
        let paymaster_params = (paymaster.is_some() || paymaster_input.is_some())
            .then_some(PaymasterParams { paymaster, paymaster_input });
        let meta = Self { gas_per_pubdata, custom_signature, paymaster_params, factory_deps };
        (!meta.is_empty()).then_some(meta)
    }

    /// Returns `true` if no field is set.
    pub const fn is_empty(&self) -> bool {
        self.gas_per_pubdata.is_none()
            && self.custom_signature.is_none()
            && self.paymaster_params.is_none()
            && self.factory_deps.is_none()
    }

    /// Returns the paymaster address, if any.
    pub fn paymaster(&self) -> Option<Address> {
        self.paymaster_params.as_ref().and_then(|params| params.paymaster)
    }

    /// Returns the paymaster input, if any.
    pub fn paymaster_input(&self) -> Option<&Bytes> {
        self.paymaster_params.as_ref().and_then(|params| params.paymaster_input.as_ref())
    }
}
