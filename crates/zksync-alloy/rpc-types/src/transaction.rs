//! zkSync Era specific types related to transactions.

use crate::{EnvelopeMarkers, meta::Eip712Meta};
use alloc::vec::Vec;
use alloy_primitives::{Address, B256, BlockHash, Bytes, ChainId, U8, U64, U256};
use serde::{Deserialize, Serialize};
use zksync_alloy_consensus::ZkSyncTxType;

mod request;
pub use request::{ZkSyncRpcTransactionRequest, ZkSyncTransactionRequest};

/// A transaction as returned by `eth_getTransactionByHash` on a zkSync node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncRpcTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Sender nonce.
    #[serde(with = "alloy_serde::quantity")]
    pub nonce: u64,
    /// Block hash, `None` while pending.
    #[serde(default)]
    pub block_hash: Option<BlockHash>,
    /// Block number, `None` while pending.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub block_number: Option<u64>,
    /// Index in the block, `None` while pending.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub transaction_index: Option<u64>,
    /// Sender.
    pub from: Address,
    /// Recipient, `None` for deployments.
    #[serde(default)]
    pub to: Option<Address>,
    /// Transferred value.
    pub value: U256,
    /// Gas price paid.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub gas_price: Option<u128>,
    /// Gas limit.
    #[serde(with = "alloy_serde::quantity")]
    pub gas: u64,
    /// Calldata.
    pub input: Bytes,
    /// ECDSA recovery id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<U256>,
    /// ECDSA `r`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<U256>,
    /// ECDSA `s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<U256>,
    /// Raw type tag.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<U8>,
    /// Max fee per gas.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub max_fee_per_gas: Option<u128>,
    /// Max priority fee per gas.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// Chain id.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub chain_id: Option<ChainId>,
    /// L1 batch containing the transaction, `None` until sealed.
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Index within the L1 batch, `None` until sealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l1_batch_tx_index: Option<U64>,
    /// Nested EIP-712 fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Eip712Meta>,
}

/// A zkSync Era transaction with EIP-712 fields at the top level and a symbolic type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Sender nonce.
    #[serde(with = "alloy_serde::quantity")]
    pub nonce: u64,
    /// Block hash, `None` while pending.
    #[serde(default)]
    pub block_hash: Option<BlockHash>,
    /// Block number, `None` while pending.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub block_number: Option<u64>,
    /// Index in the block, `None` while pending.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub transaction_index: Option<u64>,
    /// Sender.
    pub from: Address,
    /// Recipient, `None` for deployments.
    #[serde(default)]
    pub to: Option<Address>,
    /// Transferred value.
    pub value: U256,
    /// Gas price paid.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub gas_price: Option<u128>,
    /// Gas limit.
    #[serde(with = "alloy_serde::quantity")]
    pub gas: u64,
    /// Calldata.
    pub input: Bytes,
    /// ECDSA recovery id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<U256>,
    /// ECDSA `r`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<U256>,
    /// ECDSA `s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<U256>,
    /// Symbolic type, `None` if the tag is absent or unknown.
    #[serde(default, rename = "type", with = "type_name", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<ZkSyncTxType>,
    /// The raw type tag as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hex: Option<U8>,
    /// Max fee per gas.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub max_fee_per_gas: Option<u128>,
    /// Max priority fee per gas.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// Chain id.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub chain_id: Option<ChainId>,
    /// L1 batch containing the transaction.
    #[serde(default, with = "alloy_serde::quantity::opt")]
    pub l1_batch_number: Option<u64>,
    /// Index within the L1 batch.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub l1_batch_tx_index: Option<u64>,
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

impl ZkSyncTransaction {
    /// Presence of the fields relevant to envelope classification.
    pub const fn envelope_markers(&self) -> EnvelopeMarkers {
        EnvelopeMarkers {
            max_fee_per_gas: self.max_fee_per_gas.is_some(),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas.is_some(),
            paymaster: self.paymaster.is_some(),
            paymaster_input: self.paymaster_input.is_some(),
            gas_per_pubdata: self.gas_per_pubdata.is_some(),
            factory_deps: self.factory_deps.is_some(),
        }
    }

    /// Returns `true` if this transaction is shaped like an EIP-712 envelope.
    pub const fn is_eip712(&self) -> bool {
        self.envelope_markers().is_eip712()
    }
}

impl From<ZkSyncRpcTransaction> for ZkSyncTransaction {
    fn from(tx: ZkSyncRpcTransaction) -> Self {
        let ZkSyncRpcTransaction {
            hash,
            nonce,
            block_hash,
            block_number,
            transaction_index,
            from,
            to,
            value,
            gas_price,
            gas,
            input,
            v,
            r,
            s,
            transaction_type,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            chain_id,
            l1_batch_number,
            l1_batch_tx_index,
            custom_data,
        } = tx;
        let meta = custom_data.unwrap_or_default();
        let paymaster = meta.paymaster();
        let paymaster_input = meta.paymaster_input().cloned();

        Self {
            hash,
            nonce,
            block_hash,
            block_number,
            transaction_index,
            from,
            to,
            value,
            gas_price,
            gas,
            input,
            v,
            r,
            s,
            tx_type: transaction_type.and_then(|ty| ZkSyncTxType::try_from(ty.to::<u8>()).ok()),
            type_hex: transaction_type,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            chain_id,
            l1_batch_number: l1_batch_number.map(|n| n.to()),
            l1_batch_tx_index: l1_batch_tx_index.map(|i| i.to()),
            gas_per_pubdata: meta.gas_per_pubdata,
            custom_signature: meta.custom_signature,
            paymaster,
            paymaster_input,
            factory_deps: meta.factory_deps,
        }
    }
}

impl From<ZkSyncTransaction> for ZkSyncRpcTransaction {
    fn from(tx: ZkSyncTransaction) -> Self {
        let ZkSyncTransaction {
            hash,
            nonce,
            block_hash,
            block_number,
            transaction_index,
            from,
            to,
            value,
            gas_price,
            gas,
            input,
            v,
            r,
            s,
            tx_type,
            type_hex,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            chain_id,
            l1_batch_number,
            l1_batch_tx_index,
            gas_per_pubdata,
            custom_signature,
            paymaster,
            paymaster_input,
            factory_deps,
        } = tx;

        Self {
            hash,
            nonce,
            block_hash,
            block_number,
            transaction_index,
            from,
            to,
            value,
            gas_price,
            gas,
            input,
            v,
            r,
            s,
            transaction_type: type_hex.or_else(|| tx_type.map(Into::into)),
            max_fee_per_gas,
            max_priority_fee_per_gas,
            chain_id,
            l1_batch_number: l1_batch_number.map(U64::from),
            l1_batch_tx_index: l1_batch_tx_index.map(U64::from),
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

/// (De)serializes an optional [`ZkSyncTxType`] by its symbolic name.
pub(crate) mod type_name {
    use alloc::string::String;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use zksync_alloy_consensus::ZkSyncTxType;

    pub(crate) fn serialize<S: Serializer>(
        ty: &Option<ZkSyncTxType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ty {
            Some(ty) => serializer.collect_str(ty),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ZkSyncTxType>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|name| name.parse().map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloy_primitives::{address, b256, bytes};
    use rstest::rstest;

    // zks_getTransactionByHash on a local node
    const EIP1559_TX: &str = r#"{"blockHash":"0xf24f67fb9f8fb300164045fe6ba409acb03904e680ec7df41ed2d331dc38f545","blockNumber":"0x1","chainId":"0x104","from":"0x36615cf349d7f6344891b1e7ca7c72883f5dc049","gas":"0x0","gasPrice":"0x0","hash":"0xf24f67fb9f8fb300164045fe6ba409acb03904e680ec7df41ed2d331dc38f545","input":"0x02f87582010480840ee6b280840ee6b2808312b84b94a61464658afeaf65cccaafd3a512b69a83b77618880de0b6b3a764000080c080a08ab03d8a1aa4ab231867d9b12a1d7ebacaec3395cf9c4940674f83d79e342e4ca0475dda75d501e72fd816a9699f02af05ef7305668ee4acd0e25561d4628758a3","l1BatchNumber":"0x1","maxFeePerGas":"0xee6b280","maxPriorityFeePerGas":"0xee6b280","nonce":"0x0","r":"0x0","s":"0x0","to":"0xa61464658afeaf65cccaafd3a512b69a83b77618","transactionIndex":"0x1","type":"0x2","v":"0x104","value":"0xde0b6b3a7640000"}"#;

    const EIP712_TX: &str = r#"{"hash":"0xe56c11904d690e1bd41a7e901df609c2dc011d1033415379193ebc4197f32fc6","nonce":"0xf","blockHash":"0xfd73aaef0e91fcd6c171056b235a2b0f17650dcbe17038d17f76bbf3980c4da2","blockNumber":"0x8acd","transactionIndex":"0x0","from":"0xef9e8e39782b1b544a6eb6db6aa85207bacb4c20","to":"0x8b791913eb07c32779a16750e3868aa8495f5964","value":"0x0","gasPrice":"0xee6b280","gas":"0x86084b","input":"0x0fc87d25","v":"0x0","r":"0xfdea6b4ea965cb184257159dfdcbbe6045bf264c0de4d1b76c06821e4c33284","s":"0x39d0abb813b58d4ebd9c085cc31df866df218803e6a7808f21c3c651e4609981","type":"0x71","maxFeePerGas":"0xee6b280","maxPriorityFeePerGas":"0xee6b280","chainId":"0x144","l1BatchNumber":"0x239","l1BatchTxIndex":"0x154","customData":{"gasPerPubdata":"0xc350","paymasterParams":{"paymaster":"0x094499df5ee555ffc33af07862e43c90e6fee501","paymasterInput":"0x8c5a3445"},"factoryDeps":["0x0102"]}}"#;

    #[test]
    fn formats_eip1559_transaction() {
        let rpc: ZkSyncRpcTransaction = serde_json::from_str(EIP1559_TX).unwrap();
        let tx = ZkSyncTransaction::from(rpc);

        assert_eq!(tx.tx_type, Some(ZkSyncTxType::Eip1559));
        assert_eq!(tx.type_hex, Some(U8::from(2)));
        assert_eq!(tx.chain_id, Some(260));
        assert_eq!(tx.block_number, Some(1));
        assert_eq!(tx.transaction_index, Some(1));
        assert_eq!(tx.max_fee_per_gas, Some(250_000_000));
        assert_eq!(tx.value, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(tx.l1_batch_number, Some(1));
        assert_eq!(tx.gas_per_pubdata, None);
        assert_eq!(tx.paymaster, None);
        assert!(!tx.is_eip712());
    }

    #[test]
    fn promotes_custom_data() {
        let rpc: ZkSyncRpcTransaction = serde_json::from_str(EIP712_TX).unwrap();
        let tx = ZkSyncTransaction::from(rpc);

        assert_eq!(tx.tx_type, Some(ZkSyncTxType::Eip712));
        assert_eq!(tx.chain_id, Some(324));
        assert_eq!(tx.gas_per_pubdata, Some(U256::from(50_000)));
        assert_eq!(tx.paymaster, Some(address!("094499df5ee555ffc33af07862e43c90e6fee501")));
        assert_eq!(tx.paymaster_input, Some(bytes!("8c5a3445")));
        assert_eq!(tx.factory_deps, Some(vec![bytes!("0102")]));
        assert_eq!(tx.custom_signature, None);
        assert_eq!(tx.l1_batch_tx_index, Some(0x154));
        assert!(tx.is_eip712());

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "eip712");
        assert_eq!(json["l1BatchTxIndex"], "0x154");
        assert_eq!(json["typeHex"], "0x71");
        assert_eq!(json["paymaster"], "0x094499df5ee555ffc33af07862e43c90e6fee501");
        assert!(json.get("customData").is_none());
    }

    #[rstest]
    #[case("0x0", Some(ZkSyncTxType::Legacy))]
    #[case("0x1", Some(ZkSyncTxType::Eip2930))]
    #[case("0x2", Some(ZkSyncTxType::Eip1559))]
    #[case("0x71", Some(ZkSyncTxType::Eip712))]
    #[case("0xff", Some(ZkSyncTxType::Priority))]
    #[case("0x7e", None)]
    fn maps_type_tags(#[case] tag: &str, #[case] expected: Option<ZkSyncTxType>) {
        let mut json: serde_json::Value = serde_json::from_str(EIP1559_TX).unwrap();
        json["type"] = tag.into();
        let rpc: ZkSyncRpcTransaction = serde_json::from_value(json).unwrap();
        let tx = ZkSyncTransaction::from(rpc);
        assert_eq!(tx.tx_type, expected);
        assert!(tx.type_hex.is_some());
    }

    #[test]
    fn formatting_is_reversible() {
        let rpc: ZkSyncRpcTransaction = serde_json::from_str(EIP712_TX).unwrap();
        let tx = ZkSyncTransaction::from(rpc.clone());
        assert_eq!(ZkSyncTransaction::from(rpc.clone()), tx);
        similar_asserts::assert_eq!(ZkSyncRpcTransaction::from(tx), rpc);
    }

    #[test]
    fn priority_transaction_without_signature() {
        let json = r#"{"hash":"0xe9a1a8601bc9199c80c97169fdc9e1fc7c307185a0c9fa2cfab04098a7840645","nonce":"0x0","blockHash":"0x51f81bcdfc324a0dff2b5bec9d92e21cbebc4d5e29d3a3d30de3e03fbeab8d7f","blockNumber":"0x1","transactionIndex":"0x0","from":"0x29df43f75149d0552475a6f9b2ac96e28796ed0b","to":"0x0000000000000000000000000000000000008006","value":"0x0","gasPrice":"0x0","gas":"0x44aa200","input":"0x3cda3351","type":"0xff","maxFeePerGas":"0x0","maxPriorityFeePerGas":"0x0","chainId":"0x144","l1BatchNumber":"0x1","l1BatchTxIndex":"0x0"}"#;
        let tx = ZkSyncTransaction::from(serde_json::from_str::<ZkSyncRpcTransaction>(json).unwrap());
        assert_eq!(tx.tx_type, Some(ZkSyncTxType::Priority));
        assert_eq!(tx.v, None);
        assert_eq!(tx.gas, 72_000_000);
        assert_eq!(tx.l1_batch_number, Some(1));
        assert_eq!(tx.l1_batch_tx_index, Some(0));
        assert_eq!(
            tx.hash,
            b256!("e9a1a8601bc9199c80c97169fdc9e1fc7c307185a0c9fa2cfab04098a7840645")
        );
    }
}
