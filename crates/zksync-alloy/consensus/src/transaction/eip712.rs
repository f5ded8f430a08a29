//! The zkSync Era EIP-712 (`0x71`) transaction envelope.

use crate::{EIP712_TX_TYPE_ID, Eip712Error, ZkSyncTxType};
use alloc::vec::Vec;
use alloy_eips::Typed2718;
use alloy_primitives::{Address, Bytes, ChainId, Signature, U256};
use alloy_rlp::{BufMut, Decodable, EMPTY_STRING_CODE, Encodable, Header};

/// Length of the `r ‖ s` signature slot.
const SIGNATURE_SLOT_LEN: usize = 64;

/// A zkSync Era transaction using the EIP-712 envelope.
///
/// On the wire this is the `0x71` type byte followed by a 17 element RLP list. The first
/// eleven elements keep the shape of a signed legacy transaction (the chain id fills both the
/// `v` slot and the slot after `r`/`s`); the custom fields are appended after them:
///
/// | # | field |
/// |---|---|
/// | 1 | `nonce` |
/// | 2 | `max_priority_fee_per_gas` |
/// | 3 | `max_fee_per_gas` |
/// | 4 | `gas_limit` |
/// | 5 | `to` |
/// | 6 | `value` |
/// | 7 | `input` |
/// | 8 | `chain_id` |
/// | 9 | empty |
/// | 10 | empty |
/// | 11 | `chain_id` |
/// | 12 | `from` |
/// | 13 | `gas_per_pubdata` |
/// | 14 | `factory_deps` |
/// | 15 | signature `r ‖ s` |
/// | 16 | `custom_signature` |
/// | 17 | `[paymaster, paymaster_input]` |
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[doc(alias = "Eip712Transaction", alias = "TransactionEip712", alias = "Eip712Tx")]
pub struct TxEip712 {
    /// Chain the transaction is valid on. Must be positive.
    #[cfg_attr(feature = "serde", serde(with = "alloy_serde::quantity"))]
    pub chain_id: ChainId,
    /// Sender nonce.
    #[cfg_attr(feature = "serde", serde(with = "alloy_serde::quantity"))]
    pub nonce: u64,
    /// Max priority fee, also known as `GasTipCap`.
    #[cfg_attr(feature = "serde", serde(with = "alloy_serde::quantity"))]
    pub max_priority_fee_per_gas: u128,
    /// Max fee per gas, also known as `GasFeeCap`.
    #[cfg_attr(feature = "serde", serde(with = "alloy_serde::quantity"))]
    pub max_fee_per_gas: u128,
    /// Gas limit.
    #[cfg_attr(
        feature = "serde",
        serde(with = "alloy_serde::quantity", rename = "gas", alias = "gasLimit")
    )]
    pub gas_limit: u64,
    /// Raw destination bytes. `None` for contract deployment.
    ///
    /// Kept unparsed so a malformed destination is reported by [`TxEip712::validate`] instead
    /// of being silently dropped.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub to: Option<Bytes>,
    /// Transferred value in wei.
    pub value: U256,
    /// Calldata.
    #[cfg_attr(feature = "serde", serde(alias = "data"))]
    pub input: Bytes,
    /// Initiator of the transaction.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub from: Option<Address>,
    /// Gas limit per byte of pubdata published to L1.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub gas_per_pubdata: Option<U256>,
    /// Bytecode of contracts deployed by this transaction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub factory_deps: Vec<Bytes>,
    /// Signature verified by a custom account instead of the ECDSA `r ‖ s` slot.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub custom_signature: Option<Bytes>,
    /// Account paying the fees for this transaction.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub paymaster: Option<Address>,
    /// Opaque input handed to the paymaster.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub paymaster_input: Option<Bytes>,
}

impl TxEip712 {
    /// Get the transaction type
    #[doc(alias = "transaction_type")]
    pub const fn tx_type() -> ZkSyncTxType {
        ZkSyncTxType::Eip712
    }

    /// Checks the preconditions for encoding.
    ///
    /// The chain id must be positive, `to` must be a 20 byte address if present, and
    /// `paymaster` and `paymaster_input` must be set together.
    pub fn validate(&self) -> Result<(), Eip712Error> {
        if self.chain_id == 0 {
            return Err(Eip712Error::InvalidChainId { chain_id: self.chain_id });
        }
        if let Some(to) = &self.to {
            if to.len() != Address::len_bytes() {
                return Err(Eip712Error::InvalidAddress { address: to.clone() });
            }
        }
        match (&self.paymaster, &self.paymaster_input) {
            (Some(_), None) => Err(Eip712Error::PaymasterConfiguration("paymasterInput")),
            (None, Some(_)) => Err(Eip712Error::PaymasterConfiguration("paymaster")),
            _ => Ok(()),
        }
    }

    /// Validates the transaction and returns its `0x71` tagged encoding.
    ///
    /// The signature, when given, fills the `r ‖ s` slot; otherwise the slot is empty.
    pub fn serialize(&self, signature: Option<&Signature>) -> Result<Bytes, Eip712Error> {
        self.validate()?;
        let mut out = Vec::with_capacity(self.encoded_len(signature));
        self.encode(signature, &mut out);
        Ok(out.into())
    }

    /// Writes the `0x71` tagged encoding without validating.
    pub fn encode(&self, signature: Option<&Signature>, out: &mut dyn BufMut) {
        out.put_u8(EIP712_TX_TYPE_ID);
        self.rlp_header(signature).encode(out);
        self.rlp_encode_fields(signature, out);
    }

    /// Length of [`TxEip712::encode`] output, including the type byte.
    pub fn encoded_len(&self, signature: Option<&Signature>) -> usize {
        1 + self.rlp_header(signature).length_with_payload()
    }

    fn rlp_header(&self, signature: Option<&Signature>) -> Header {
        Header { list: true, payload_length: self.rlp_encoded_fields_length(signature) }
    }

    /// Outputs the length of the 17 fields, without a RLP header.
    pub fn rlp_encoded_fields_length(&self, signature: Option<&Signature>) -> usize {
        self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.as_ref().map_or(1, |to| to.length())
            + self.value.length()
            + self.input.length()
            + self.chain_id.length() * 2
            + 2 // empty `r` and `s` placeholders
            + self.from.as_ref().map_or(1, |from| from.length())
            + self.gas_per_pubdata.unwrap_or_default().length()
            + self.factory_deps.length()
            + signature.map_or(1, |_| {
                Header { list: false, payload_length: SIGNATURE_SLOT_LEN }.length_with_payload()
            })
            + self.custom_signature.as_ref().map_or(1, |sig| sig.length())
            + self.paymaster_params_header().length_with_payload()
    }

    /// Encodes the 17 fields into the desired buffer, without a RLP header.
    pub fn rlp_encode_fields(&self, signature: Option<&Signature>, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        encode_or_empty(self.to.as_ref(), out);
        self.value.encode(out);
        self.input.encode(out);
        self.chain_id.encode(out);
        out.put_u8(EMPTY_STRING_CODE);
        out.put_u8(EMPTY_STRING_CODE);
        self.chain_id.encode(out);
        encode_or_empty(self.from.as_ref(), out);
        self.gas_per_pubdata.unwrap_or_default().encode(out);
        self.factory_deps.encode(out);
        match signature {
            Some(signature) => signature.as_bytes()[..SIGNATURE_SLOT_LEN].encode(out),
            None => out.put_u8(EMPTY_STRING_CODE),
        }
        encode_or_empty(self.custom_signature.as_ref(), out);
        self.paymaster_params_header().encode(out);
        encode_or_empty(self.paymaster.as_ref(), out);
        encode_or_empty(self.paymaster_input.as_ref(), out);
    }

    fn paymaster_params_header(&self) -> Header {
        let payload_length = self.paymaster.as_ref().map_or(1, |p| p.length())
            + self.paymaster_input.as_ref().map_or(1, |input| input.length());
        Header { list: true, payload_length }
    }

    /// Decodes a `0x71` tagged envelope.
    ///
    /// Returns the transaction together with the raw `r ‖ s` signature slot, which is empty
    /// for an unsigned envelope. Empty optional slots decode to `None`.
    pub fn decode_serialized(bytes: &[u8]) -> Result<(Self, Bytes), Eip712Error> {
        let (&ty, mut buf) = bytes.split_first().ok_or(alloy_rlp::Error::InputTooShort)?;
        if ty != EIP712_TX_TYPE_ID {
            return Err(Eip712Error::UnexpectedType(ty));
        }

        let header = Header::decode(&mut buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString.into());
        }
        let remaining = buf.len();
        let (tx, signature) = Self::rlp_decode_fields(&mut buf)?;
        let consumed = remaining - buf.len();
        if consumed != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed,
            }
            .into());
        }
        if !buf.is_empty() {
            return Err(alloy_rlp::Error::UnexpectedLength.into());
        }

        Ok((tx, signature))
    }

    /// Decodes the 17 fields in the order listed on [`TxEip712`].
    ///
    /// NOTE: This assumes a RLP header has already been decoded.
    fn rlp_decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<(Self, Bytes)> {
        let nonce = Decodable::decode(buf)?;
        let max_priority_fee_per_gas = Decodable::decode(buf)?;
        let max_fee_per_gas = Decodable::decode(buf)?;
        let gas_limit = Decodable::decode(buf)?;
        let to = non_empty(Bytes::decode(buf)?);
        let value = Decodable::decode(buf)?;
        let input = Decodable::decode(buf)?;
        let chain_id: ChainId = Decodable::decode(buf)?;
        Bytes::decode(buf)?;
        Bytes::decode(buf)?;
        if ChainId::decode(buf)? != chain_id {
            return Err(alloy_rlp::Error::Custom("mismatched chain id"));
        }
        let from = decode_opt_address(buf)?;
        let gas_per_pubdata = Some(U256::decode(buf)?).filter(|gas| !gas.is_zero());
        let factory_deps = Decodable::decode(buf)?;
        let signature = Bytes::decode(buf)?;
        let custom_signature = non_empty(Bytes::decode(buf)?);

        let params = Header::decode(buf)?;
        if !params.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let remaining = buf.len();
        let paymaster = decode_opt_address(buf)?;
        let paymaster_input = non_empty(Bytes::decode(buf)?);
        if remaining - buf.len() != params.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: params.payload_length,
                got: remaining - buf.len(),
            });
        }

        let tx = Self {
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
        };
        Ok((tx, signature))
    }
}

impl Typed2718 for TxEip712 {
    fn ty(&self) -> u8 {
        EIP712_TX_TYPE_ID
    }
}

fn encode_or_empty<T: Encodable>(value: Option<&T>, out: &mut dyn BufMut) {
    match value {
        Some(value) => value.encode(out),
        None => out.put_u8(EMPTY_STRING_CODE),
    }
}

fn non_empty(bytes: Bytes) -> Option<Bytes> {
    (!bytes.is_empty()).then_some(bytes)
}

fn decode_opt_address(buf: &mut &[u8]) -> alloy_rlp::Result<Option<Address>> {
    if buf.first() == Some(&EMPTY_STRING_CODE) {
        *buf = &buf[1..];
        return Ok(None);
    }
    Address::decode(buf).map(Some)
}
