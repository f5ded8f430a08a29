//! Contains the transaction type identifier for zkSync Era.

use alloy_eips::eip2718::{Eip2718Error, IsTyped2718, Typed2718};
use alloy_primitives::{U8, U64};
use alloy_rlp::{BufMut, Decodable, Encodable};
use core::str::FromStr;
use derive_more::Display;

/// Identifier for the EIP-712 (`0x71`) transaction envelope.
pub const EIP712_TX_TYPE_ID: u8 = 0x71;

/// Identifier for operator-injected priority (`0xff`) transactions.
pub const PRIORITY_TX_TYPE_ID: u8 = 0xff;

/// zkSync Era TransactionType flags as specified in EIPs 2718, 1559 and 2930, plus the EIP-712
/// envelope and the L1 priority operation kind.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, Default, PartialEq, PartialOrd, Ord, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "U8", try_from = "U64"))]
pub enum ZkSyncTxType {
    /// Legacy transaction type.
    #[default]
    #[display("legacy")]
    Legacy = 0,
    /// EIP-2930 transaction type.
    #[display("eip2930")]
    Eip2930 = 1,
    /// EIP-1559 transaction type.
    #[display("eip1559")]
    Eip1559 = 2,
    /// EIP-712 envelope carrying paymaster and factory dependency fields.
    #[display("eip712")]
    Eip712 = EIP712_TX_TYPE_ID,
    /// Priority operation submitted through L1, never user-signed.
    #[display("priority")]
    Priority = PRIORITY_TX_TYPE_ID,
}

impl ZkSyncTxType {
    /// List of all variants.
    pub const ALL: [Self; 5] =
        [Self::Legacy, Self::Eip2930, Self::Eip1559, Self::Eip712, Self::Priority];

    /// Returns `true` if the type is [`ZkSyncTxType::Eip712`].
    pub const fn is_eip712(&self) -> bool {
        matches!(self, Self::Eip712)
    }

    /// Returns `true` if the type is [`ZkSyncTxType::Priority`].
    pub const fn is_priority(&self) -> bool {
        matches!(self, Self::Priority)
    }
}

impl From<ZkSyncTxType> for U8 {
    fn from(tx_type: ZkSyncTxType) -> Self {
        Self::from(u8::from(tx_type))
    }
}

impl From<ZkSyncTxType> for u8 {
    fn from(v: ZkSyncTxType) -> Self {
        v as Self
    }
}

impl TryFrom<u8> for ZkSyncTxType {
    type Error = Eip2718Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Legacy,
            1 => Self::Eip2930,
            2 => Self::Eip1559,
            EIP712_TX_TYPE_ID => Self::Eip712,
            PRIORITY_TX_TYPE_ID => Self::Priority,
            ty => return Err(Eip2718Error::UnexpectedType(ty)),
        })
    }
}

impl TryFrom<u64> for ZkSyncTxType {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let err = || "invalid tx type";
        let value: u8 = value.try_into().map_err(|_| err())?;
        Self::try_from(value).map_err(|_| err())
    }
}

impl TryFrom<U64> for ZkSyncTxType {
    type Error = &'static str;

    fn try_from(value: U64) -> Result<Self, Self::Error> {
        value.to::<u64>().try_into()
    }
}

impl FromStr for ZkSyncTxType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "legacy" => Self::Legacy,
            "eip2930" => Self::Eip2930,
            "eip1559" => Self::Eip1559,
            "eip712" => Self::Eip712,
            "priority" => Self::Priority,
            _ => return Err("unknown tx type name"),
        })
    }
}

impl PartialEq<u8> for ZkSyncTxType {
    fn eq(&self, other: &u8) -> bool {
        (*self as u8) == *other
    }
}

impl PartialEq<ZkSyncTxType> for u8 {
    fn eq(&self, other: &ZkSyncTxType) -> bool {
        *self == (*other as Self)
    }
}

impl Encodable for ZkSyncTxType {
    fn encode(&self, out: &mut dyn BufMut) {
        (*self as u8).encode(out);
    }

    fn length(&self) -> usize {
        (*self as u8).length()
    }
}

impl Decodable for ZkSyncTxType {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let ty = u8::decode(buf)?;

        Self::try_from(ty).map_err(|_| alloy_rlp::Error::Custom("invalid transaction type"))
    }
}

impl Typed2718 for ZkSyncTxType {
    fn ty(&self) -> u8 {
        (*self).into()
    }
}

impl IsTyped2718 for ZkSyncTxType {
    fn is_type(type_id: u8) -> bool {
        // legacy | eip2930 | eip1559 | eip712 | priority
        matches!(type_id, 0 | 1 | 2 | EIP712_TX_TYPE_ID | PRIORITY_TX_TYPE_ID)
    }
}
