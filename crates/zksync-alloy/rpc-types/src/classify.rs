//! Decides whether a transaction-like value uses the EIP-712 envelope.

/// Which of the classification fields a value carries.
///
/// Classification only looks at field presence, never at a declared transaction type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnvelopeMarkers {
    /// `maxFeePerGas` is set.
    pub max_fee_per_gas: bool,
    /// `maxPriorityFeePerGas` is set.
    pub max_priority_fee_per_gas: bool,
    /// `paymaster` is set.
    pub paymaster: bool,
    /// `paymasterInput` is set.
    pub paymaster_input: bool,
    /// `gasPerPubdata` is set.
    pub gas_per_pubdata: bool,
    /// `factoryDeps` is set.
    pub factory_deps: bool,
}

impl EnvelopeMarkers {
    /// Returns `true` if the value must be encoded with the EIP-712 envelope.
    ///
    /// Both fee fields are required, plus one of: the full paymaster pair, `gasPerPubdata`, or
    /// `factoryDeps`. A plain EIP-1559 shape that only adds `gasPerPubdata` qualifies.
    pub const fn is_eip712(&self) -> bool {
        self.max_fee_per_gas
            && self.max_priority_fee_per_gas
            && ((self.paymaster && self.paymaster_input)
                || self.gas_per_pubdata
                || self.factory_deps)
    }

    /// Returns `true` if any EIP-712 specific field is set, regardless of the fee fields.
    pub const fn has_custom_fields(&self) -> bool {
        self.paymaster || self.paymaster_input || self.gas_per_pubdata || self.factory_deps
    }
}
