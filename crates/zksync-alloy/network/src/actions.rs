//! Prepare, sign and send actions for zkSync Era transaction requests.
//!
//! The actions are generic over a [`ZkSyncClient`], which supplies the node calls and the
//! standard Ethereum code paths. Requests carrying zkSync-specific fields are handled here;
//! everything else is handed back to the client unchanged.

use crate::{TransactionSerializeError, ZkSyncChain, serialize_transaction};
use alloy_eips::{BlockNumberOrTag, eip1559::Eip1559Estimation};
use alloy_primitives::{Address, B256, Bytes, ChainId, Signature};
use async_trait::async_trait;
use core::fmt::Display;
use tracing::{debug, trace};
use zksync_alloy_consensus::ZkSyncTxType;
use zksync_alloy_rpc_types::ZkSyncTransactionRequest;

/// How an account signs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccountKind {
    /// Signing is delegated to the node.
    #[default]
    JsonRpc,
    /// Signing happens in-process.
    Local,
}

/// An account used to fill and sign requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    /// Account address.
    pub address: Address,
    /// How the account signs.
    pub kind: AccountKind,
}

impl Account {
    /// A node-managed account.
    pub const fn json_rpc(address: Address) -> Self {
        Self { address, kind: AccountKind::JsonRpc }
    }

    /// An in-process account.
    pub const fn local(address: Address) -> Self {
        Self { address, kind: AccountKind::Local }
    }

    /// The same address, reduced to its node-managed form.
    pub const fn as_json_rpc(&self) -> Self {
        Self::json_rpc(self.address)
    }
}

/// A request field that [`prepare_transaction_request`] may fill in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrepareParameter {
    /// Fee fields.
    Fees,
    /// Gas limit.
    Gas,
    /// Account nonce.
    Nonce,
    /// Transaction type.
    Type,
    /// Custom account signature.
    CustomSignature,
    /// Paymaster address.
    Paymaster,
    /// Paymaster input.
    PaymasterInput,
    /// Gas per pubdata byte.
    GasPerPubdata,
    /// Factory dependencies.
    FactoryDeps,
}

impl PrepareParameter {
    /// Every parameter.
    pub const ALL: [Self; 9] = [
        Self::Fees,
        Self::Gas,
        Self::Nonce,
        Self::Type,
        Self::CustomSignature,
        Self::Paymaster,
        Self::PaymasterInput,
        Self::GasPerPubdata,
        Self::FactoryDeps,
    ];
}

/// Arguments of [`prepare_transaction_request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrepareTransactionRequestArgs {
    /// The request to prepare.
    pub request: ZkSyncTransactionRequest,
    /// Overrides the client's account.
    pub account: Option<Account>,
    /// Overrides the client's chain.
    pub chain: Option<ZkSyncChain>,
    /// Fields to fill in.
    pub parameters: Vec<PrepareParameter>,
}

impl PrepareTransactionRequestArgs {
    /// Prepares `request`, filling in every parameter.
    pub fn new(request: ZkSyncTransactionRequest) -> Self {
        Self { request, account: None, chain: None, parameters: PrepareParameter::ALL.to_vec() }
    }

    /// Sets the account.
    pub const fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    /// Sets the chain.
    pub fn with_chain(mut self, chain: ZkSyncChain) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Restricts the parameters to fill in.
    pub fn with_parameters(
        mut self,
        parameters: impl IntoIterator<Item = PrepareParameter>,
    ) -> Self {
        self.parameters = parameters.into_iter().collect();
        self
    }

    fn wants(&self, parameter: PrepareParameter) -> bool {
        self.parameters.contains(&parameter)
    }
}

/// The node calls the actions are built on.
#[async_trait]
pub trait ZkSyncClient: Send + Sync {
    /// The error type returned by the client.
    type Error: Display + Send;

    /// The account bound to the client, if any.
    fn account(&self) -> Option<Account> {
        None
    }

    /// Chain id of the connected node.
    async fn chain_id(&self) -> Result<ChainId, Self::Error>;

    /// Transaction count of `address` at `block`.
    async fn transaction_count(
        &self,
        address: Address,
        block: BlockNumberOrTag,
    ) -> Result<u64, Self::Error>;

    /// Current EIP-1559 fee estimate.
    async fn estimate_fees_per_gas(&self) -> Result<Eip1559Estimation, Self::Error>;

    /// Estimates the gas limit of `request` sent by `account`.
    async fn estimate_gas(
        &self,
        request: &ZkSyncTransactionRequest,
        account: Option<&Account>,
    ) -> Result<u64, Self::Error>;

    /// Prepares a request on the standard Ethereum path.
    async fn prepare_transaction_request(
        &self,
        args: PrepareTransactionRequestArgs,
    ) -> Result<ZkSyncTransactionRequest, Self::Error>;

    /// Signs the signing payload of `request` with `account`.
    async fn sign_transaction(
        &self,
        request: &ZkSyncTransactionRequest,
        account: Option<&Account>,
    ) -> Result<Signature, Self::Error>;

    /// Broadcasts a raw transaction, returning its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, Self::Error>;
}

/// Fills in a request before signing.
///
/// The chain id and, when requested, the pending nonce of the account are resolved first.
/// A request carrying zkSync fields gets missing fee fields from
/// [`ZkSyncClient::estimate_fees_per_gas`] when [`PrepareParameter::Fees`] is requested, so
/// that it classifies as EIP-712. An EIP-712 request then gets `type = eip712` and, if absent,
/// a gas limit estimated on behalf of the node-managed form of the account. Any other request
/// is passed to [`ZkSyncClient::prepare_transaction_request`] untouched.
pub async fn prepare_transaction_request<C: ZkSyncClient + ?Sized>(
    client: &C,
    args: PrepareTransactionRequestArgs,
) -> Result<ZkSyncTransactionRequest, C::Error> {
    let account = args.account.or_else(|| client.account());
    let mut request = args.request.clone();

    let chain_id = match &args.chain {
        Some(chain) => chain.id,
        None => client.chain_id().await?,
    };
    request.inner.chain_id = Some(chain_id);

    if let Some(account) = &account {
        request.inner.from = Some(account.address);
        if args.wants(PrepareParameter::Nonce) && request.inner.nonce.is_none() {
            let nonce =
                client.transaction_count(account.address, BlockNumberOrTag::Pending).await?;
            trace!(target: "zksync::actions", nonce, "Fetched pending nonce");
            request.inner.nonce = Some(nonce);
        }
    }

    let markers = request.envelope_markers();
    if args.wants(PrepareParameter::Fees)
        && markers.has_custom_fields()
        && !(markers.max_fee_per_gas && markers.max_priority_fee_per_gas)
    {
        let fees = client.estimate_fees_per_gas().await?;
        trace!(
            target: "zksync::actions",
            max_fee_per_gas = fees.max_fee_per_gas,
            max_priority_fee_per_gas = fees.max_priority_fee_per_gas,
            "Estimated fees"
        );
        let inner = &mut request.inner;
        inner.max_fee_per_gas = inner.max_fee_per_gas.or(Some(fees.max_fee_per_gas));
        inner.max_priority_fee_per_gas =
            inner.max_priority_fee_per_gas.or(Some(fees.max_priority_fee_per_gas));
    }

    if !request.is_eip712() {
        debug!(target: "zksync::actions", chain_id, "Delegating standard transaction request");
        return client.prepare_transaction_request(args).await;
    }

    request = request.transaction_type(ZkSyncTxType::Eip712);

    if request.inner.gas.is_none() {
        let estimator = account.as_ref().map(Account::as_json_rpc);
        let gas = client.estimate_gas(&request, estimator.as_ref()).await?;
        trace!(target: "zksync::actions", gas, "Estimated gas");
        request.inner.gas = Some(gas);
    }

    debug!(target: "zksync::actions", chain_id, "Prepared EIP-712 transaction request");
    Ok(request)
}

/// Prepares and signs a request, returning the raw signed transaction.
pub async fn sign_transaction<C>(
    client: &C,
    args: PrepareTransactionRequestArgs,
) -> Result<Bytes, C::Error>
where
    C: ZkSyncClient + ?Sized,
    C::Error: From<TransactionSerializeError>,
{
    let account = args.account.or_else(|| client.account());
    let request = prepare_transaction_request(client, args).await?;
    let signature = client.sign_transaction(&request, account.as_ref()).await?;
    Ok(serialize_transaction(&request, Some(&signature))?)
}

/// Prepares, signs and broadcasts a request, returning the transaction hash.
pub async fn send_transaction<C>(
    client: &C,
    args: PrepareTransactionRequestArgs,
) -> Result<B256, C::Error>
where
    C: ZkSyncClient + ?Sized,
    C::Error: From<TransactionSerializeError>,
{
    let raw = sign_transaction(client, args).await?;
    let hash = client.send_raw_transaction(raw).await?;
    debug!(target: "zksync::actions", %hash, "Sent transaction");
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{U256, address, bytes};
    use std::sync::Mutex;

    const SENDER: Address = address!("f760bdd822fccf93c44be68d94c45133002b3037");

    #[derive(Debug, PartialEq, thiserror::Error)]
    enum MockError {
        #[error("node unavailable")]
        Unavailable,
        #[error(transparent)]
        Serialize(#[from] TransactionSerializeError),
    }

    #[derive(Debug, Default)]
    struct Calls {
        chain_id: usize,
        transaction_count: Vec<(Address, BlockNumberOrTag)>,
        estimate_fees: usize,
        estimate_gas: Vec<(ZkSyncTransactionRequest, Option<Account>)>,
        delegated: Vec<PrepareTransactionRequestArgs>,
        sent: Vec<Bytes>,
    }

    #[derive(Debug, Default)]
    struct MockClient {
        account: Option<Account>,
        offline: bool,
        calls: Mutex<Calls>,
    }

    impl MockClient {
        fn with_account(account: Account) -> Self {
            Self { account: Some(account), ..Default::default() }
        }
    }

    #[async_trait]
    impl ZkSyncClient for MockClient {
        type Error = MockError;

        fn account(&self) -> Option<Account> {
            self.account
        }

        async fn chain_id(&self) -> Result<ChainId, MockError> {
            self.calls.lock().unwrap().chain_id += 1;
            if self.offline {
                return Err(MockError::Unavailable);
            }
            Ok(270)
        }

        async fn transaction_count(
            &self,
            address: Address,
            block: BlockNumberOrTag,
        ) -> Result<u64, MockError> {
            self.calls.lock().unwrap().transaction_count.push((address, block));
            Ok(7)
        }

        async fn estimate_fees_per_gas(&self) -> Result<Eip1559Estimation, MockError> {
            self.calls.lock().unwrap().estimate_fees += 1;
            Ok(Eip1559Estimation { max_fee_per_gas: 250_000_000, max_priority_fee_per_gas: 0 })
        }

        async fn estimate_gas(
            &self,
            request: &ZkSyncTransactionRequest,
            account: Option<&Account>,
        ) -> Result<u64, MockError> {
            self.calls.lock().unwrap().estimate_gas.push((request.clone(), account.copied()));
            Ok(158_774)
        }

        async fn prepare_transaction_request(
            &self,
            args: PrepareTransactionRequestArgs,
        ) -> Result<ZkSyncTransactionRequest, MockError> {
            let request = args.request.clone().nonce(1).gas_limit(21_000).chain_id(270);
            self.calls.lock().unwrap().delegated.push(args);
            Ok(request)
        }

        async fn sign_transaction(
            &self,
            _request: &ZkSyncTransactionRequest,
            _account: Option<&Account>,
        ) -> Result<Signature, MockError> {
            Ok(Signature::new(U256::from(1), U256::from(2), false))
        }

        async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, MockError> {
            self.calls.lock().unwrap().sent.push(raw);
            Ok(B256::repeat_byte(0x11))
        }
    }

    fn paymaster_request() -> ZkSyncTransactionRequest {
        ZkSyncTransactionRequest::default()
            .to(address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"))
            .max_fee_per_gas(250_000_000)
            .max_priority_fee_per_gas(0)
            .gas_per_pubdata(U256::from(50_000))
            .paymaster(
                address!("094499df5ee555ffc33af07862e43c90e6fee501"),
                bytes!("8c5a344500000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000000"),
            )
    }

    fn plain_request() -> ZkSyncTransactionRequest {
        ZkSyncTransactionRequest::default()
            .to(address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"))
            .value(U256::from(1))
            .max_fee_per_gas(2_000_000_000)
            .max_priority_fee_per_gas(2_000_000_000)
    }

    #[tokio::test]
    async fn prepares_paymaster_request() {
        let client = MockClient::with_account(Account::local(SENDER));
        let args = PrepareTransactionRequestArgs::new(paymaster_request());
        let prepared = prepare_transaction_request(&client, args).await.unwrap();

        assert_eq!(prepared.tx_type(), Some(ZkSyncTxType::Eip712));
        assert_eq!(prepared.inner.chain_id, Some(270));
        assert_eq!(prepared.inner.from, Some(SENDER));
        assert_eq!(prepared.inner.nonce, Some(7));
        assert_eq!(prepared.inner.gas, Some(158_774));

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.chain_id, 1);
        assert_eq!(calls.transaction_count, vec![(SENDER, BlockNumberOrTag::Pending)]);
        assert_eq!(calls.estimate_gas.len(), 1);
        assert_eq!(calls.estimate_gas[0].1, Some(Account::json_rpc(SENDER)));
        assert_eq!(calls.estimate_gas[0].0.tx_type(), Some(ZkSyncTxType::Eip712));
        assert_eq!(calls.estimate_fees, 0);
        assert!(calls.delegated.is_empty());
    }

    #[tokio::test]
    async fn paymaster_request_without_fees_or_type_becomes_eip712() {
        let client = MockClient::with_account(Account::local(SENDER));
        let request = ZkSyncTransactionRequest::default()
            .to(address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"))
            .gas_per_pubdata(U256::from(50_000))
            .paymaster(
                address!("094499df5ee555ffc33af07862e43c90e6fee501"),
                bytes!("8c5a344500000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000000"),
            );
        assert!(!request.is_eip712());

        let args = PrepareTransactionRequestArgs::new(request);
        let prepared = prepare_transaction_request(&client, args).await.unwrap();

        assert_eq!(prepared.tx_type(), Some(ZkSyncTxType::Eip712));
        assert_eq!(prepared.inner.max_fee_per_gas, Some(250_000_000));
        assert_eq!(prepared.inner.max_priority_fee_per_gas, Some(0));
        assert_eq!(prepared.inner.gas, Some(158_774));
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.estimate_fees, 1);
        assert_eq!(calls.estimate_gas.len(), 1);
        assert!(calls.delegated.is_empty());
    }

    #[tokio::test]
    async fn custom_request_without_fees_is_delegated_when_fees_not_requested() {
        let client = MockClient::default();
        let request = ZkSyncTransactionRequest::default()
            .to(address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"))
            .gas_per_pubdata(U256::from(50_000));
        let args = PrepareTransactionRequestArgs::new(request)
            .with_parameters([PrepareParameter::Gas, PrepareParameter::Nonce]);
        prepare_transaction_request(&client, args.clone()).await.unwrap();

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.estimate_fees, 0);
        assert_eq!(calls.delegated, vec![args]);
    }

    #[tokio::test]
    async fn keeps_caller_gas_and_nonce() {
        let client = MockClient::with_account(Account::local(SENDER));
        let request = paymaster_request().gas_limit(1_000_000).nonce(3);
        let prepared =
            prepare_transaction_request(&client, PrepareTransactionRequestArgs::new(request))
                .await
                .unwrap();

        assert_eq!(prepared.inner.gas, Some(1_000_000));
        assert_eq!(prepared.inner.nonce, Some(3));
        let calls = client.calls.lock().unwrap();
        assert!(calls.estimate_gas.is_empty());
        assert!(calls.transaction_count.is_empty());
    }

    #[tokio::test]
    async fn chain_override_skips_chain_id_call() {
        let client = MockClient::default();
        let args = PrepareTransactionRequestArgs::new(paymaster_request())
            .with_chain(ZkSyncChain::mainnet())
            .with_parameters([PrepareParameter::Gas]);
        let prepared = prepare_transaction_request(&client, args).await.unwrap();

        assert_eq!(prepared.inner.chain_id, Some(324));
        assert_eq!(prepared.inner.from, None);
        assert_eq!(prepared.inner.nonce, None);
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.chain_id, 0);
        assert_eq!(calls.estimate_gas[0].1, None);
    }

    #[tokio::test]
    async fn nonce_not_fetched_unless_requested() {
        let client = MockClient::with_account(Account::json_rpc(SENDER));
        let args = PrepareTransactionRequestArgs::new(paymaster_request())
            .with_parameters([PrepareParameter::Gas, PrepareParameter::Fees]);
        let prepared = prepare_transaction_request(&client, args).await.unwrap();

        assert_eq!(prepared.inner.nonce, None);
        assert!(client.calls.lock().unwrap().transaction_count.is_empty());
    }

    #[tokio::test]
    async fn delegates_standard_request() {
        let client = MockClient::with_account(Account::local(SENDER));
        let args = PrepareTransactionRequestArgs::new(plain_request());
        let prepared = prepare_transaction_request(&client, args.clone()).await.unwrap();

        assert_eq!(prepared.inner.gas, Some(21_000));
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.delegated, vec![args]);
        assert_eq!(calls.chain_id, 1);
        assert_eq!(calls.transaction_count, vec![(SENDER, BlockNumberOrTag::Pending)]);
        assert_eq!(calls.estimate_fees, 0);
        assert!(calls.estimate_gas.is_empty());
    }

    #[tokio::test]
    async fn chain_id_failure_is_propagated_for_standard_request() {
        let client = MockClient { offline: true, ..Default::default() };
        let args = PrepareTransactionRequestArgs::new(plain_request());

        assert_eq!(prepare_transaction_request(&client, args).await, Err(MockError::Unavailable));
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.chain_id, 1);
        assert!(calls.delegated.is_empty());
    }

    #[tokio::test]
    async fn sends_eip712_transaction() {
        let client = MockClient::with_account(Account::local(SENDER));
        let args = PrepareTransactionRequestArgs::new(paymaster_request());
        let hash = send_transaction(&client, args).await.unwrap();

        assert_eq!(hash, B256::repeat_byte(0x11));
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.sent.len(), 1);
        assert_eq!(calls.sent[0][0], 0x71);
    }

    #[tokio::test]
    async fn sends_standard_transaction() {
        let client = MockClient::with_account(Account::local(SENDER));
        send_transaction(&client, PrepareTransactionRequestArgs::new(plain_request()))
            .await
            .unwrap();

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.sent[0][0], 0x02);
    }

    #[tokio::test]
    async fn signed_eip712_carries_signature_slot() {
        let client = MockClient::with_account(Account::local(SENDER));
        let args = PrepareTransactionRequestArgs::new(paymaster_request());
        let raw = sign_transaction(&client, args).await.unwrap();

        let (tx, signature) = zksync_alloy_consensus::TxEip712::decode_serialized(&raw).unwrap();
        assert_eq!(signature.len(), 64);
        assert_eq!(signature[31], 1);
        assert_eq!(signature[63], 2);
        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.from, Some(SENDER));
    }

    #[tokio::test]
    async fn serialize_failure_is_reported() {
        let client = MockClient::default();
        let mut request = paymaster_request().gas_limit(1);
        request.paymaster_input = None;
        let args = PrepareTransactionRequestArgs::new(request).with_chain(ZkSyncChain::localnet());

        assert_eq!(
            sign_transaction(&client, args).await,
            Err(MockError::Serialize(TransactionSerializeError::Eip712(
                zksync_alloy_consensus::Eip712Error::PaymasterConfiguration("paymasterInput")
            )))
        );
    }
}
