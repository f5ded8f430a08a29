//! zkSync Era chain definitions.

use alloy_chains::Chain;
use alloy_primitives::{Address, ChainId, address};
use serde::{Deserialize, Serialize};

/// Multicall3 deployment shared by the zkSync Era networks.
pub const ZKSYNC_MULTICALL3: Address = address!("F9cda624FBC7e059355ce98a31693d299FACd963");

/// Native currency of a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Display name.
    pub name: String,
    /// Ticker.
    pub symbol: String,
    /// Decimals of the smallest unit.
    pub decimals: u8,
}

impl NativeCurrency {
    /// Ether, with 18 decimals.
    pub fn ether() -> Self {
        Self { name: "Ether".into(), symbol: "ETH".into(), decimals: 18 }
    }
}

/// HTTP and WebSocket endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcEndpoints {
    /// HTTP endpoints.
    pub http: Vec<String>,
    /// WebSocket endpoints.
    #[serde(default)]
    pub web_socket: Vec<String>,
}

impl RpcEndpoints {
    fn single(http: &str, web_socket: &str) -> Self {
        Self { http: vec![http.into()], web_socket: vec![web_socket.into()] }
    }
}

/// Endpoint sets of a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcUrls {
    /// Endpoints used unless overridden.
    pub default: RpcEndpoints,
    /// Publicly reachable endpoints.
    #[serde(default)]
    pub public: RpcEndpoints,
}

/// A block explorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExplorer {
    /// Display name.
    pub name: String,
    /// Base url.
    pub url: String,
}

/// A contract deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDeployment {
    /// Deployed address.
    pub address: Address,
    /// Block the contract was created in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_created: Option<u64>,
}

/// Well-known contracts of a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContracts {
    /// Multicall3 deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicall3: Option<ContractDeployment>,
}

/// Metadata of a zkSync Era network.
///
/// Definitions can be loaded from JSON with [`ZkSyncChain::from_json`]; the built-in networks
/// are [`ZkSyncChain::mainnet`], [`ZkSyncChain::testnet`] and [`ZkSyncChain::localnet`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkSyncChain {
    /// Chain id.
    pub id: ChainId,
    /// Display name.
    pub name: String,
    /// Network slug.
    pub network: String,
    /// Native currency.
    pub native_currency: NativeCurrency,
    /// RPC endpoints.
    pub rpc_urls: RpcUrls,
    /// Default block explorer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorer: Option<BlockExplorer>,
    /// Well-known contracts.
    #[serde(default)]
    pub contracts: ChainContracts,
    /// Whether the chain is a test network.
    #[serde(default)]
    pub testnet: bool,
}

impl ZkSyncChain {
    /// zkSync Era mainnet.
    pub fn mainnet() -> Self {
        let endpoints =
            RpcEndpoints::single("https://mainnet.era.zksync.io", "wss://mainnet.era.zksync.io/ws");
        Self {
            id: 324,
            name: "zkSync Era".into(),
            network: "zksync-era".into(),
            native_currency: NativeCurrency::ether(),
            rpc_urls: RpcUrls { default: endpoints.clone(), public: endpoints },
            block_explorer: Some(BlockExplorer {
                name: "zkExplorer".into(),
                url: "https://explorer.zksync.io".into(),
            }),
            contracts: ChainContracts {
                multicall3: Some(ContractDeployment {
                    address: ZKSYNC_MULTICALL3,
                    block_created: None,
                }),
            },
            testnet: false,
        }
    }

    /// zkSync Era testnet.
    pub fn testnet() -> Self {
        let endpoints =
            RpcEndpoints::single("https://testnet.era.zksync.dev", "wss://testnet.era.zksync.dev/ws");
        Self {
            id: 280,
            name: "zkSync Era Testnet".into(),
            network: "zksync-era-testnet".into(),
            native_currency: NativeCurrency::ether(),
            rpc_urls: RpcUrls { default: endpoints.clone(), public: endpoints },
            block_explorer: Some(BlockExplorer {
                name: "zkExplorer".into(),
                url: "https://goerli.explorer.zksync.io".into(),
            }),
            contracts: ChainContracts {
                multicall3: Some(ContractDeployment {
                    address: ZKSYNC_MULTICALL3,
                    block_created: None,
                }),
            },
            testnet: true,
        }
    }

    /// A zkSync Era node running locally.
    pub fn localnet() -> Self {
        let endpoints = RpcEndpoints::single("http://127.0.0.1:3050", "ws://127.0.0.1:3051/ws");
        Self {
            id: 270,
            name: "zkSync Era Localnet".into(),
            network: "zksync-era-localnet".into(),
            native_currency: NativeCurrency::ether(),
            rpc_urls: RpcUrls { default: endpoints.clone(), public: endpoints },
            block_explorer: None,
            contracts: ChainContracts {
                multicall3: Some(ContractDeployment {
                    address: ZKSYNC_MULTICALL3,
                    block_created: None,
                }),
            },
            testnet: true,
        }
    }

    /// Parses a chain definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the chain as an [`alloy_chains::Chain`].
    pub fn alloy_chain(&self) -> Chain {
        Chain::from_id(self.id)
    }

    /// The first default HTTP endpoint, if any.
    pub fn default_http_url(&self) -> Option<&str> {
        self.rpc_urls.default.http.first().map(String::as_str)
    }
}
