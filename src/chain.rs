use ethers_core::types::{Address, U256};
use ethers_providers::{Http, Middleware, Provider, ProviderError, RpcError};
use thiserror::Error;
use url::Url;

/// JSON-RPC client for the chain endpoint.
pub type Client = Provider<Http>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("couldn't connect to {url}: {source}")]
    Connectivity { url: Url, source: ProviderError },
    #[error("rpc request failed: {0}")]
    Rpc(#[from] ProviderError),
}

pub fn connect(rpc_url: &Url) -> Client {
    Provider::new(Http::new(rpc_url.clone()))
}

/// Message of a JSON-RPC error object, when the node answered with one.
pub fn node_error_message(err: &ProviderError) -> Option<String> {
    err.as_error_response().map(|response| response.message.clone())
}

/// Probes the endpoint with `web3_clientVersion` and returns the node version.
pub async fn check_connection(client: &Client, rpc_url: &Url) -> Result<String, Error> {
    client
        .client_version()
        .await
        .map_err(|source| Error::Connectivity {
            url: rpc_url.clone(),
            source,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    pub chain_id: U256,
    pub address: Address,
    pub balance: U256,
}

impl BalanceReport {
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero()
    }
}

pub async fn check_balance(
    client: &Client,
    rpc_url: &Url,
    address: Address,
) -> Result<BalanceReport, Error> {
    let version = check_connection(client, rpc_url).await?;
    log::debug!("connected to {} ({})", rpc_url, version);

    let chain_id = client.get_chainid().await?;
    let balance = client.get_balance(address, None).await?;
    let report = BalanceReport {
        chain_id,
        address,
        balance,
    };
    if report.is_empty() {
        log::warn!("account {:?} has no funds for deployment", address);
    }
    Ok(report)
}
