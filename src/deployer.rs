use crate::{
    artifact::{self, Artifact},
    chain::{self, Client},
    confirmation::{self, Confirmation, WaitOptions},
    settings::{DeploySettings, TokenSettings},
};
use ethers_core::{
    abi::Token,
    types::{
        transaction::eip2718::TypedTransaction, Address, Bytes, Signature, TransactionReceipt,
        TransactionRequest, TxHash, U256,
    },
};
use ethers_providers::{Middleware, ProviderError};
use ethers_signers::{LocalWallet, Signer, WalletError};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid private key: {0}")]
    Signing(#[from] WalletError),
    #[error(transparent)]
    Artifact(#[from] artifact::Error),
    #[error("artifact abi has no constructor")]
    MissingConstructor,
    #[error("couldn't encode constructor arguments: {0}")]
    Encode(#[from] ethers_core::abi::Error),
    #[error("chain endpoint request failed: {0}")]
    Connectivity(#[source] ProviderError),
    #[error("node rejected the transaction: {0}")]
    Submission(String),
    #[error("transaction {tx_hash:?} is still pending after {timeout:?}")]
    Pending { tx_hash: TxHash, timeout: Duration },
    #[error("waiting for transaction {0:?} was cancelled")]
    Cancelled(TxHash),
    #[error("chain id {0} does not fit into 64 bits")]
    InvalidChainId(U256),
    #[error("deployment transaction {0:?} reverted")]
    Reverted(TxHash),
    #[error("receipt of {0:?} has no contract address")]
    MissingContractAddress(TxHash),
}

/// Arguments of the token constructor `(name, symbol, initialSupply)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorArgs {
    pub name: String,
    pub symbol: String,
    /// Supply in the token's smallest unit.
    pub initial_supply: U256,
}

impl From<&TokenSettings> for ConstructorArgs {
    fn from(token: &TokenSettings) -> Self {
        Self {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            initial_supply: token.supply_in_base_units(),
        }
    }
}

impl ConstructorArgs {
    fn tokens(&self) -> Vec<Token> {
        vec![
            Token::String(self.name.clone()),
            Token::String(self.symbol.clone()),
            Token::Uint(self.initial_supply),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub from: Address,
    pub tx_hash: TxHash,
}

/// Address of the account controlled by `private_key`.
pub fn signer_address(private_key: &str) -> Result<Address, Error> {
    let wallet: LocalWallet = private_key.trim().parse()?;
    Ok(wallet.address())
}

/// Creation bytecode followed by the abi-encoded constructor arguments.
pub fn deploy_data(artifact: &Artifact, args: &ConstructorArgs) -> Result<Bytes, Error> {
    let abi = artifact.abi()?;
    let constructor = abi.constructor().ok_or(Error::MissingConstructor)?;
    let code = artifact.bytecode_bytes()?;
    let data = constructor.encode_input(code.to_vec(), &args.tokens())?;
    Ok(data.into())
}

/// Legacy contract creation transaction: no `to`, fixed gas limit.
pub fn build_transaction(
    from: Address,
    nonce: U256,
    gas_price: U256,
    gas_limit: u64,
    chain_id: u64,
    data: Bytes,
) -> TypedTransaction {
    TransactionRequest::new()
        .from(from)
        .nonce(nonce)
        .gas(gas_limit)
        .gas_price(gas_price)
        .chain_id(chain_id)
        .data(data)
        .into()
}

/// Signs `tx` with a wallet that only lives for the duration of this call.
pub fn sign(private_key: &str, tx: &TypedTransaction) -> Result<Signature, Error> {
    let wallet: LocalWallet = private_key.trim().parse()?;
    Ok(wallet.sign_transaction_sync(tx)?)
}

pub fn sign_raw(private_key: &str, tx: &TypedTransaction) -> Result<Bytes, Error> {
    let signature = sign(private_key, tx)?;
    Ok(tx.rlp_signed(&signature))
}

pub struct Deployer<'a> {
    client: &'a Client,
    settings: &'a DeploySettings,
    chain_id: Option<u64>,
}

impl<'a> Deployer<'a> {
    pub fn new(client: &'a Client, settings: &'a DeploySettings, chain_id: Option<u64>) -> Self {
        Self {
            client,
            settings,
            chain_id,
        }
    }

    async fn chain_id(&self) -> Result<u64, Error> {
        match self.chain_id {
            Some(chain_id) => Ok(chain_id),
            None => {
                let chain_id = self
                    .client
                    .get_chainid()
                    .await
                    .map_err(Error::Connectivity)?;
                u64::try_from(chain_id).map_err(|_| Error::InvalidChainId(chain_id))
            }
        }
    }

    /// Builds, signs and sends the constructor transaction.
    pub async fn submit(
        &self,
        private_key: &str,
        artifact: &Artifact,
        args: &ConstructorArgs,
    ) -> Result<Submitted, Error> {
        let from = signer_address(private_key)?;
        let data = deploy_data(artifact, args)?;

        let chain_id = self.chain_id().await?;
        let nonce = self
            .client
            .get_transaction_count(from, None)
            .await
            .map_err(Error::Connectivity)?;
        let gas_price = self
            .client
            .get_gas_price()
            .await
            .map_err(Error::Connectivity)?;

        let tx = build_transaction(
            from,
            nonce,
            gas_price,
            self.settings.gas_limit,
            chain_id,
            data,
        );
        let raw = sign_raw(private_key, &tx)?;

        log::info!(
            "sending deployment from {:?} (nonce {}, gas price {})",
            from,
            nonce,
            gas_price
        );
        let pending = self
            .client
            .send_raw_transaction(raw)
            .await
            .map_err(|err| match chain::node_error_message(&err) {
                Some(message) => Error::Submission(message),
                None => Error::Connectivity(err),
            })?;

        Ok(Submitted {
            from,
            tx_hash: *pending,
        })
    }

    /// Waits for the receipt and returns the created contract address.
    pub async fn confirm(
        &self,
        tx_hash: TxHash,
        cancel: &CancellationToken,
    ) -> Result<(Address, TransactionReceipt), Error> {
        let options = WaitOptions {
            timeout: self.settings.confirmation_timeout(),
            poll_interval: self.settings.poll_interval(),
        };
        let receipt =
            match confirmation::wait_for_receipt(self.client, tx_hash, &options, cancel)
                .await
                .map_err(Error::Connectivity)?
            {
                Confirmation::Mined(receipt) => *receipt,
                Confirmation::Pending(tx_hash) => {
                    return Err(Error::Pending {
                        tx_hash,
                        timeout: options.timeout,
                    })
                }
                Confirmation::Cancelled(tx_hash) => return Err(Error::Cancelled(tx_hash)),
            };

        if receipt.status.map(|status| status.is_zero()).unwrap_or(false) {
            return Err(Error::Reverted(tx_hash));
        }
        let contract_address = receipt
            .contract_address
            .ok_or(Error::MissingContractAddress(tx_hash))?;
        Ok((contract_address, receipt))
    }
}
