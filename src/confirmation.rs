use crate::chain::Client;
use ethers_core::types::{TransactionReceipt, TxHash};
use ethers_providers::{Middleware, ProviderError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Terminal state of a receipt wait.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    Mined(Box<TransactionReceipt>),
    /// The timeout elapsed before the transaction was mined.
    Pending(TxHash),
    Cancelled(TxHash),
}

/// Polls `eth_getTransactionReceipt` until the transaction is mined, the
/// timeout elapses or `cancel` fires. Rpc failures while polling are returned
/// as is; nothing is retried.
pub async fn wait_for_receipt(
    client: &Client,
    tx_hash: TxHash,
    options: &WaitOptions,
    cancel: &CancellationToken,
) -> Result<Confirmation, ProviderError> {
    let poll = async {
        loop {
            if let Some(receipt) = client.get_transaction_receipt(tx_hash).await? {
                return Ok::<_, ProviderError>(receipt);
            }
            log::debug!("transaction {:?} not mined yet", tx_hash);
            tokio::time::sleep(options.poll_interval).await;
        }
    };

    tokio::select! {
        biased;

        _ = cancel.cancelled() => Ok(Confirmation::Cancelled(tx_hash)),
        result = tokio::time::timeout(options.timeout, poll) => match result {
            Ok(receipt) => receipt.map(|receipt| Confirmation::Mined(Box::new(receipt))),
            Err(_elapsed) => Ok(Confirmation::Pending(tx_hash)),
        },
    }
}
