use std::time::Duration;

use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use tracing::debug;

use super::{Connection, SendOptions, SolanaClient};
use crate::error::MintError;

const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);

impl Connection for SolanaClient {
    fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, MintError> {
        Ok(self.client.get_balance(pubkey).await?)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, MintError> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
        options: &SendOptions,
    ) -> Result<Signature, MintError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            preflight_commitment: Some(options.preflight_commitment),
            max_retries: Some(options.max_retries),
            ..RpcSendTransactionConfig::default()
        };

        let signature = self
            .client
            .send_transaction_with_config(transaction, config)
            .await?;
        debug!(%signature, "transaction sent, waiting for confirmation");

        // the caller bounds this loop with its own deadline
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(&signature, options.commitment)
                .await?;

            match status {
                Some(Ok(())) => return Ok(signature),
                Some(Err(err)) => return Err(MintError::from_transaction_error(err)),
                None => tokio::time::sleep(CONFIRMATION_POLL_INTERVAL).await,
            }
        }
    }
}
