use std::future::Future;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use tracing::debug;

use crate::error::MintError;

pub mod program;
pub mod query;
pub mod transaction;

/// Network boundary used by the mint flow. `SolanaClient` talks to a real RPC
/// node; tests substitute their own implementation.
pub trait Connection {
    fn rpc_url(&self) -> &str;

    fn get_balance(&self, pubkey: &Pubkey) -> impl Future<Output = Result<u64, MintError>>;

    fn get_latest_blockhash(&self) -> impl Future<Output = Result<Hash, MintError>>;

    fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
        options: &SendOptions,
    ) -> impl Future<Output = Result<Signature, MintError>>;
}

#[derive(Debug, Clone)]
pub struct SendOptions {
    pub commitment: CommitmentConfig,
    pub skip_preflight: bool,
    pub preflight_commitment: CommitmentLevel,
    /// Resend attempts performed by the RPC node, not by this client.
    pub max_retries: usize,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            skip_preflight: false,
            preflight_commitment: CommitmentLevel::Confirmed,
            max_retries: 3,
        }
    }
}

pub struct SolanaClient {
    pub client: RpcClient,
    pub rpc_url: String,
    pub ws_url: Option<String>,
}

impl SolanaClient {
    pub fn new(rpc_url: String, ws_url: Option<String>, commitment: CommitmentConfig) -> Self {
        debug!(%rpc_url, ?ws_url, commitment = ?commitment.commitment, "opening rpc connection");
        Self {
            client: RpcClient::new_with_commitment(rpc_url.clone(), commitment),
            rpc_url,
            ws_url,
        }
    }
}
