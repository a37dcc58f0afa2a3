use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::MintError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub uri: String,
    #[serde(default = "default_royalty_basis_points")]
    pub royalty_basis_points: u16,
}

fn default_royalty_basis_points() -> u16 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    pub rpc_url: String,
    pub ws_url: Option<String>,
    pub commitment: String,
    pub program_id: String,
    /// Register the core plugin at `program_id` rather than the canonical address.
    pub use_custom_program: bool,
    pub keypair_path: String,
    pub explorer_url: String,
    pub network_name: String,
    pub native_symbol: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub low_balance_lamports: u64,
    pub asset: AssetMetadata,
    pub collection: AssetMetadata,
}

impl MintConfig {
    fn config_path(path: Option<PathBuf>) -> PathBuf {
        if let Some(path) = path {
            path
        } else {
            Self::default_path()
        }
    }

    pub fn load_or_create(path: Option<PathBuf>) -> Result<Self> {
        let path = Self::config_path(path);
        if path.exists() {
            let config_content = fs::read_to_string(&path)
                .context(format!("Failed to read config file at {:?}", path))?;
            serde_yaml::from_str(&config_content)
                .with_context(|| format!("Failed to parse config file at {:?}", path))
        } else {
            let default_config = Self::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory at {:?}", parent)
                })?;
            }
            let config_content = serde_yaml::to_string(&default_config)
                .context("Failed to serialize default configuration")?;
            fs::write(&path, config_content)
                .with_context(|| format!("Failed to write default config file at {:?}", path))?;
            Ok(default_config)
        }
    }

    fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("gorb-mint/config.yml")
    }

    pub fn program_pubkey(&self) -> Result<Pubkey, MintError> {
        Pubkey::from_str(&self.program_id).map_err(|err| {
            MintError::Config(format!("invalid program id '{}': {}", self.program_id, err))
        })
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig, MintError> {
        CommitmentConfig::from_str(&self.commitment).map_err(|_| {
            MintError::Config(format!("unknown commitment level '{}'", self.commitment))
        })
    }

    pub fn submit_timeout(&self) -> Result<Duration, MintError> {
        if self.timeout_secs == 0 {
            return Err(MintError::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    pub fn keypair_path(&self) -> PathBuf {
        PathBuf::from(&self.keypair_path)
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.gorbchain.xyz".to_string(),
            ws_url: Some("wss://rpc.gorbchain.xyz/ws/".to_string()),
            commitment: "confirmed".to_string(),
            program_id: "BvoSmPBF6mBRxBMY9FPguw1zUoUg3xrc5CaWf7y5ACkc".to_string(),
            use_custom_program: true,
            keypair_path: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".config/solana/id.json")
                .to_string_lossy()
                .into_owned(),
            explorer_url: "https://explorer.gorbchain.xyz".to_string(),
            network_name: "Gorbchain".to_string(),
            native_symbol: "SOL".to_string(),
            timeout_secs: 60,
            max_retries: 3,
            low_balance_lamports: 100_000_000,
            asset: AssetMetadata {
                name: "My first NFT on Gorbchain".to_string(),
                symbol: "GCMPL".to_string(),
                description: "An NFT created with the MPL Core program on Gorbchain".to_string(),
                uri: "https://arweave.net/placeholder-metadata-uri".to_string(),
                royalty_basis_points: 500,
            },
            collection: AssetMetadata {
                name: "Gorbchain Collection".to_string(),
                symbol: "GCMPL".to_string(),
                description: "A collection of NFTs using the MPL Core program on Gorbchain"
                    .to_string(),
                uri: "https://arweave.net/placeholder-collection-metadata".to_string(),
                royalty_basis_points: 500,
            },
        }
    }
}
