use std::time::Duration;

use solana_sdk::pubkey::Pubkey;

use crate::{
    commands::mint::{MintKind, MintOutcome, MintReceipt},
    config::{AssetMetadata, MintConfig},
    error::{FailureKind, MintError},
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn address_link(explorer_url: &str, address: &str) -> String {
    format!("{}/address/{}", explorer_url.trim_end_matches('/'), address)
}

pub fn tx_link(explorer_url: &str, signature: &str) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), signature)
}

/// Turns a mint outcome into the console summary.
pub struct Reporter {
    explorer_url: String,
    network_name: String,
    native_symbol: String,
    rpc_url: String,
    program_id: String,
    keypair_path: String,
}

impl Reporter {
    pub fn from_config(config: &MintConfig) -> Self {
        Self {
            explorer_url: config.explorer_url.clone(),
            network_name: config.network_name.clone(),
            native_symbol: config.native_symbol.clone(),
            rpc_url: config.rpc_url.clone(),
            program_id: config.program_id.clone(),
            keypair_path: config.keypair_path.clone(),
        }
    }

    pub fn success_lines(&self, receipt: &MintReceipt, metadata: &AssetMetadata) -> Vec<String> {
        let address = receipt.asset.to_string();
        let signature = receipt.signature.to_string();
        let label = receipt.kind.label();

        vec![
            format!("✅ {} created successfully!", label),
            format!("📝 Transaction signature: {}", signature),
            String::new(),
            format!(
                "🎉 SUCCESS! Your {} has been deployed on {}!",
                label, self.network_name
            ),
            RULE.to_string(),
            format!("📍 {} Address: {}", label, address),
            format!(
                "🔗 View {}: {}",
                label,
                address_link(&self.explorer_url, &address)
            ),
            format!(
                "🔗 View Transaction: {}",
                tx_link(&self.explorer_url, &signature)
            ),
            format!("🏷️ Name: {}", metadata.name),
            format!("🏷️ Symbol: {}", metadata.symbol),
            format!("📖 Description: {}", metadata.description),
            format!("📄 Metadata URI: {}", metadata.uri),
            format!("🔧 Program: {}", receipt.program_id),
            format!("🌐 Network: {}", self.network_name),
            RULE.to_string(),
        ]
    }

    pub fn timed_out_lines(&self, kind: MintKind, asset: &Pubkey, waited: Duration) -> Vec<String> {
        let address = asset.to_string();
        let mut lines = vec![
            format!(
                "⏳ Stopped waiting for the {} transaction after {} seconds.",
                kind.label(),
                waited.as_secs()
            ),
            "❓ Outcome unknown: the transaction may or may not have reached the node."
                .to_string(),
            "❓ If it did, it may still land. Check the address before retrying.".to_string(),
            format!("📍 Pending {} Address: {}", kind.label(), address),
            format!(
                "🔗 Check later: {}",
                address_link(&self.explorer_url, &address)
            ),
        ];
        lines.extend(self.hint_lines(FailureKind::Timeout));
        lines
    }

    pub fn failure_lines(
        &self,
        kind: MintKind,
        asset: Option<&Pubkey>,
        error: &MintError,
    ) -> Vec<String> {
        let mut lines = vec![format!("❌ Error deploying {}: {}", kind.label(), error)];

        if let Some(asset) = asset {
            lines.push(format!("📍 Attempted {} Address: {}", kind.label(), asset));
        }

        let logs = error.logs();
        if !logs.is_empty() {
            lines.push("📋 Detailed transaction logs:".to_string());
            lines.extend(logs.iter().map(|line| format!("   {}", line)));
        }

        let hints = self.hint_lines(error.kind());
        if hints.is_empty() {
            lines.push(format!("{:#?}", error));
        } else {
            lines.extend(hints);
        }
        lines
    }

    /// Operator guidance for a failure class. Unclassified failures get none.
    pub fn hint_lines(&self, kind: FailureKind) -> Vec<String> {
        match kind {
            FailureKind::Timeout => vec![
                "💡 Transaction timed out. This might be due to network issues or RPC overload."
                    .to_string(),
                "💡 Try running the command again.".to_string(),
            ],
            FailureKind::InsufficientFunds => vec![format!(
                "💡 Make sure you have enough {} for transaction fees on {}",
                self.native_symbol, self.network_name
            )],
            FailureKind::Credential => vec![
                "💡 Make sure your keypair file exists".to_string(),
                format!("💡 Keypair path: {}", self.keypair_path),
            ],
            FailureKind::Network => vec![
                format!("💡 Check your connection to {} RPC", self.network_name),
                format!("💡 Current RPC: {}", self.rpc_url),
            ],
            FailureKind::ProgramNotFound => vec![
                format!(
                    "💡 Make sure your MPL Core program is deployed to {}",
                    self.network_name
                ),
                format!("💡 Program ID should be: {}", self.program_id),
                format!(
                    "💡 Try checking the program with: solana program show {} --url {}",
                    self.program_id, self.rpc_url
                ),
            ],
            FailureKind::Unclassified => vec![],
        }
    }

    pub fn lines(&self, outcome: &MintOutcome, metadata: &AssetMetadata) -> Vec<String> {
        match outcome {
            MintOutcome::Confirmed(receipt) => self.success_lines(receipt, metadata),
            MintOutcome::TimedOutPendingUnknown {
                kind,
                asset,
                waited,
            } => self.timed_out_lines(*kind, asset, *waited),
            MintOutcome::Failed { kind, asset, error } => {
                self.failure_lines(*kind, asset.as_ref(), error)
            }
        }
    }

    pub fn report(&self, outcome: &MintOutcome, metadata: &AssetMetadata) {
        let lines = self.lines(outcome, metadata);
        if outcome.is_confirmed() {
            lines.iter().for_each(|line| println!("{}", line));
        } else {
            lines.iter().for_each(|line| eprintln!("{}", line));
        }
    }
}
