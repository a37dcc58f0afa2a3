use std::fmt;
use std::time::Duration;

use solana_sdk::{
    native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, signature::Signature, signer::Signer,
};
use tracing::{debug, info, warn};

use crate::{
    cli::ClientContext,
    config::{AssetMetadata, MintConfig},
    error::MintError,
    key::{KeySource, raw::JsonKeyFile},
    solana::{
        Connection, SendOptions,
        program::CorePlugin,
        transaction::{
            TransactionBuilder, create_asset_instruction, create_collection_instruction,
            generate_asset_signer, royalty_plugins,
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintKind {
    Asset,
    Collection,
}

impl MintKind {
    pub fn from_flag(collection: bool) -> Self {
        if collection {
            MintKind::Collection
        } else {
            MintKind::Asset
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MintKind::Asset => "NFT",
            MintKind::Collection => "Collection",
        }
    }

    pub fn metadata<'a>(&self, config: &'a MintConfig) -> &'a AssetMetadata {
        match self {
            MintKind::Asset => &config.asset,
            MintKind::Collection => &config.collection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStage {
    Idle,
    BalanceChecked,
    SignerGenerated,
    Submitted,
    Confirmed,
    TimedOut,
    Failed,
}

impl fmt::Display for MintStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintStage::Idle => "idle",
            MintStage::BalanceChecked => "balance-checked",
            MintStage::SignerGenerated => "signer-generated",
            MintStage::Submitted => "submitted",
            MintStage::Confirmed => "confirmed",
            MintStage::TimedOut => "timed-out-pending-unknown",
            MintStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct MintReceipt {
    pub kind: MintKind,
    pub asset: Pubkey,
    pub signature: Signature,
    pub program_id: Pubkey,
}

#[derive(Debug)]
pub enum MintOutcome {
    Confirmed(MintReceipt),
    /// The local deadline passed first and the wait was dropped. The
    /// transaction may or may not have reached the node, so it may still land.
    TimedOutPendingUnknown {
        kind: MintKind,
        asset: Pubkey,
        waited: Duration,
    },
    Failed {
        kind: MintKind,
        asset: Option<Pubkey>,
        error: MintError,
    },
}

impl MintOutcome {
    pub fn stage(&self) -> MintStage {
        match self {
            MintOutcome::Confirmed(_) => MintStage::Confirmed,
            MintOutcome::TimedOutPendingUnknown { .. } => MintStage::TimedOut,
            MintOutcome::Failed { .. } => MintStage::Failed,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, MintOutcome::Confirmed(_))
    }
}

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub timeout: Duration,
    pub low_balance_lamports: u64,
    pub native_symbol: String,
}

impl SubmitSettings {
    pub fn from_config(config: &MintConfig) -> Result<Self, MintError> {
        Ok(Self {
            timeout: config.submit_timeout()?,
            low_balance_lamports: config.low_balance_lamports,
            native_symbol: config.native_symbol.clone(),
        })
    }
}

pub fn is_low_balance(lamports: u64, threshold: u64) -> bool {
    lamports < threshold
}

fn lamports_to_native(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

fn advance(stage: MintStage) {
    debug!(%stage, "mint stage");
}

/// Creates one asset or collection: checks the payer balance, generates a
/// fresh asset key, submits the create instruction and waits for
/// confirmation up to `settings.timeout`.
pub async fn mint<C: Connection>(
    ctx: &ClientContext<C>,
    kind: MintKind,
    metadata: &AssetMetadata,
    program_id: &Pubkey,
    settings: &SubmitSettings,
) -> MintOutcome {
    advance(MintStage::Idle);
    let payer = ctx.payer();

    let balance = match ctx.connection().get_balance(&payer).await {
        Ok(balance) => balance,
        Err(error) => {
            return MintOutcome::Failed {
                kind,
                asset: None,
                error,
            };
        }
    };
    println!(
        "💰 Current balance: {} {}",
        lamports_to_native(balance),
        settings.native_symbol
    );
    if is_low_balance(balance, settings.low_balance_lamports) {
        warn!(
            balance,
            threshold = settings.low_balance_lamports,
            "low balance, make sure you have enough {} for transaction fees",
            settings.native_symbol
        );
    }
    advance(MintStage::BalanceChecked);

    let asset = generate_asset_signer();
    let asset_address = asset.pubkey();
    println!("🔑 Generated {} address: {}", kind.label(), asset_address);
    advance(MintStage::SignerGenerated);

    let plugins = royalty_plugins(metadata.royalty_basis_points, &payer);
    let instruction = match kind {
        MintKind::Asset => create_asset_instruction(
            program_id,
            &asset_address,
            &payer,
            metadata.name.clone(),
            metadata.uri.clone(),
            plugins,
        ),
        MintKind::Collection => create_collection_instruction(
            program_id,
            &asset_address,
            &payer,
            metadata.name.clone(),
            metadata.uri.clone(),
            plugins,
        ),
    };
    let instruction = match instruction {
        Ok(instruction) => instruction,
        Err(error) => {
            return MintOutcome::Failed {
                kind,
                asset: Some(asset_address),
                error,
            };
        }
    };

    println!("🎨 Creating {} \"{}\"...", kind.label(), metadata.name);
    let builder = TransactionBuilder::new().add(instruction).signer(&asset);
    advance(MintStage::Submitted);

    match tokio::time::timeout(settings.timeout, builder.send_and_confirm(ctx)).await {
        Ok(Ok(signature)) => {
            advance(MintStage::Confirmed);
            info!(%signature, asset = %asset_address, "create transaction confirmed");
            MintOutcome::Confirmed(MintReceipt {
                kind,
                asset: asset_address,
                signature,
                program_id: *program_id,
            })
        }
        Ok(Err(error)) => {
            advance(MintStage::Failed);
            MintOutcome::Failed {
                kind,
                asset: Some(asset_address),
                error,
            }
        }
        Err(_) => {
            advance(MintStage::TimedOut);
            warn!(
                asset = %asset_address,
                timeout_secs = settings.timeout.as_secs(),
                "stopped waiting, the transaction may or may not have reached the node"
            );
            MintOutcome::TimedOutPendingUnknown {
                kind,
                asset: asset_address,
                waited: settings.timeout,
            }
        }
    }
}

/// Full run: load the operator key, build the client context around
/// `connection`, then mint. The key is loaded before any network call.
pub async fn execute<C: Connection>(
    config: &MintConfig,
    kind: MintKind,
    connection: C,
) -> MintOutcome {
    let failed = |error| MintOutcome::Failed {
        kind,
        asset: None,
        error,
    };

    let identity = match JsonKeyFile::new(config.keypair_path()).load_keypair() {
        Ok(keypair) => keypair,
        Err(error) => return failed(error),
    };
    info!(identity = %identity.pubkey(), "loaded keypair");

    let (expected_program, commitment, settings) = match (
        config.program_pubkey(),
        config.commitment_config(),
        SubmitSettings::from_config(config),
    ) {
        (Ok(program), Ok(commitment), Ok(settings)) => (program, commitment, settings),
        (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => return failed(error),
    };

    let send_options = SendOptions {
        commitment,
        preflight_commitment: commitment.commitment,
        max_retries: config.max_retries,
        ..SendOptions::default()
    };

    let plugin = if config.use_custom_program {
        CorePlugin::at(expected_program)
    } else {
        CorePlugin::default()
    };
    let ctx = ClientContext::new(connection, identity, send_options).use_plugin(plugin);
    info!(rpc_url = %ctx.connection().rpc_url(), "client context ready");

    let program_id = match ctx.verify_program(&expected_program) {
        Ok(program_id) => program_id,
        Err(error) => return failed(error),
    };

    println!(
        "🚀 Starting {} deployment on {}...",
        kind.label(),
        config.network_name
    );
    mint(&ctx, kind, kind.metadata(config), &program_id, &settings).await
}
