use anyhow::{Result, bail};
use clap::Parser;
use mint_cli::{
    commands::mint::{MintKind, execute},
    config::MintConfig,
    report::Reporter,
    solana::SolanaClient,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
#[command(name = "mint-cli")]
#[command(about = "Mint core NFTs and collections on Gorbchain")]
struct Cli {
    /// Create a collection instead of a single asset
    #[arg(long)]
    collection: bool,

    /// Config file path (default: <config dir>/gorb-mint/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RPC URL (default: from config)
    #[arg(short, long)]
    rpc_url: Option<String>,

    /// Path to a solana-keygen JSON keypair
    #[arg(short, long)]
    keypair: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = MintConfig::load_or_create(cli.config)?;
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(keypair) = cli.keypair {
        config.keypair_path = keypair.to_string_lossy().into_owned();
    }

    let kind = MintKind::from_flag(cli.collection);
    let commitment = config.commitment_config()?;
    let client = SolanaClient::new(config.rpc_url.clone(), config.ws_url.clone(), commitment);

    let outcome = execute(&config, kind, client).await;
    Reporter::from_config(&config).report(&outcome, kind.metadata(&config));

    if !outcome.is_confirmed() {
        bail!("{} deployment ended as {}", kind.label(), outcome.stage());
    }
    Ok(())
}
