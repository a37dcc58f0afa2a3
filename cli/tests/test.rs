use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use borsh::BorshDeserialize;
use mint_cli::{
    commands::mint::{MintKind, MintOutcome, MintStage, execute},
    config::MintConfig,
    error::{FailureKind, MintError},
    report::Reporter,
    solana::{
        Connection, SendOptions,
        program::CORE_PROGRAM_ID,
        transaction::{
            CREATE_COLLECTION_V1_DISCRIMINATOR, CREATE_V1_DISCRIMINATOR, CreateCollectionV1Args,
            CreateV1Args,
        },
    },
};
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Keypair, signature::Signature, signer::Signer,
    transaction::Transaction,
};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
enum SendBehavior {
    Confirm,
    Reject(String),
    Hang,
}

#[derive(Default)]
struct Recorded {
    calls: Vec<&'static str>,
    sent: Vec<Transaction>,
}

#[derive(Clone)]
struct MockConnection {
    balance: Result<u64, String>,
    send: SendBehavior,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockConnection {
    fn new(balance: u64, send: SendBehavior) -> Self {
        Self {
            balance: Ok(balance),
            send,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.recorded.lock().unwrap().calls.clone()
    }

    fn sent(&self) -> Vec<Transaction> {
        self.recorded.lock().unwrap().sent.clone()
    }

    fn record(&self, call: &'static str) {
        self.recorded.lock().unwrap().calls.push(call);
    }
}

impl Connection for MockConnection {
    fn rpc_url(&self) -> &str {
        "http://mock.invalid"
    }

    async fn get_balance(&self, _pubkey: &Pubkey) -> Result<u64, MintError> {
        self.record("get_balance");
        self.balance.clone().map_err(MintError::from_message)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, MintError> {
        self.record("get_latest_blockhash");
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
        options: &SendOptions,
    ) -> Result<Signature, MintError> {
        self.record("send_and_confirm_transaction");
        assert_eq!(options.max_retries, 3);
        assert!(!options.skip_preflight);
        self.recorded.lock().unwrap().sent.push(transaction.clone());

        match &self.send {
            SendBehavior::Confirm => Ok(transaction.signatures[0]),
            SendBehavior::Reject(message) => Err(MintError::from_message(message.clone())),
            SendBehavior::Hang => std::future::pending().await,
        }
    }
}

fn config_with_key() -> (TempDir, MintConfig, Keypair) {
    let dir = tempfile::tempdir().unwrap();
    let keypair = Keypair::new();
    let path = dir.path().join("id.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(
        serde_json::to_string(&keypair.to_bytes().to_vec())
            .unwrap()
            .as_bytes(),
    )
    .unwrap();

    let config = MintConfig {
        keypair_path: path.to_string_lossy().into_owned(),
        ..MintConfig::default()
    };
    (dir, config, keypair)
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs one mint with a thread-local subscriber and returns what it logged.
async fn execute_capturing_logs(
    config: &MintConfig,
    kind: MintKind,
    connection: MockConnection,
) -> (MintOutcome, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let outcome = execute(config, kind, connection).await;
    (outcome, buffer.contents())
}

fn instruction_data(transaction: &Transaction) -> &[u8] {
    &transaction.message.instructions[0].data
}

fn invoked_program(transaction: &Transaction) -> Pubkey {
    let ix = &transaction.message.instructions[0];
    transaction.message.account_keys[ix.program_id_index as usize]
}

#[tokio::test]
async fn mints_single_asset() {
    let (_dir, config, payer) = config_with_key();
    let connection = MockConnection::new(5_000_000_000, SendBehavior::Confirm);

    let outcome = execute(&config, MintKind::Asset, connection.clone()).await;

    let MintOutcome::Confirmed(receipt) = &outcome else {
        panic!("expected confirmation, got {:?}", outcome);
    };
    assert_eq!(receipt.kind, MintKind::Asset);
    assert_eq!(receipt.program_id, config.program_pubkey().unwrap());

    let sent = connection.sent();
    assert_eq!(sent.len(), 1);
    let transaction = &sent[0];
    assert_eq!(transaction.signatures.len(), 2);
    assert_eq!(receipt.signature, transaction.signatures[0]);
    assert_eq!(transaction.message.account_keys[0], payer.pubkey());
    assert!(transaction.message.account_keys.contains(&receipt.asset));
    assert_eq!(invoked_program(transaction), config.program_pubkey().unwrap());

    let data = instruction_data(transaction);
    assert_eq!(data[0], CREATE_V1_DISCRIMINATOR);
    let args = CreateV1Args::try_from_slice(&data[1..]).unwrap();
    assert_eq!(args.name, config.asset.name);
    assert_eq!(args.uri, config.asset.uri);
    assert_eq!(args.plugins.map(|plugins| plugins.len()), Some(1));

    assert_eq!(
        connection.calls(),
        vec![
            "get_balance",
            "get_latest_blockhash",
            "send_and_confirm_transaction"
        ]
    );
}

#[tokio::test]
async fn collection_flag_uses_collection_fields() {
    let (_dir, config, _payer) = config_with_key();
    let connection = MockConnection::new(5_000_000_000, SendBehavior::Confirm);

    let outcome = execute(&config, MintKind::Collection, connection.clone()).await;
    assert!(outcome.is_confirmed());

    let sent = connection.sent();
    assert_eq!(sent.len(), 1);
    let data = instruction_data(&sent[0]);
    assert_eq!(data[0], CREATE_COLLECTION_V1_DISCRIMINATOR);
    assert_ne!(data[0], CREATE_V1_DISCRIMINATOR);

    let args = CreateCollectionV1Args::try_from_slice(&data[1..]).unwrap();
    assert_eq!(args.name, config.collection.name);
    assert_eq!(args.uri, config.collection.uri);
    assert_ne!(args.name, config.asset.name);
}

#[tokio::test]
async fn low_balance_warns_but_submits() {
    let (_dir, config, _payer) = config_with_key();
    let connection = MockConnection::new(1_000, SendBehavior::Confirm);

    let (outcome, logs) =
        execute_capturing_logs(&config, MintKind::Asset, connection.clone()).await;

    assert!(outcome.is_confirmed());
    assert_eq!(connection.sent().len(), 1);
    assert!(logs.contains("WARN"), "no warning in: {}", logs);
    assert!(logs.contains("low balance"), "no warning in: {}", logs);
    assert!(logs.contains("balance=1000"), "no balance in: {}", logs);
}

#[tokio::test]
async fn funded_payer_gets_no_balance_warning() {
    let (_dir, config, _payer) = config_with_key();
    let connection = MockConnection::new(100_000_000, SendBehavior::Confirm);

    let (outcome, logs) = execute_capturing_logs(&config, MintKind::Asset, connection).await;

    assert!(outcome.is_confirmed());
    assert!(!logs.contains("low balance"), "unexpected warning in: {}", logs);
}

#[tokio::test]
async fn each_run_generates_a_fresh_asset() {
    let (_dir, config, _payer) = config_with_key();

    let first = execute(
        &config,
        MintKind::Asset,
        MockConnection::new(5_000_000_000, SendBehavior::Confirm),
    )
    .await;
    let second = execute(
        &config,
        MintKind::Asset,
        MockConnection::new(5_000_000_000, SendBehavior::Confirm),
    )
    .await;

    match (first, second) {
        (MintOutcome::Confirmed(a), MintOutcome::Confirmed(b)) => assert_ne!(a.asset, b.asset),
        other => panic!("expected two confirmations, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn deadline_reports_pending_unknown() {
    let (_dir, config, _payer) = config_with_key();
    let connection = MockConnection::new(5_000_000_000, SendBehavior::Hang);

    let outcome = execute(&config, MintKind::Asset, connection.clone()).await;

    match &outcome {
        MintOutcome::TimedOutPendingUnknown { waited, asset, .. } => {
            assert_eq!(*waited, Duration::from_secs(60));
            assert!(connection.sent()[0].message.account_keys.contains(asset));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(outcome.stage(), MintStage::TimedOut);

    let lines = Reporter::from_config(&config).lines(&outcome, &config.asset);
    assert!(lines.iter().any(|line| line.contains("Try running the command again")));
}

#[tokio::test(start_paused = true)]
async fn collection_deadline_reports_pending_unknown() {
    let (_dir, config, _payer) = config_with_key();
    let connection = MockConnection::new(5_000_000_000, SendBehavior::Hang);

    let outcome = execute(&config, MintKind::Collection, connection.clone()).await;

    match &outcome {
        MintOutcome::TimedOutPendingUnknown {
            kind,
            waited,
            asset,
        } => {
            assert_eq!(*kind, MintKind::Collection);
            assert_eq!(*waited, Duration::from_secs(60));
            let sent = connection.sent();
            assert_eq!(instruction_data(&sent[0])[0], CREATE_COLLECTION_V1_DISCRIMINATOR);
            assert!(sent[0].message.account_keys.contains(asset));
        }
        other => panic!("expected timeout, got {:?}", other),
    }

    let lines = Reporter::from_config(&config).lines(&outcome, &config.collection);
    assert!(lines.iter().any(|line| line.contains("Pending Collection Address")));
}

#[tokio::test]
async fn rejected_submission_is_classified() {
    let (_dir, config, _payer) = config_with_key();
    let connection = MockConnection::new(
        5_000_000_000,
        SendBehavior::Reject("Transaction simulation failed: insufficient funds for rent".into()),
    );

    let outcome = execute(&config, MintKind::Asset, connection).await;

    let MintOutcome::Failed { error, asset, .. } = &outcome else {
        panic!("expected failure, got {:?}", outcome);
    };
    assert!(asset.is_some());
    assert_eq!(error.kind(), FailureKind::InsufficientFunds);

    let lines = Reporter::from_config(&config).lines(&outcome, &config.asset);
    assert!(
        lines
            .iter()
            .any(|line| line.contains("Make sure you have enough SOL"))
    );
}

#[tokio::test]
async fn unreadable_key_stops_before_network() {
    let dir = tempfile::tempdir().unwrap();
    let config = MintConfig {
        keypair_path: dir
            .path()
            .join("missing.json")
            .to_string_lossy()
            .into_owned(),
        ..MintConfig::default()
    };
    let connection = MockConnection::new(5_000_000_000, SendBehavior::Confirm);

    let outcome = execute(&config, MintKind::Asset, connection.clone()).await;

    match &outcome {
        MintOutcome::Failed { error, asset, .. } => {
            assert!(matches!(error, MintError::Credential { .. }));
            assert!(asset.is_none());
        }
        other => panic!("expected credential failure, got {:?}", other),
    }
    assert!(connection.calls().is_empty());
}

#[tokio::test]
async fn balance_query_failure_is_fatal() {
    let (_dir, config, _payer) = config_with_key();
    let connection = MockConnection {
        balance: Err("error sending request for url (https://rpc.gorbchain.xyz/)".into()),
        ..MockConnection::new(0, SendBehavior::Confirm)
    };

    let outcome = execute(&config, MintKind::Asset, connection.clone()).await;

    match &outcome {
        MintOutcome::Failed { error, .. } => assert_eq!(error.kind(), FailureKind::Network),
        other => panic!("expected network failure, got {:?}", other),
    }
    assert!(connection.sent().is_empty());
}

#[tokio::test]
async fn canonical_plugin_is_used_despite_mismatch() {
    let (_dir, mut config, _payer) = config_with_key();
    config.use_custom_program = false;
    let connection = MockConnection::new(5_000_000_000, SendBehavior::Confirm);

    let outcome = execute(&config, MintKind::Asset, connection.clone()).await;

    assert!(outcome.is_confirmed());
    assert_eq!(invoked_program(&connection.sent()[0]), CORE_PROGRAM_ID);
}
