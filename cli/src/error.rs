use std::path::PathBuf;

use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_request::{RpcError, RpcResponseErrorData},
};
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

/// Broad origin of a failed run, used to pick the hint shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    InsufficientFunds,
    Credential,
    Network,
    ProgramNotFound,
    Unclassified,
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error("failed to load keypair from {}: {reason}", path.display())]
    Credential { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to encode instruction: {0}")]
    Encoding(String),

    #[error("failed to sign transaction: {0}")]
    Signing(String),

    #[error("{message}")]
    Rpc {
        kind: FailureKind,
        message: String,
        logs: Vec<String>,
    },
}

impl MintError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MintError::Credential { .. } => FailureKind::Credential,
            MintError::Config(_) | MintError::Encoding(_) | MintError::Signing(_) => {
                FailureKind::Unclassified
            }
            MintError::Rpc { kind, .. } => *kind,
        }
    }

    /// Program logs captured from a failed preflight simulation, if any.
    pub fn logs(&self) -> &[String] {
        match self {
            MintError::Rpc { logs, .. } => logs,
            _ => &[],
        }
    }

    pub fn rpc(kind: FailureKind, message: impl Into<String>) -> Self {
        MintError::Rpc {
            kind,
            message: message.into(),
            logs: vec![],
        }
    }

    /// Builds an error from an unstructured message, classifying it by content.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        MintError::rpc(classify_message(&message), message)
    }

    pub fn from_transaction_error(err: TransactionError) -> Self {
        let message = err.to_string();
        let kind = classify_transaction_error(&err).unwrap_or_else(|| classify_message(&message));
        MintError::rpc(kind, message)
    }
}

/// Fallback classification for messages that carry no structured error.
pub fn classify_message(message: &str) -> FailureKind {
    let message = message.to_lowercase();

    if message.contains("timeout") || message.contains("timed out") {
        FailureKind::Timeout
    } else if message.contains("insufficient funds") || message.contains("insufficient lamports") {
        FailureKind::InsufficientFunds
    } else if message.contains("keypair") {
        FailureKind::Credential
    } else if message.contains("program that does not exist") {
        FailureKind::ProgramNotFound
    } else if message.contains("network")
        || message.contains("connection")
        || message.contains("error sending request")
    {
        FailureKind::Network
    } else {
        FailureKind::Unclassified
    }
}

fn classify_transaction_error(err: &TransactionError) -> Option<FailureKind> {
    match err {
        TransactionError::InsufficientFundsForFee
        | TransactionError::InsufficientFundsForRent { .. }
        | TransactionError::AccountNotFound => Some(FailureKind::InsufficientFunds),
        TransactionError::ProgramAccountNotFound | TransactionError::InvalidProgramForExecution => {
            Some(FailureKind::ProgramNotFound)
        }
        _ => None,
    }
}

impl From<ClientError> for MintError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();

        let (typed, logs) = match err.kind() {
            ClientErrorKind::Reqwest(e) if e.is_timeout() => (Some(FailureKind::Timeout), vec![]),
            ClientErrorKind::Reqwest(_) | ClientErrorKind::Io(_) => {
                (Some(FailureKind::Network), vec![])
            }
            ClientErrorKind::TransactionError(e) => (classify_transaction_error(e), vec![]),
            ClientErrorKind::RpcError(RpcError::RpcResponseError {
                data: RpcResponseErrorData::SendTransactionPreflightFailure(simulation),
                ..
            }) => (
                simulation
                    .err
                    .clone()
                    .map(TransactionError::from)
                    .as_ref()
                    .and_then(classify_transaction_error),
                simulation.logs.clone().unwrap_or_default(),
            ),
            _ => (None, vec![]),
        };

        let kind = typed.unwrap_or_else(|| {
            let kind = classify_message(&message);
            if kind != FailureKind::Unclassified {
                return kind;
            }
            // the system program reports an underfunded payer only in its logs
            logs.iter()
                .map(|line| classify_message(line))
                .find(|kind| *kind == FailureKind::InsufficientFunds)
                .unwrap_or(FailureKind::Unclassified)
        });

        MintError::Rpc {
            kind,
            message,
            logs,
        }
    }
}
