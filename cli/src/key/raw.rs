use solana_sdk::signature::Keypair;
use std::fs;
use std::path::PathBuf;

use super::{KEYPAIR_LENGTH, KeySource};
use crate::error::MintError;

/// A keypair stored as a JSON array of bytes, the format written by `solana-keygen`.
pub struct JsonKeyFile {
    path: PathBuf,
}

impl JsonKeyFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn credential_error(&self, reason: impl Into<String>) -> MintError {
        MintError::Credential {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl KeySource for JsonKeyFile {
    fn load_keypair(&self) -> Result<Keypair, MintError> {
        let json = fs::read_to_string(&self.path)
            .map_err(|err| self.credential_error(format!("cannot read file: {}", err)))?;

        if json.trim().is_empty() {
            return Err(self.credential_error("file is empty"));
        }

        let bytes: Vec<u8> = serde_json::from_str(&json)
            .map_err(|err| self.credential_error(format!("not a JSON byte array: {}", err)))?;

        if bytes.len() != KEYPAIR_LENGTH {
            return Err(self.credential_error(format!(
                "invalid secret key length, should be {} but got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            )));
        }

        Keypair::from_bytes(&bytes).map_err(|err| self.credential_error(err.to_string()))
    }
}
