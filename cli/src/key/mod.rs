pub mod raw;

use solana_sdk::signature::Keypair;

use crate::error::MintError;

/// Length of a serialized ed25519 keypair: 32 secret bytes then 32 public bytes.
pub const KEYPAIR_LENGTH: usize = 64;

pub trait KeySource {
    fn load_keypair(&self) -> Result<Keypair, MintError>;
}
