use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use tracing::{info, warn};

use crate::{
    error::MintError,
    solana::{
        Connection, SendOptions,
        program::{CORE_PROGRAM_NAME, Plugin, ProgramRegistry},
    },
};

/// Connection, signing identity and registered programs for one run.
pub struct ClientContext<C> {
    connection: C,
    identity: Keypair,
    programs: ProgramRegistry,
    send_options: SendOptions,
}

impl<C: Connection> ClientContext<C> {
    pub fn new(connection: C, identity: Keypair, send_options: SendOptions) -> Self {
        Self {
            connection,
            identity,
            programs: ProgramRegistry::default(),
            send_options,
        }
    }

    pub fn use_plugin<P: Plugin>(mut self, plugin: P) -> Self {
        plugin.install(&mut self.programs);
        self
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn identity(&self) -> &Keypair {
        &self.identity
    }

    pub fn send_options(&self) -> &SendOptions {
        &self.send_options
    }

    pub fn program_id(&self, name: &str) -> Result<Pubkey, MintError> {
        self.programs
            .get(name)
            .ok_or_else(|| MintError::Config(format!("no plugin registered program '{}'", name)))
    }

    /// Resolves the core program and compares it with the address the
    /// operator expects. A mismatch is reported but does not stop the run;
    /// the resolved address is the one instructions are sent to.
    pub fn verify_program(&self, expected: &Pubkey) -> Result<Pubkey, MintError> {
        let resolved = self.program_id(CORE_PROGRAM_NAME)?;
        info!(program_id = %resolved, "resolved {} program", CORE_PROGRAM_NAME);

        if resolved != *expected {
            warn!(
                %expected,
                %resolved,
                "configured program id differs from the one registered by the plugin"
            );
        }

        Ok(resolved)
    }

    pub fn payer(&self) -> Pubkey {
        self.identity.pubkey()
    }
}
