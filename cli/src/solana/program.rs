use std::collections::HashMap;

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Address of the core asset program on mainnet and devnet.
pub const CORE_PROGRAM_ID: Pubkey = pubkey!("CoREENxT6tW1HoK8ypY1SxRMZTcVPm7R94rH4PZNhX7d");

pub const CORE_PROGRAM_NAME: &str = "mplCore";

#[derive(Debug, Default)]
pub struct ProgramRegistry {
    programs: HashMap<String, Pubkey>,
}

impl ProgramRegistry {
    pub fn register(&mut self, name: &str, program_id: Pubkey) {
        self.programs.insert(name.to_string(), program_id);
    }

    pub fn get(&self, name: &str) -> Option<Pubkey> {
        self.programs.get(name).copied()
    }
}

/// Extension installed into a client context.
pub trait Plugin {
    fn install(&self, registry: &mut ProgramRegistry);
}

/// Registers the core asset program, either at its canonical address or at a
/// custom deployment.
pub struct CorePlugin {
    program_id: Pubkey,
}

impl CorePlugin {
    pub fn at(program_id: Pubkey) -> Self {
        Self { program_id }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::at(CORE_PROGRAM_ID)
    }
}

impl Plugin for CorePlugin {
    fn install(&self, registry: &mut ProgramRegistry) {
        registry.register(CORE_PROGRAM_NAME, self.program_id);
    }
}
