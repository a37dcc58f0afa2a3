use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_program,
    transaction::Transaction,
};

use super::Connection;
use crate::{cli::ClientContext, error::MintError};

pub const CREATE_V1_DISCRIMINATOR: u8 = 0;
pub const CREATE_COLLECTION_V1_DISCRIMINATOR: u8 = 1;

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataState {
    AccountState,
    LedgerState,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Creator {
    pub address: [u8; 32],
    pub percentage: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RuleSet {
    None,
    ProgramAllowList(Vec<[u8; 32]>),
    ProgramDenyList(Vec<[u8; 32]>),
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Royalties {
    pub basis_points: u16,
    pub creators: Vec<Creator>,
    pub rule_set: RuleSet,
}

// Only the leading variant is ever built here; its borsh tag must stay 0.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum AssetPlugin {
    Royalties(Royalties),
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum PluginAuthority {
    None,
    Owner,
    UpdateAuthority,
    Address { address: [u8; 32] },
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PluginAuthorityPair {
    pub plugin: AssetPlugin,
    pub authority: Option<PluginAuthority>,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateV1Args {
    pub data_state: DataState,
    pub name: String,
    pub uri: String,
    pub plugins: Option<Vec<PluginAuthorityPair>>,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateCollectionV1Args {
    pub name: String,
    pub uri: String,
    pub plugins: Option<Vec<PluginAuthorityPair>>,
}

/// Royalties are carried as a plugin naming the payer as the sole creator.
/// Zero basis points sends no plugin at all.
pub fn royalty_plugins(basis_points: u16, creator: &Pubkey) -> Vec<PluginAuthorityPair> {
    if basis_points == 0 {
        return vec![];
    }

    vec![PluginAuthorityPair {
        plugin: AssetPlugin::Royalties(Royalties {
            basis_points,
            creators: vec![Creator {
                address: creator.to_bytes(),
                percentage: 100,
            }],
            rule_set: RuleSet::None,
        }),
        authority: None,
    }]
}

fn instruction_data<T: BorshSerialize>(discriminator: u8, args: &T) -> Result<Vec<u8>, MintError> {
    let mut data = vec![discriminator];
    args.serialize(&mut data)
        .map_err(|err| MintError::Encoding(err.to_string()))?;
    Ok(data)
}

// The core program reads its own id in an optional slot as "not provided".
fn absent(program_id: &Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(*program_id, false)
}

pub fn create_asset_instruction(
    program_id: &Pubkey,
    asset: &Pubkey,
    payer: &Pubkey,
    name: String,
    uri: String,
    plugins: Vec<PluginAuthorityPair>,
) -> Result<Instruction, MintError> {
    let args = CreateV1Args {
        data_state: DataState::AccountState,
        name,
        uri,
        plugins: Some(plugins),
    };

    let accounts = vec![
        AccountMeta::new(*asset, true),
        absent(program_id), // collection
        absent(program_id), // authority
        AccountMeta::new(*payer, true),
        absent(program_id), // owner
        absent(program_id), // update authority
        AccountMeta::new_readonly(system_program::ID, false),
        absent(program_id), // log wrapper
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: instruction_data(CREATE_V1_DISCRIMINATOR, &args)?,
    })
}

pub fn create_collection_instruction(
    program_id: &Pubkey,
    collection: &Pubkey,
    payer: &Pubkey,
    name: String,
    uri: String,
    plugins: Vec<PluginAuthorityPair>,
) -> Result<Instruction, MintError> {
    let args = CreateCollectionV1Args {
        name,
        uri,
        plugins: Some(plugins),
    };

    let accounts = vec![
        AccountMeta::new(*collection, true),
        absent(program_id), // update authority
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(system_program::ID, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: instruction_data(CREATE_COLLECTION_V1_DISCRIMINATOR, &args)?,
    })
}

/// A new address for the asset about to be created. Never reuse one: the
/// create instruction fails against an address that is already initialized.
pub fn generate_asset_signer() -> Keypair {
    Keypair::new()
}

/// Collects instructions and additional signers, then signs with the context
/// identity as fee payer and dispatches through the context connection.
#[derive(Default)]
pub struct TransactionBuilder<'a> {
    instructions: Vec<Instruction>,
    signers: Vec<&'a Keypair>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn signer(mut self, signer: &'a Keypair) -> Self {
        self.signers.push(signer);
        self
    }

    pub async fn send_and_confirm<C: Connection>(
        &self,
        ctx: &ClientContext<C>,
    ) -> Result<Signature, MintError> {
        let payer = ctx.identity();
        let recent_blockhash = ctx.connection().get_latest_blockhash().await?;

        let mut transaction =
            Transaction::new_with_payer(&self.instructions, Some(&payer.pubkey()));

        let mut signers: Vec<&Keypair> = vec![payer];
        signers.extend(self.signers.iter().copied());
        transaction
            .try_sign(signers.as_slice(), recent_blockhash)
            .map_err(|err| MintError::Signing(err.to_string()))?;

        ctx.connection()
            .send_and_confirm_transaction(&transaction, ctx.send_options())
            .await
    }
}
