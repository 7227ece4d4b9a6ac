//! Verifies the GM program is deployed and prepares the account it will greet.

use std::path::PathBuf;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{
        read_keypair_file,
        Keypair,
        Signer,
    },
};

use crate::{
    address::find_greeting_address,
    error::GmClientError,
    greeting::GREETING_SIZE,
    instructions::create_greeting_account,
    ledger::LedgerClient,
    logs::log_info,
};

pub const DEFAULT_PROGRAM_SO_PATH: &str = "target/deploy/gm_program.so";
pub const DEFAULT_PROGRAM_KEYPAIR_PATH: &str = "target/deploy/gm_program-keypair.json";

/// Files produced by building and deploying the program.
#[derive(Clone, Debug)]
pub struct ProgramArtifacts {
    pub keypair_path: PathBuf,
    pub so_path: PathBuf,
}

impl Default for ProgramArtifacts {
    fn default() -> Self {
        Self {
            keypair_path: DEFAULT_PROGRAM_KEYPAIR_PATH.into(),
            so_path: DEFAULT_PROGRAM_SO_PATH.into(),
        }
    }
}

impl ProgramArtifacts {
    pub fn load_program_id(&self) -> anyhow::Result<Pubkey> {
        read_keypair_file(&self.keypair_path)
            .map(|kp| kp.pubkey())
            .map_err(|e| {
                GmClientError::ProgramKeypairUnreadable {
                    path: self.keypair_path.clone(),
                    so_path: self.so_path.clone(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn is_built(&self) -> bool {
        self.so_path.exists()
    }
}

/// The deployed program and the greeting account it owns for this payer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GreetingTarget {
    pub program_id: Pubkey,
    pub greeting_pubkey: Pubkey,
}

/// Fails with a deployment error unless `program_id` is an executable account on-chain.
pub async fn check_deployed<C: LedgerClient>(
    rpc: &C,
    program_id: &Pubkey,
    artifacts: &ProgramArtifacts,
) -> anyhow::Result<()> {
    match rpc.account(program_id).await? {
        None if artifacts.is_built() => Err(GmClientError::ProgramNotDeployed {
            program_id: *program_id,
            so_path: artifacts.so_path.clone(),
        }
        .into()),
        None => Err(GmClientError::ProgramNotBuilt {
            so_path: artifacts.so_path.clone(),
        }
        .into()),
        Some(account) if !account.executable => Err(GmClientError::ProgramNotExecutable {
            program_id: *program_id,
        }
        .into()),
        Some(_) => Ok(()),
    }
}

/// Creates the greeting account if it doesn't exist yet. An existing account is reused as
/// is. Returns whether an account was created.
pub async fn ensure_greeting_account<C: LedgerClient>(
    rpc: &C,
    payer: &Keypair,
    target: &GreetingTarget,
) -> anyhow::Result<bool> {
    if rpc.account(&target.greeting_pubkey).await?.is_some() {
        return Ok(false);
    }

    log_info(
        "Creating account",
        format!("{} to say hello to", target.greeting_pubkey),
    );
    let lamports = rpc.minimum_balance_for_rent_exemption(*GREETING_SIZE).await?;
    let create = create_greeting_account(
        &payer.pubkey(),
        &target.greeting_pubkey,
        &target.program_id,
        lamports,
    );
    rpc.send_and_confirm(payer, &[create]).await?;

    Ok(true)
}

/// Loads the program id, checks the program is deployed and makes sure the payer's greeting
/// account exists.
pub async fn check_program<C: LedgerClient>(
    rpc: &C,
    payer: &Keypair,
    artifacts: &ProgramArtifacts,
) -> anyhow::Result<GreetingTarget> {
    let program_id = artifacts.load_program_id()?;
    check_deployed(rpc, &program_id, artifacts).await?;
    log_info("Using program", program_id);

    let target = GreetingTarget {
        program_id,
        greeting_pubkey: find_greeting_address(&payer.pubkey(), &program_id)?,
    };
    ensure_greeting_account(rpc, payer, &target).await?;

    Ok(target)
}
