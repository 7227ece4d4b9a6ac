//! Loading and funding the account that pays for rent and transaction fees.

use std::path::Path;

use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{
        read_keypair_file,
        Keypair,
    },
};

use crate::{
    error::GmClientError,
    greeting::GREETING_SIZE,
    ledger::LedgerClient,
    logs::{
        log_info,
        log_warning,
    },
};

pub const DEFAULT_SIGNATURE_BUDGET: u64 = 100;

pub fn load_payer(path: &Path) -> anyhow::Result<Keypair> {
    read_keypair_file(path).map_err(|e| {
        GmClientError::PayerKeypairUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Lamports the payer must hold to create one greeting account and pay the fees of
/// `signature_budget` signatures.
pub async fn required_payer_balance<C: LedgerClient>(
    rpc: &C,
    payer: &Pubkey,
    signature_budget: u64,
) -> anyhow::Result<u64> {
    let rent = rpc.minimum_balance_for_rent_exemption(*GREETING_SIZE).await?;
    let fee = rpc.fee_per_signature(payer).await?;
    Ok(rent.saturating_add(fee.saturating_mul(signature_budget)))
}

/// Airdrops to `payer` if it can't cover [`required_payer_balance`], then returns the payer's
/// balance. A no-op apart from the balance queries when the payer is already funded.
pub async fn establish_payer<C: LedgerClient>(
    rpc: &C,
    payer: &Pubkey,
    signature_budget: u64,
) -> anyhow::Result<u64> {
    let required = required_payer_balance(rpc, payer, signature_budget).await?;

    let mut balance = rpc.balance(payer).await?;
    if balance < required {
        log_warning(
            "Airdrop",
            format!("{payer} holds {balance} lamports, requesting {required}"),
        );
        rpc.request_airdrop_and_confirm(payer, required).await?;
        balance = rpc.balance(payer).await?;
    }

    if balance < required {
        return Err(GmClientError::InsufficientFunds {
            payer: *payer,
            balance,
            required,
        }
        .into());
    }

    log_info(
        "Payer",
        format!(
            "Using account {payer} containing {} SOL to pay for fees",
            balance as f64 / LAMPORTS_PER_SOL as f64
        ),
    );

    Ok(balance)
}
