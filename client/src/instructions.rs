//! Builders for the two instructions the client ever sends.

use solana_sdk::{
    instruction::{
        AccountMeta,
        Instruction,
    },
    pubkey::Pubkey,
};
use solana_system_interface::instruction::create_account_with_seed;

use crate::{
    address::GREETING_SEED,
    greeting::{
        GreetingAccount,
        GREETING_SIZE,
    },
};

/// Creates the greeting account at its seed-derived address, funded by and based on `payer`.
pub fn create_greeting_account(
    payer: &Pubkey,
    greeting: &Pubkey,
    program_id: &Pubkey,
    lamports: u64,
) -> Instruction {
    create_account_with_seed(
        payer,
        greeting,
        payer,
        GREETING_SEED,
        lamports,
        *GREETING_SIZE as u64,
        program_id,
    )
}

/// Asks the GM program to store `record` in `greeting`. The greeted account is the only
/// account passed: writable, not a signer.
pub fn greet(
    program_id: &Pubkey,
    greeting: &Pubkey,
    record: &GreetingAccount,
) -> anyhow::Result<Instruction> {
    Ok(Instruction::new_with_bytes(
        *program_id,
        &record.to_bytes()?,
        vec![AccountMeta::new(*greeting, false)],
    ))
}
