use solana_sdk::signature::{
    Keypair,
    Signature,
};

use crate::{
    error::GmClientError,
    greeting::{
        GreetingAccount,
        GREETING_NAME,
    },
    instructions::greet,
    ledger::LedgerClient,
    logs::{
        log_info,
        log_success,
    },
    program::GreetingTarget,
};

/// Writes a greeting from [`GREETING_NAME`] into the target's greeting account.
pub async fn say_hello<C: LedgerClient>(
    rpc: &C,
    payer: &Keypair,
    target: &GreetingTarget,
) -> anyhow::Result<Signature> {
    log_info("Saying hello to", target.greeting_pubkey);
    let instruction = greet(
        &target.program_id,
        &target.greeting_pubkey,
        &GreetingAccount::new(GREETING_NAME),
    )?;
    rpc.send_and_confirm(payer, &[instruction]).await
}

/// Reads the greeting stored in the target's greeting account.
pub async fn report_greeting<C: LedgerClient>(
    rpc: &C,
    target: &GreetingTarget,
) -> anyhow::Result<GreetingAccount> {
    let address = target.greeting_pubkey;
    let account = rpc
        .account(&address)
        .await?
        .ok_or(GmClientError::GreetingAccountNotFound(address))?;

    let greeting = GreetingAccount::from_bytes(&account.data).map_err(|e| {
        GmClientError::InvalidGreetingData {
            address,
            reason: e.to_string(),
        }
    })?;
    log_success(
        "Greeting",
        format!("{address} has been greeted by {}", greeting.name),
    );

    Ok(greeting)
}
