//! The cluster operations the greeting pipeline depends on.
//!
//! [`crate::transactions::GmRpcClient`] implements these over JSON-RPC;
//! [`crate::mock_helpers::InMemoryLedger`] implements them in memory for tests.

use solana_account::Account;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
    },
};

#[allow(async_fn_in_trait)]
pub trait LedgerClient {
    /// The cluster's software version.
    async fn version(&self) -> anyhow::Result<String>;

    async fn balance(&self, address: &Pubkey) -> anyhow::Result<u64>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64>;

    /// The fee charged for a transaction carrying a single signature paid by `payer`.
    async fn fee_per_signature(&self, payer: &Pubkey) -> anyhow::Result<u64>;

    /// Requests `lamports` from the faucet and waits until the credit is confirmed.
    async fn request_airdrop_and_confirm(
        &self,
        to: &Pubkey,
        lamports: u64,
    ) -> anyhow::Result<Signature>;

    /// Returns `None` if no account exists at `address`.
    async fn account(&self, address: &Pubkey) -> anyhow::Result<Option<Account>>;

    /// Sends `instructions` in one transaction paid for and signed by `payer`, waiting for
    /// confirmation.
    async fn send_and_confirm(
        &self,
        payer: &Keypair,
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature>;
}
