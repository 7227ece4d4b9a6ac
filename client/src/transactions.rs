use anyhow::Context;
use colored::Colorize;
use solana_account::Account;
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
    },
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcTransactionConfig,
    rpc_response::RpcSimulateTransactionResult,
};
use solana_commitment_config::CommitmentConfig;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta,
    UiTransactionEncoding,
};
use solana_transaction_status_client_types::option_serializer::OptionSerializer;

use crate::{
    ledger::LedgerClient,
    logs::{
        log_error,
        log_info,
        log_success,
        log_warning,
        LogColor,
    },
};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

pub struct SendTransactionConfig {
    /// Prepends compute budget instructions with this unit limit when set.
    pub compute_budget: Option<u32>,
    /// Prints the program logs of each confirmed transaction.
    pub debug_logs: Option<bool>,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            compute_budget: Default::default(),
            debug_logs: Some(true),
        }
    }
}

pub struct GmRpcClient {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl Default for GmRpcClient {
    fn default() -> Self {
        Self::new(None, CommitmentConfig::confirmed(), None)
    }
}

impl GmRpcClient {
    pub fn new(
        url: Option<String>,
        commitment: CommitmentConfig,
        config: Option<SendTransactionConfig>,
    ) -> Self {
        let url = url.unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Self {
            client: RpcClient::new_with_commitment(url, commitment),
            config: config.unwrap_or_default(),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub async fn send_transaction(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        let bh = self
            .client
            .get_latest_blockhash()
            .await
            .context("Couldn't fetch the latest blockhash")?;

        let SendTransactionConfig {
            compute_budget,
            debug_logs,
        } = &self.config;

        let msg = Message::new(
            &[
                compute_budget.map_or(vec![], |budget| {
                    vec![
                        ComputeBudgetInstruction::set_compute_unit_limit(budget),
                        ComputeBudgetInstruction::set_compute_unit_price(1),
                    ]
                }),
                instructions.to_vec(),
            ]
            .concat(),
            Some(&payer.pubkey()),
        );

        let mut tx = Transaction::new_unsigned(msg);
        tx.try_sign(
            &[std::iter::once(payer)
                .chain(signers.iter().cloned())
                .collect::<Vec<_>>()]
            .concat(),
            bh,
        )
        .context("Couldn't sign transaction")?;

        match self.client.send_and_confirm_transaction(&tx).await {
            Ok(sig) => {
                let sender_info = format!("{}: {}", "sender".color(LogColor::Gray), payer.pubkey());
                log_success("Signature", format!("{sig}\n{sender_info}"));
                if matches!(debug_logs, Some(true)) {
                    if let Err(e) = self.print_program_logs(sig).await {
                        log_warning("Couldn't fetch program logs", format!("{e:#}"));
                    }
                }
                Ok(sig)
            }
            Err(error) => {
                let offset = compute_budget.map_or(0, |_| 2);
                log_instruction_error(&error, instructions, offset);
                log_info("Payer", payer.pubkey());

                Err(error).context("Failed transaction submission")
            }
        }
    }

    pub async fn get_transaction_json(
        &self,
        sig: Signature,
    ) -> anyhow::Result<EncodedConfirmedTransactionWithStatusMeta> {
        self.client
            .get_transaction_with_config(
                &sig,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::Json),
                    commitment: Some(self.transaction_fetch_commitment()),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await
            .context("Should be able to fetch transaction with config")
    }

    /// `getTransaction` only serves confirmed or finalized transactions.
    pub fn transaction_fetch_commitment(&self) -> CommitmentConfig {
        let commitment = self.client.commitment();
        if commitment.is_at_least_confirmed() {
            commitment
        } else {
            CommitmentConfig::confirmed()
        }
    }

    async fn print_program_logs(&self, sig: Signature) -> anyhow::Result<()> {
        let encoded = self.get_transaction_json(sig).await?;
        let logs = encoded
            .transaction
            .meta
            .map(|meta| match meta.log_messages {
                OptionSerializer::Some(logs) => logs,
                _ => vec![],
            })
            .unwrap_or_default();

        for line in logs {
            println!("  {}", line.color(LogColor::Gray));
        }
        Ok(())
    }
}

impl LedgerClient for GmRpcClient {
    async fn version(&self) -> anyhow::Result<String> {
        let version = self
            .client
            .get_version()
            .await
            .context("Couldn't fetch the cluster version")?;
        Ok(version.to_string())
    }

    async fn balance(&self, address: &Pubkey) -> anyhow::Result<u64> {
        self.client
            .get_balance(address)
            .await
            .with_context(|| format!("Couldn't retrieve the balance of {address}"))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .context("Couldn't fetch the rent exemption minimum")
    }

    async fn fee_per_signature(&self, payer: &Pubkey) -> anyhow::Result<u64> {
        let bh = self
            .client
            .get_latest_blockhash()
            .await
            .context("Couldn't fetch the latest blockhash")?;
        let message = Message::new_with_blockhash(&[], Some(payer), &bh);
        self.client
            .get_fee_for_message(&message)
            .await
            .context("Couldn't fetch the fee for a single signature")
    }

    async fn request_airdrop_and_confirm(
        &self,
        to: &Pubkey,
        lamports: u64,
    ) -> anyhow::Result<Signature> {
        let airdrop_signature = self
            .client
            .request_airdrop(to, lamports)
            .await
            .context("Failed to request airdrop")?;

        self.client
            .poll_for_signature_with_commitment(&airdrop_signature, self.client.commitment())
            .await
            .context("Couldn't confirm airdrop")?;

        Ok(airdrop_signature)
    }

    async fn account(&self, address: &Pubkey) -> anyhow::Result<Option<Account>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .with_context(|| format!("Couldn't fetch account {address}"))?;
        Ok(response.value)
    }

    async fn send_and_confirm(
        &self,
        payer: &Keypair,
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        self.send_transaction(payer, &[], instructions).await
    }
}

/// Logs which of `instructions` failed preflight and why. `offset` is the number of
/// instructions prepended to `instructions` in the submitted transaction.
pub fn log_instruction_error(error: &ClientError, instructions: &[Instruction], offset: usize) {
    use solana_client::rpc_request::{
        RpcError::RpcResponseError,
        RpcResponseErrorData,
    };
    use solana_instruction_error::InstructionError;
    use solana_transaction_error::TransactionError;

    let kind = error.kind();
    if let ClientErrorKind::RpcError(RpcResponseError {
        data:
            RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
                err: Some(ui_err),
                ..
            }),
        ..
    }) = kind
    {
        if let TransactionError::InstructionError(ixn_idx, ixn_error) = ui_err.clone().into() {
            let Some(instruction) = (ixn_idx as usize)
                .checked_sub(offset)
                .and_then(|idx| instructions.get(idx))
            else {
                log_error("Compute budget error", ixn_error);
                return;
            };

            let program = instruction.program_id;
            match ixn_error {
                InstructionError::Custom(code) => {
                    log_error("Program error", format!("({program}, custom error {code})"))
                }
                other => log_error("Instruction error", format!("({program}, {other})")),
            }
            return;
        }
    }
    log_error("Transaction error", error);
}
