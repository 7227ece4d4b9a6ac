//! Runs the greeting steps in order, one after the other, stopping at the first failure.

use colored::Colorize;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};
use strum_macros::Display;

use crate::{
    connection::establish_connection,
    greet::{
        report_greeting,
        say_hello,
    },
    greeting::GreetingAccount,
    ledger::LedgerClient,
    logs::LogColor,
    payer::{
        establish_payer,
        DEFAULT_SIGNATURE_BUDGET,
    },
    program::{
        check_program,
        GreetingTarget,
        ProgramArtifacts,
    },
};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE")]
pub enum Stage {
    Init,
    Connected,
    Funded,
    AccountReady,
    Written,
    Reported,
}

#[derive(Clone, Debug)]
pub struct PipelineSettings {
    /// Shown when logging the connection.
    pub url: String,
    pub program: ProgramArtifacts,
    /// Number of future signatures the payer must be able to pay for.
    pub signature_budget: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            url: crate::transactions::DEFAULT_RPC_URL.to_string(),
            program: ProgramArtifacts::default(),
            signature_budget: DEFAULT_SIGNATURE_BUDGET,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreetingReport {
    pub target: GreetingTarget,
    pub signature: Signature,
    pub greeting: GreetingAccount,
}

/// State shared by the pipeline steps. Each step requires the previous one to have completed.
pub struct GreeterContext<'a, C> {
    rpc: &'a C,
    payer: Keypair,
    settings: &'a PipelineSettings,
    stage: Stage,
    target: Option<GreetingTarget>,
}

impl<'a, C: LedgerClient> GreeterContext<'a, C> {
    pub fn new(rpc: &'a C, payer: Keypair, settings: &'a PipelineSettings) -> Self {
        Self {
            rpc,
            payer,
            settings,
            stage: Stage::Init,
            target: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn payer(&self) -> &Keypair {
        &self.payer
    }

    pub fn target(&self) -> Option<&GreetingTarget> {
        self.target.as_ref()
    }

    fn require_stage(&self, expected: Stage) -> anyhow::Result<()> {
        if self.stage != expected {
            anyhow::bail!("Expected the {expected} stage, the greeter is at {}", self.stage);
        }
        Ok(())
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        println!("{}", format!("==> {stage}").color(LogColor::Header));
    }

    fn require_target(&self) -> anyhow::Result<GreetingTarget> {
        self.target
            .ok_or_else(|| anyhow::anyhow!("The greeting account hasn't been prepared"))
    }

    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.require_stage(Stage::Init)?;
        establish_connection(self.rpc, &self.settings.url).await?;
        self.enter(Stage::Connected);
        Ok(())
    }

    pub async fn fund(&mut self) -> anyhow::Result<u64> {
        self.require_stage(Stage::Connected)?;
        let balance =
            establish_payer(self.rpc, &self.payer.pubkey(), self.settings.signature_budget)
                .await?;
        self.enter(Stage::Funded);
        Ok(balance)
    }

    pub async fn prepare_account(&mut self) -> anyhow::Result<GreetingTarget> {
        self.require_stage(Stage::Funded)?;
        let target = check_program(self.rpc, &self.payer, &self.settings.program).await?;
        self.target = Some(target);
        self.enter(Stage::AccountReady);
        Ok(target)
    }

    pub async fn write(&mut self) -> anyhow::Result<Signature> {
        self.require_stage(Stage::AccountReady)?;
        let target = self.require_target()?;
        let signature = say_hello(self.rpc, &self.payer, &target).await?;
        self.enter(Stage::Written);
        Ok(signature)
    }

    pub async fn report(&mut self) -> anyhow::Result<GreetingAccount> {
        self.require_stage(Stage::Written)?;
        let target = self.require_target()?;
        let greeting = report_greeting(self.rpc, &target).await?;
        self.enter(Stage::Reported);
        Ok(greeting)
    }

    /// Runs every step, starting from [`Stage::Init`].
    pub async fn run(mut self) -> anyhow::Result<GreetingReport> {
        self.require_stage(Stage::Init)?;
        self.connect().await?;
        self.fund().await?;
        let target = self.prepare_account().await?;
        let signature = self.write().await?;
        let greeting = self.report().await?;

        Ok(GreetingReport {
            target,
            signature,
            greeting,
        })
    }
}

/// Greets the payer's greeting account once, creating it first if needed.
pub async fn run<C: LedgerClient>(
    rpc: &C,
    payer: Keypair,
    settings: &PipelineSettings,
) -> anyhow::Result<GreetingReport> {
    GreeterContext::new(rpc, payer, settings).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_display_like_the_state_machine() {
        let names: Vec<String> = [
            Stage::Init,
            Stage::Connected,
            Stage::Funded,
            Stage::AccountReady,
            Stage::Written,
            Stage::Reported,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_eq!(
            names,
            ["INIT", "CONNECTED", "FUNDED", "ACCOUNT-READY", "WRITTEN", "REPORTED"]
        );
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Init < Stage::Connected);
        assert!(Stage::AccountReady < Stage::Written);
        assert!(Stage::Written < Stage::Reported);
    }
}
