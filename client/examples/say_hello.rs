//! Greets with a fresh payer on a local test validator, using the default program artifacts.

use gm_client::{
    pipeline::{
        self,
        PipelineSettings,
    },
    transactions::GmRpcClient,
};
use solana_sdk::signature::Keypair;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let rpc = GmRpcClient::default();
    let report = pipeline::run(&rpc, Keypair::new(), &PipelineSettings::default()).await?;

    println!(
        "{} has been greeted by {}",
        report.target.greeting_pubkey, report.greeting.name
    );

    Ok(())
}
