use clap::Parser;
use gm_client::{
    config::{
        load_cli_config,
        Cli,
        GreeterConfig,
        PayerSource,
    },
    logs::{
        log_divider,
        log_error,
        log_info,
        log_success,
    },
    payer::load_payer,
    pipeline,
    print_kv,
    transactions::GmRpcClient,
    LogColor,
};
use solana_sdk::signature::{
    Keypair,
    Signer,
};

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cli_config = load_cli_config(cli.config.as_deref());
    let config = GreeterConfig::resolve(cli, cli_config.as_ref())?;

    let payer = match &config.payer {
        PayerSource::KeypairFile(path) => load_payer(path)?,
        PayerSource::Ephemeral => {
            let payer = Keypair::new();
            log_info("Ephemeral payer", payer.pubkey());
            payer
        }
    };

    let rpc = GmRpcClient::new(
        Some(config.rpc_url.clone()),
        config.commitment,
        Some(config.send_transaction_config()),
    );

    log_divider();
    let report = pipeline::run(&rpc, payer, &config.pipeline_settings()).await?;

    log_divider();
    print_kv!("Program", report.target.program_id);
    print_kv!("Greeting account", report.target.greeting_pubkey);
    print_kv!("Signature", report.signature);
    print_kv!("Greeted by", report.greeting.name, LogColor::Highlight);

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => log_success("Success", "Greeting complete"),
        Err(e) => {
            log_error("Error", format!("{e:#}"));
            std::process::exit(1);
        }
    }
}
