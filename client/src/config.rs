//! Resolves the client's settings from command-line flags, the environment and the Solana CLI
//! config file, in that order of precedence.

use std::path::{
    Path,
    PathBuf,
};

use clap::Parser;
use solana_commitment_config::{
    CommitmentConfig,
    CommitmentLevel,
};

use crate::{
    logs::log_warning,
    payer::DEFAULT_SIGNATURE_BUDGET,
    pipeline::PipelineSettings,
    program::{
        ProgramArtifacts,
        DEFAULT_PROGRAM_KEYPAIR_PATH,
        DEFAULT_PROGRAM_SO_PATH,
    },
    transactions::{
        SendTransactionConfig,
        DEFAULT_RPC_URL,
    },
};

#[derive(Debug, Parser)]
#[command(name = "gm-client", version, about = "Greets an account through the GM program")]
pub struct Cli {
    /// Solana CLI config file. Defaults to the Solana CLI's own config file.
    #[arg(long, short = 'C', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON RPC URL of the cluster.
    #[arg(long, short = 'u', env = "GM_RPC_URL")]
    pub url: Option<String>,

    /// Keypair file of the account paying for rent and fees.
    #[arg(long, short = 'k', env = "GM_PAYER_KEYPAIR", value_name = "PATH")]
    pub keypair: Option<PathBuf>,

    /// Generate and fund a new payer instead of loading one.
    #[arg(long, conflicts_with = "keypair")]
    pub ephemeral_payer: bool,

    /// Commitment level used for queries and confirmations.
    #[arg(long)]
    pub commitment: Option<String>,

    /// Deployment keypair of the GM program.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROGRAM_KEYPAIR_PATH)]
    pub program_keypair: PathBuf,

    /// Built GM program binary.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROGRAM_SO_PATH)]
    pub program_so: PathBuf,

    /// Number of future signatures the payer must be funded for.
    #[arg(long, default_value_t = DEFAULT_SIGNATURE_BUDGET)]
    pub signature_budget: u64,

    /// Prepend compute budget instructions with this unit limit.
    #[arg(long)]
    pub compute_unit_limit: Option<u32>,

    /// Don't print program logs after each transaction.
    #[arg(long)]
    pub no_program_logs: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayerSource {
    KeypairFile(PathBuf),
    Ephemeral,
}

#[derive(Clone, Debug)]
pub struct GreeterConfig {
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    pub payer: PayerSource,
    pub program: ProgramArtifacts,
    pub signature_budget: u64,
    pub compute_unit_limit: Option<u32>,
    pub program_logs: bool,
}

/// Loads the Solana CLI config from `path`, or from the CLI's default location. Returns `None`
/// if there's no readable config file.
pub fn load_cli_config(path: Option<&Path>) -> Option<solana_cli_config::Config> {
    let path = match path {
        Some(path) => path.to_string_lossy().into_owned(),
        None => solana_cli_config::CONFIG_FILE.clone()?,
    };

    match solana_cli_config::Config::load(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            log_warning("Config", format!("Couldn't read {path}: {e}"));
            None
        }
    }
}

fn parse_commitment(level: &str) -> anyhow::Result<CommitmentConfig> {
    let commitment = level
        .parse::<CommitmentLevel>()
        .map_err(|_| anyhow::anyhow!("Invalid commitment level `{level}`"))?;
    Ok(CommitmentConfig { commitment })
}

impl GreeterConfig {
    /// Fills in everything the flags leave unset from `cli_config`, then from defaults.
    pub fn resolve(
        cli: Cli,
        cli_config: Option<&solana_cli_config::Config>,
    ) -> anyhow::Result<Self> {
        let rpc_url = cli
            .url
            .or_else(|| cli_config.map(|c| c.json_rpc_url.clone()))
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let commitment = match cli
            .commitment
            .or_else(|| cli_config.map(|c| c.commitment.clone()))
        {
            Some(level) if !level.is_empty() => parse_commitment(&level)?,
            _ => CommitmentConfig::confirmed(),
        };

        let payer = if cli.ephemeral_payer {
            PayerSource::Ephemeral
        } else {
            let path = cli
                .keypair
                .or_else(|| cli_config.map(|c| PathBuf::from(&c.keypair_path)))
                .unwrap_or_else(|| {
                    PathBuf::from(solana_cli_config::Config::default().keypair_path)
                });
            PayerSource::KeypairFile(path)
        };

        Ok(Self {
            rpc_url,
            commitment,
            payer,
            program: ProgramArtifacts {
                keypair_path: cli.program_keypair,
                so_path: cli.program_so,
            },
            signature_budget: cli.signature_budget,
            compute_unit_limit: cli.compute_unit_limit,
            program_logs: !cli.no_program_logs,
        })
    }

    pub fn send_transaction_config(&self) -> SendTransactionConfig {
        SendTransactionConfig {
            compute_budget: self.compute_unit_limit,
            debug_logs: Some(self.program_logs),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            url: self.rpc_url.clone(),
            program: self.program.clone(),
            signature_budget: self.signature_budget,
        }
    }
}
