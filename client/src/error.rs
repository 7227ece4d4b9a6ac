use std::path::PathBuf;

use solana_sdk::pubkey::Pubkey;

/// Failures the greeting pipeline reports by kind. Transport errors from the RPC client are
/// propagated as-is through [`anyhow::Error`].
#[derive(Debug, thiserror::Error)]
pub enum GmClientError {
    #[error("Failed to read payer keypair at {}: {reason}", .path.display())]
    PayerKeypairUnreadable { path: PathBuf, reason: String },

    #[error(
        "Failed to read program keypair at {} due to error: {reason}. \
         Program may need to be deployed with `solana program deploy {}`",
        .path.display(),
        .so_path.display()
    )]
    ProgramKeypairUnreadable {
        path: PathBuf,
        so_path: PathBuf,
        reason: String,
    },

    #[error(
        "Program needs to be built and deployed. Build it with `cargo build-sbf` so that \
         {} exists, then deploy it with `solana program deploy {}`",
        .so_path.display(),
        .so_path.display()
    )]
    ProgramNotBuilt { so_path: PathBuf },

    #[error(
        "Program {program_id} needs to be deployed with `solana program deploy {}`",
        .so_path.display()
    )]
    ProgramNotDeployed { program_id: Pubkey, so_path: PathBuf },

    #[error("Program {program_id} is not executable")]
    ProgramNotExecutable { program_id: Pubkey },

    #[error("Payer {payer} holds {balance} lamports, at least {required} are required")]
    InsufficientFunds {
        payer: Pubkey,
        balance: u64,
        required: u64,
    },

    #[error("Greeting account {0} not found")]
    GreetingAccountNotFound(Pubkey),

    #[error("Greeting account {address} holds invalid data: {reason}")]
    InvalidGreetingData { address: Pubkey, reason: String },
}

impl GmClientError {
    /// Whether this error means the program isn't usable on-chain yet.
    pub fn is_deployment_error(&self) -> bool {
        matches!(
            self,
            Self::ProgramNotBuilt { .. }
                | Self::ProgramNotDeployed { .. }
                | Self::ProgramNotExecutable { .. }
        )
    }
}
