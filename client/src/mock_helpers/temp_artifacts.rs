use solana_sdk::{
    pubkey::Pubkey,
    signature::{
        write_keypair_file,
        Keypair,
        Signer,
    },
};
use tempfile::TempDir;

use crate::program::ProgramArtifacts;

/// Program build artifacts written to a fresh temporary directory, removed on drop.
pub struct TempArtifacts {
    pub artifacts: ProgramArtifacts,
    pub program_id: Pubkey,
    dir: TempDir,
}

impl TempArtifacts {
    /// Writes a program keypair, plus a placeholder program binary if `built`.
    pub fn new(built: bool) -> anyhow::Result<Self> {
        let dir = tempfile::Builder::new().prefix("gm-client-").tempdir()?;
        let program = Keypair::new();

        let artifacts = ProgramArtifacts {
            keypair_path: dir.path().join("gm_program-keypair.json"),
            so_path: dir.path().join("gm_program.so"),
        };
        write_keypair_file(&program, &artifacts.keypair_path)
            .map_err(|e| anyhow::anyhow!("Couldn't write program keypair: {e}"))?;
        if built {
            std::fs::write(&artifacts.so_path, b"\x7fELF")?;
        }

        Ok(Self {
            artifacts,
            program_id: program.pubkey(),
            dir,
        })
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}
