use crate::{
    ledger::LedgerClient,
    logs::log_info,
};

/// Confirms the cluster behind `rpc` answers by fetching and logging its version.
pub async fn establish_connection<C: LedgerClient>(rpc: &C, url: &str) -> anyhow::Result<String> {
    let version = rpc.version().await?;
    log_info(
        "Connection to cluster established",
        format!("{url} {version}"),
    );
    Ok(version)
}
