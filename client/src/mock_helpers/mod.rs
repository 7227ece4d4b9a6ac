//! Test doubles for running the greeting pipeline without a cluster.

mod in_memory_ledger;
mod temp_artifacts;

pub use in_memory_ledger::*;
pub use temp_artifacts::*;
