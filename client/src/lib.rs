//! Client for the GM program: funds a payer, makes sure the payer's greeting account exists,
//! greets it and reads the greeting back.
//!
//! [`pipeline::run`] runs the whole flow against any [`ledger::LedgerClient`].

pub mod address;
pub mod config;
pub mod connection;
pub mod error;
pub mod greet;
pub mod greeting;
pub mod instructions;
pub mod ledger;
pub mod logs;
pub mod mock_helpers;
pub mod payer;
pub mod pipeline;
pub mod program;
pub mod transactions;

pub use error::GmClientError;
pub use logs::LogColor;
