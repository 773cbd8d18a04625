//!
//! Low-level access to the Internet Computer.
//!
//! This layer is mechanical: it builds arguments, performs calls and decodes
//! replies. It performs no validation and no orchestration; context such as
//! which lifecycle step issued a call is attached one level up in `ops`.
//!

pub mod account;
pub mod agent;
pub mod client;
pub mod identity;

pub use client::{CanisterClient, InstallMode};

use crate::ThisError;
use ic_agent::AgentError;

///
/// ClientError
/// Mechanical failures returned by remote canister calls.
///

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Candid(#[from] candid::Error),

    #[error("invalid CBOR in certified state: {0}")]
    Cbor(#[from] serde_cbor::Error),

    #[error("call rejected: {0}")]
    Rejected(String),

    #[error("ledger transfer rejected: {0}")]
    LedgerRejected(String),

    #[error("cycles minting canister rejected the request: {0}")]
    CmcRejected(String),

    #[error("cycles minting canister returned a zero ICP/XDR rate")]
    ZeroConversionRate,
}
