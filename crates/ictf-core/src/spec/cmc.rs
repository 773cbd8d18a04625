use crate::spec::prelude::*;

/// Cycles minting canister on mainnet.
pub const CMC_CANISTER_ID: Principal = Principal::from_slice(&[0, 0, 0, 0, 0, 0, 0, 4, 1, 1]);

pub const GET_ICP_XDR_CONVERSION_RATE: &str = "get_icp_xdr_conversion_rate";
pub const NOTIFY_CREATE_CANISTER: &str = "notify_create_canister";

/// Ledger memo marking a transfer as payment for canister creation ("CREA").
pub const MEMO_CREATE_CANISTER: u64 = 0x4145_5243;

///
/// IcpXdrConversionRate
/// Canonical payload from the cycles minting canister describing ICP/XDR rate.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize)]
pub struct IcpXdrConversionRate {
    pub timestamp_seconds: u64,
    pub xdr_permyriad_per_icp: u64,
}

///
/// IcpXdrConversionRateResponse
/// Wrapper around the rate record returned by `get_icp_xdr_conversion_rate`.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize)]
pub struct IcpXdrConversionRateResponse {
    pub data: IcpXdrConversionRate,
}

///
/// NotifyCreateCanisterArg
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize)]
pub struct NotifyCreateCanisterArg {
    pub block_index: u64,
    pub controller: Principal,
}

///
/// NotifyError
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq)]
pub enum NotifyError {
    Refunded {
        reason: String,
        block_index: Option<u64>,
    },
    InvalidTransaction(String),
    TransactionTooOld(u64),
    Processing,
    Other {
        error_code: u64,
        error_message: String,
    },
}

pub type NotifyCreateCanisterResult = Result<Principal, NotifyError>;
