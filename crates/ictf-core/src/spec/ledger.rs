use crate::spec::prelude::*;

/// ICP ledger canister on mainnet.
pub const LEDGER_CANISTER_ID: Principal =
    Principal::from_slice(&[0, 0, 0, 0, 0, 0, 0, 2, 1, 1]);

pub const TRANSFER: &str = "transfer";

/// Transfer fee charged by the ICP ledger.
pub const TRANSFER_FEE_E8S: u64 = 10_000;

///
/// Tokens
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub struct Tokens {
    pub e8s: u64,
}

///
/// TransferArgs
///

#[derive(CandidType, Clone, Debug, Deserialize)]
pub struct TransferArgs {
    pub memo: u64,
    pub amount: Tokens,
    pub fee: Tokens,
    pub from_subaccount: Option<ByteBuf>,
    pub to: ByteBuf,
}

///
/// TransferError
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq)]
pub enum TransferError {
    BadFee { expected_fee: Tokens },
    InsufficientFunds { balance: Tokens },
    TxTooOld { allowed_window_nanos: u64 },
    TxCreatedInFuture,
    TxDuplicate { duplicate_of: u64 },
}

pub type TransferResult = Result<u64, TransferError>;
