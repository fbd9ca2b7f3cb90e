use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("period {period} not found in the registry")]
    PeriodNotFound { period: String },

    #[error("registration for period {period} is still open")]
    RegistrationStillOpen { period: String },

    #[error("no draw claimed for period {period}")]
    DrawNotFound { period: String },

    #[error("draw for period {period} is not in Processing phase")]
    DrawNotProcessing { period: String },

    #[error("draw for period {period} missed its deadline (deadline: {deadline})")]
    DeadlinePassed { period: String, deadline: u64 },

    #[error("draw for period {period} is still inside its deadline (deadline: {deadline})")]
    DeadlineNotPassed { period: String, deadline: u64 },

    #[error("beacon round {round} is not published yet")]
    RoundNotReached { round: u64 },

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("finalize deadline must be {min}..={max} seconds, got {got}")]
    InvalidFinalizeDeadline { min: u64, max: u64, got: u64 },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("beacon period_seconds must be positive")]
    InvalidBeaconPeriod,

    #[error("round lookahead must cover at least one beacon period ({min} seconds), got {got}")]
    InvalidLookahead { min: u64, got: u64 },
}
