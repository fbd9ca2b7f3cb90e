use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("member {address} not found")]
    MemberNotFound { address: String },

    #[error("member {address} already enrolled")]
    MemberAlreadyEnrolled { address: String },

    #[error("member {address} is inactive")]
    MemberInactive { address: String },

    #[error("invalid period key: {reason}")]
    InvalidPeriodKey { reason: String },

    #[error("period {period} not found")]
    PeriodNotFound { period: String },

    #[error("period {period} already exists")]
    PeriodAlreadyExists { period: String },

    #[error("registration for period {period} is closed")]
    RegistrationClosed { period: String },

    #[error("product {product_index} not found in period {period}")]
    ProductNotFound {
        period: String,
        product_index: u32,
    },

    #[error("product {name} must offer at least one prize")]
    InvalidWinnerCount { name: String },

    #[error("already registered for product {product_index} in period {period}")]
    AlreadyRegistered {
        period: String,
        product_index: u32,
    },

    #[error("not registered for product {product_index} in period {period}")]
    NotRegistered {
        period: String,
        product_index: u32,
    },

    #[error("not enough pins: need {required}, have {available}")]
    InsufficientPins { required: u32, available: u32 },
}
