use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{HubConfig, HubStats, PeriodDraw, ProductWinners};

#[cw_serde]
pub struct InstantiateMsg {
    pub registry: String,
    /// How long a claimed draw may stay unfinished before anyone can
    /// expire it (seconds)
    pub finalize_deadline_seconds: u64,
    /// How far after the claim the target beacon round lands (seconds)
    pub round_lookahead_seconds: u64,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub beacon_pubkey_hex: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Claim the draw for a closed period. Anyone can call. The first claim
    /// wins; while the draw is running or done, later claims are no-ops.
    BeginDraw { period: String },
    /// Finalize a claimed draw with the target round's beacon signature.
    /// Draws and persists every product's winners in this one transaction.
    FinalizeDraw {
        period: String,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Mark a draw that missed its finalize deadline as failed. Anyone can
    /// call. A failed draw can be claimed again with BeginDraw.
    ExpireDraw { period: String },
    /// Update configuration. Admin only.
    UpdateConfig {
        registry: Option<String>,
        finalize_deadline_seconds: Option<u64>,
        round_lookahead_seconds: Option<u64>,
    },
}

/// Query message for the club registry contract.
#[cw_serde]
pub enum RegistryQueryMsg {
    Period {
        period: String,
    },
    PeriodProducts {
        period: String,
    },
    Directory {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(HubConfig)]
    Config {},

    /// Draw record for a period, or null when nothing was claimed yet.
    /// Clients poll this while a draw is in Processing.
    #[returns(Option<PeriodDraw>)]
    DrawStatus { period: String },

    /// Full assignment of a finished draw, products in announcement order.
    #[returns(DrawResultResponse)]
    DrawResult { period: String },

    #[returns(ProductWinners)]
    ProductWinners { period: String, product_index: u32 },

    #[returns(UserWinsResponse)]
    UserWins {
        address: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(HubStats)]
    Stats {},

    #[returns(DrawHistoryResponse)]
    DrawHistory {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct DrawResultResponse {
    pub draw: PeriodDraw,
    /// One entry per product, ordered costliest first
    pub products: Vec<ProductWinners>,
}

#[cw_serde]
pub struct UserWinsResponse {
    pub address: String,
    pub total_wins: u32,
    pub periods: Vec<PeriodWins>,
}

#[cw_serde]
pub struct PeriodWins {
    pub period: String,
    pub product_index: u32,
}

#[cw_serde]
pub struct DrawHistoryResponse {
    pub draws: Vec<PeriodDraw>,
}

#[cw_serde]
pub struct MigrateMsg {}
