use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};
use ttorang_common::allocator::ProductDraw;
use ttorang_common::types::{DirectoryEntry, DrawPhase};

pub const CONFIG: Item<HubConfig> = Item::new("config");
pub const PERIOD_DRAWS: Map<&str, PeriodDraw> = Map::new("period_draws");
pub const PRODUCT_WINNERS: Map<(&str, u32), ProductWinners> = Map::new("product_winners");
pub const STATS: Item<HubStats> = Item::new("stats");

/// Per-user win tracking: the product index won in each period. Cross
/// product exclusion means at most one win per member per period.
pub const USER_WINS: Map<(&Addr, &str), u32> = Map::new("user_wins");
pub const USER_WIN_COUNT: Map<&Addr, u32> = Map::new("user_win_count");

#[cw_serde]
pub struct HubConfig {
    pub admin: Addr,
    /// Club registry queried for products, registrants and the directory
    pub registry: Addr,
    /// How long a claimed draw may stay in Processing before anyone can
    /// expire it (seconds)
    pub finalize_deadline_seconds: u64,
    /// How far after the claim the target beacon round lands (seconds)
    pub round_lookahead_seconds: u64,
    /// Quicknet public key, 96 bytes (G2 point)
    pub beacon_pubkey: Vec<u8>,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
}

#[cw_serde]
pub struct PeriodDraw {
    pub period: String,
    pub phase: DrawPhase,
    /// True once every product's winners are persisted
    pub winners_ready: bool,
    pub started_at: Timestamp,
    pub started_by: Addr,
    /// Beacon round whose signature finalizes this draw
    pub target_round: u64,
    pub finalize_deadline: Timestamp,
    /// Claim attempt, starting at 1. Bumps when a failed draw is re-claimed.
    pub attempt: u32,
    /// Product indexes in announcement order, costliest first
    pub draw_order: Vec<u32>,
    /// Hex-encoded randomness the winners were drawn from
    pub seed: Option<String>,
    pub generated_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
}

#[cw_serde]
pub struct ProductWinners {
    pub index: u32,
    pub required_pins: u32,
    pub winner_count: u32,
    /// Every winner of this product: primary picks first, supplement
    /// picks appended after them
    pub winners: Vec<Addr>,
    /// The subset of `winners` drawn from the directory to fill leftover
    /// slots, kept apart so clients can mark them
    pub supplement: Vec<Addr>,
}

#[cw_serde]
pub struct HubStats {
    pub draws_completed: u64,
    pub draws_failed: u64,
    pub winners_assigned: u64,
    pub supplement_assigned: u64,
}

/// Response type for querying a period from the club registry.
/// Mirrors the PeriodInfo struct from the registry contract.
#[cw_serde]
pub struct PeriodInfoResponse {
    pub registration_open: bool,
    pub opened_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    pub product_count: u32,
}

/// Mirrors the PeriodProductsResponse struct from the registry contract.
#[cw_serde]
pub struct PeriodProductsResponse {
    pub products: Vec<ProductDraw>,
}

/// Mirrors the DirectoryResponse struct from the registry contract.
#[cw_serde]
pub struct DirectoryResponse {
    pub entries: Vec<DirectoryEntry>,
}
