use cosmwasm_schema::{cw_serde, QueryResponses};
use ttorang_common::allocator::ProductDraw;
use ttorang_common::types::{DirectoryEntry, MembershipTier};

use crate::state::{MemberInfo, PeriodInfo, Product, RegistryConfig};

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Enroll a new club member. Operator only.
    EnrollMember {
        address: String,
        name: String,
        tier: MembershipTier,
    },
    /// Change a member's tier. Operator only.
    SetMemberTier {
        address: String,
        tier: MembershipTier,
    },
    /// Activate or deactivate a member. Operator only.
    SetMemberActive { address: String, active: bool },
    /// Credit pins to members, e.g. after a monthly ranking. Operator only.
    AwardPins {
        grants: Vec<PinGrant>,
        memo: Option<String>,
    },
    /// Open a draw period with its initial product list. Operator only.
    OpenPeriod {
        period: String,
        products: Vec<ProductInit>,
    },
    /// Append a product to a period that is still open. Operator only.
    AddProduct {
        period: String,
        product: ProductInit,
    },
    /// Close a period's registration window. Operator only.
    CloseRegistration { period: String },
    /// Enter a product's raffle, spending its pin cost. Active members only.
    Register { period: String, product_index: u32 },
    /// Withdraw a registration and get the pins back, while the period is
    /// still open.
    CancelRegistration { period: String, product_index: u32 },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        operator: Option<String>,
    },
}

#[cw_serde]
pub struct PinGrant {
    pub address: String,
    pub amount: u32,
}

#[cw_serde]
pub struct ProductInit {
    pub name: String,
    pub required_pins: u32,
    pub winner_count: u32,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RegistryConfig)]
    Config {},
    #[returns(MemberResponse)]
    Member { address: String },
    #[returns(MembersResponse)]
    Members {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(Option<PeriodInfo>)]
    Period { period: String },
    #[returns(PeriodsResponse)]
    Periods {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(Vec<Product>)]
    Products { period: String },
    #[returns(RegistrantsResponse)]
    Registrants { period: String, product_index: u32 },
    #[returns(Vec<u32>)]
    MemberEntries { period: String, address: String },
    /// Page through all active members, for the supplemental-fill pool.
    #[returns(DirectoryResponse)]
    Directory {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Directory entries for specific addresses, in the given order.
    /// Unknown or inactive addresses are silently omitted.
    #[returns(DirectoryResponse)]
    DirectoryEntries { addresses: Vec<String> },
    /// Every product of a period in draw-ready shape, registrants included.
    #[returns(PeriodProductsResponse)]
    PeriodProducts { period: String },
}

#[cw_serde]
pub struct MemberResponse {
    pub address: String,
    pub member: MemberInfo,
}

#[cw_serde]
pub struct MembersResponse {
    pub members: Vec<MemberResponse>,
}

#[cw_serde]
pub struct PeriodEntry {
    pub period: String,
    pub info: PeriodInfo,
}

#[cw_serde]
pub struct PeriodsResponse {
    pub periods: Vec<PeriodEntry>,
}

#[cw_serde]
pub struct RegistrantsResponse {
    pub registrants: Vec<String>,
}

#[cw_serde]
pub struct DirectoryResponse {
    pub entries: Vec<DirectoryEntry>,
}

#[cw_serde]
pub struct PeriodProductsResponse {
    pub products: Vec<ProductDraw>,
}
