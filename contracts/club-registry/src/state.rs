use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};
use ttorang_common::types::MembershipTier;

pub const CONFIG: Item<RegistryConfig> = Item::new("config");
pub const MEMBERS: Map<&Addr, MemberInfo> = Map::new("members");
pub const PERIODS: Map<&str, PeriodInfo> = Map::new("periods");
pub const PRODUCTS: Map<(&str, u32), Product> = Map::new("products");
/// Registrants of one product, in registration order.
pub const REGISTRANTS: Map<(&str, u32), Vec<Addr>> = Map::new("registrants");
/// Product indexes one member entered in a period. Kept alongside
/// REGISTRANTS so cancellations and per-member lookups don't scan every
/// product.
pub const MEMBER_ENTRIES: Map<(&str, &Addr), Vec<u32>> = Map::new("member_entries");

#[cw_serde]
pub struct RegistryConfig {
    pub admin: Addr,
    /// Club staff account that curates members, pins, and periods.
    pub operator: Addr,
}

#[cw_serde]
pub struct MemberInfo {
    pub name: String,
    pub tier: MembershipTier,
    /// Spendable pin balance, earned from monthly rankings and spent on
    /// raffle entries.
    pub pins: u32,
    /// Inactive members keep their record but drop out of the directory.
    pub active: bool,
    pub joined_at: Timestamp,
}

#[cw_serde]
pub struct PeriodInfo {
    pub registration_open: bool,
    pub opened_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    /// Also the next product index when appending.
    pub product_count: u32,
}

#[cw_serde]
pub struct Product {
    pub index: u32,
    pub name: String,
    /// Pin cost to enter this product's raffle.
    pub required_pins: u32,
    pub winner_count: u32,
    pub registrant_count: u32,
}
