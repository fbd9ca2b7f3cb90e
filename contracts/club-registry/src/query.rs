use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;
use ttorang_common::allocator::ProductDraw;
use ttorang_common::types::DirectoryEntry;

use crate::msg::{
    DirectoryResponse, MemberResponse, MembersResponse, PeriodEntry, PeriodProductsResponse,
    PeriodsResponse, RegistrantsResponse,
};
use crate::state::{CONFIG, MEMBERS, MEMBER_ENTRIES, PERIODS, PRODUCTS, REGISTRANTS};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// The directory backs the supplement phase of a draw, so it pages wider
/// than the browsing queries.
const DEFAULT_DIRECTORY_LIMIT: u32 = 100;
const MAX_DIRECTORY_LIMIT: u32 = 200;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_member(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let member = MEMBERS.load(deps.storage, &addr)?;
    to_json_binary(&MemberResponse { address, member })
}

pub fn query_members(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_addr = start_after
        .map(|s| deps.api.addr_validate(&s))
        .transpose()?;
    let start = start_addr.as_ref().map(Bound::exclusive);

    let members: Vec<MemberResponse> = MEMBERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(addr, member)| MemberResponse {
            address: addr.to_string(),
            member,
        })
        .collect();

    to_json_binary(&MembersResponse { members })
}

pub fn query_period(deps: Deps, period: String) -> StdResult<Binary> {
    let info = PERIODS.may_load(deps.storage, &period)?;
    to_json_binary(&info)
}

pub fn query_periods(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let periods: Vec<PeriodEntry> = PERIODS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(period, info)| PeriodEntry { period, info })
        .collect();

    to_json_binary(&PeriodsResponse { periods })
}

pub fn query_products(deps: Deps, period: String) -> StdResult<Binary> {
    let products: Vec<_> = PRODUCTS
        .prefix(period.as_str())
        .range(deps.storage, None, None, Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, product)| product)
        .collect();
    to_json_binary(&products)
}

pub fn query_registrants(deps: Deps, period: String, product_index: u32) -> StdResult<Binary> {
    let registrants = REGISTRANTS
        .may_load(deps.storage, (period.as_str(), product_index))?
        .unwrap_or_default();
    to_json_binary(&RegistrantsResponse {
        registrants: registrants.iter().map(|a| a.to_string()).collect(),
    })
}

pub fn query_member_entries(deps: Deps, period: String, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let entries = MEMBER_ENTRIES
        .may_load(deps.storage, (period.as_str(), &addr))?
        .unwrap_or_default();
    to_json_binary(&entries)
}

pub fn query_directory(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit
        .unwrap_or(DEFAULT_DIRECTORY_LIMIT)
        .min(MAX_DIRECTORY_LIMIT) as usize;
    let start_addr = start_after
        .map(|s| deps.api.addr_validate(&s))
        .transpose()?;
    let start = start_addr.as_ref().map(Bound::exclusive);

    // Filter before taking the page so a run of inactive members cannot
    // produce a short page that looks like the end of the directory.
    let entries: Vec<DirectoryEntry> = MEMBERS
        .range(deps.storage, start, None, Order::Ascending)
        .filter_map(|r| r.ok())
        .filter(|(_, member)| member.active)
        .take(limit)
        .map(|(addr, member)| DirectoryEntry {
            address: addr.to_string(),
            tier: member.tier,
        })
        .collect();

    to_json_binary(&DirectoryResponse { entries })
}

pub fn query_directory_entries(deps: Deps, addresses: Vec<String>) -> StdResult<Binary> {
    let mut entries: Vec<DirectoryEntry> = Vec::with_capacity(addresses.len());
    for address in addresses {
        let addr = deps.api.addr_validate(&address)?;
        if let Some(member) = MEMBERS.may_load(deps.storage, &addr)? {
            if member.active {
                entries.push(DirectoryEntry {
                    address,
                    tier: member.tier,
                });
            }
        }
    }
    to_json_binary(&DirectoryResponse { entries })
}

pub fn query_period_products(deps: Deps, period: String) -> StdResult<Binary> {
    let indexed: Vec<_> = PRODUCTS
        .prefix(period.as_str())
        .range(deps.storage, None, None, Order::Ascending)
        .filter_map(|r| r.ok())
        .collect();

    let mut products: Vec<ProductDraw> = Vec::with_capacity(indexed.len());
    for (index, product) in indexed {
        let registrants = REGISTRANTS
            .may_load(deps.storage, (period.as_str(), index))?
            .unwrap_or_default();
        products.push(ProductDraw {
            index,
            required_pins: product.required_pins,
            winner_count: product.winner_count,
            registrants: registrants.iter().map(|a| a.to_string()).collect(),
        });
    }

    to_json_binary(&PeriodProductsResponse { products })
}
