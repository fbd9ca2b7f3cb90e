use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::query;
use crate::state::{RegistryConfig, CONFIG};

const CONTRACT_NAME: &str = "crates.io:ttorang-club-registry";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = RegistryConfig {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "club-registry")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::EnrollMember {
            address,
            name,
            tier,
        } => execute::enroll_member(deps, env, info, address, name, tier),
        ExecuteMsg::SetMemberTier { address, tier } => {
            execute::set_member_tier(deps, env, info, address, tier)
        }
        ExecuteMsg::SetMemberActive { address, active } => {
            execute::set_member_active(deps, env, info, address, active)
        }
        ExecuteMsg::AwardPins { grants, memo } => {
            execute::award_pins(deps, env, info, grants, memo)
        }
        ExecuteMsg::OpenPeriod { period, products } => {
            execute::open_period(deps, env, info, period, products)
        }
        ExecuteMsg::AddProduct { period, product } => {
            execute::add_product(deps, env, info, period, product)
        }
        ExecuteMsg::CloseRegistration { period } => {
            execute::close_registration(deps, env, info, period)
        }
        ExecuteMsg::Register {
            period,
            product_index,
        } => execute::register(deps, env, info, period, product_index),
        ExecuteMsg::CancelRegistration {
            period,
            product_index,
        } => execute::cancel_registration(deps, env, info, period, product_index),
        ExecuteMsg::UpdateConfig { admin, operator } => {
            execute::update_config(deps, env, info, admin, operator)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Member { address } => query::query_member(deps, address),
        QueryMsg::Members { start_after, limit } => query::query_members(deps, start_after, limit),
        QueryMsg::Period { period } => query::query_period(deps, period),
        QueryMsg::Periods { start_after, limit } => query::query_periods(deps, start_after, limit),
        QueryMsg::Products { period } => query::query_products(deps, period),
        QueryMsg::Registrants {
            period,
            product_index,
        } => query::query_registrants(deps, period, product_index),
        QueryMsg::MemberEntries { period, address } => {
            query::query_member_entries(deps, period, address)
        }
        QueryMsg::Directory { start_after, limit } => {
            query::query_directory(deps, start_after, limit)
        }
        QueryMsg::DirectoryEntries { addresses } => query::query_directory_entries(deps, addresses),
        QueryMsg::PeriodProducts { period } => query::query_period_products(deps, period),
    }
}
