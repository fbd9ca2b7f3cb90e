use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{HubConfig, HubStats, CONFIG, STATS};

const CONTRACT_NAME: &str = "crates.io:ttorang-draw-hub";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_finalize_deadline(msg.finalize_deadline_seconds)?;

    let beacon_pubkey =
        hex::decode(&msg.beacon_pubkey_hex).map_err(|_| ContractError::InvalidHex {
            field: "beacon_pubkey_hex".to_string(),
        })?;
    if beacon_pubkey.len() != 96 {
        return Err(ContractError::InvalidPubkeyLength {
            got: beacon_pubkey.len(),
        });
    }
    if msg.period_seconds == 0 {
        return Err(ContractError::InvalidBeaconPeriod);
    }
    if msg.round_lookahead_seconds < msg.period_seconds {
        return Err(ContractError::InvalidLookahead {
            min: msg.period_seconds,
            got: msg.round_lookahead_seconds,
        });
    }

    let config = HubConfig {
        admin: info.sender.clone(),
        registry: deps.api.addr_validate(&msg.registry)?,
        finalize_deadline_seconds: msg.finalize_deadline_seconds,
        round_lookahead_seconds: msg.round_lookahead_seconds,
        beacon_pubkey,
        genesis_time: msg.genesis_time,
        period_seconds: msg.period_seconds,
    };
    CONFIG.save(deps.storage, &config)?;

    let stats = HubStats {
        draws_completed: 0,
        draws_failed: 0,
        winners_assigned: 0,
        supplement_assigned: 0,
    };
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "draw-hub")
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
        ExecuteMsg::BeginDraw { period } => execute::begin_draw(deps, env, info, period),
        ExecuteMsg::FinalizeDraw {
            period,
            signature_hex,
        } => execute::finalize_draw(deps, env, info, period, signature_hex),
        ExecuteMsg::ExpireDraw { period } => execute::expire_draw(deps, env, info, period),
        ExecuteMsg::UpdateConfig {
            registry,
            finalize_deadline_seconds,
            round_lookahead_seconds,
        } => execute::update_config(
            deps,
            env,
            info,
            registry,
            finalize_deadline_seconds,
            round_lookahead_seconds,
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::DrawStatus { period } => query::query_draw_status(deps, period),
        QueryMsg::DrawResult { period } => query::query_draw_result(deps, period),
        QueryMsg::ProductWinners {
            period,
            product_index,
        } => query::query_product_winners(deps, period, product_index),
        QueryMsg::UserWins {
            address,
            start_after,
            limit,
        } => query::query_user_wins(deps, address, start_after, limit),
        QueryMsg::Stats {} => query::query_stats(deps),
        QueryMsg::DrawHistory { start_after, limit } => {
            query::query_draw_history(deps, start_after, limit)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
