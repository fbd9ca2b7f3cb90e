use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{DrawHistoryResponse, DrawResultResponse, PeriodWins, UserWinsResponse};
use crate::state::{CONFIG, PERIOD_DRAWS, PRODUCT_WINNERS, STATS, USER_WINS, USER_WIN_COUNT};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_draw_status(deps: Deps, period: String) -> StdResult<Binary> {
    let draw = PERIOD_DRAWS.may_load(deps.storage, &period)?;
    to_json_binary(&draw)
}

pub fn query_draw_result(deps: Deps, period: String) -> StdResult<Binary> {
    let draw = PERIOD_DRAWS.load(deps.storage, &period)?;

    let mut products = Vec::with_capacity(draw.draw_order.len());
    for index in &draw.draw_order {
        if let Some(record) = PRODUCT_WINNERS.may_load(deps.storage, (period.as_str(), *index))? {
            products.push(record);
        }
    }

    to_json_binary(&DrawResultResponse { draw, products })
}

pub fn query_product_winners(deps: Deps, period: String, product_index: u32) -> StdResult<Binary> {
    let record = PRODUCT_WINNERS.load(deps.storage, (period.as_str(), product_index))?;
    to_json_binary(&record)
}

pub fn query_user_wins(
    deps: Deps,
    address: String,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let periods: Vec<PeriodWins> = USER_WINS
        .prefix(&addr)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(period, product_index)| PeriodWins {
            period,
            product_index,
        })
        .collect();

    let total_wins = USER_WIN_COUNT.may_load(deps.storage, &addr)?.unwrap_or(0);

    to_json_binary(&UserWinsResponse {
        address,
        total_wins,
        periods,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<Binary> {
    let stats = STATS.load(deps.storage)?;
    to_json_binary(&stats)
}

pub fn query_draw_history(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let draws: Vec<_> = PERIOD_DRAWS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, draw)| draw)
        .collect();

    to_json_binary(&DrawHistoryResponse { draws })
}
