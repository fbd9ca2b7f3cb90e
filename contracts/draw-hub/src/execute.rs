use cosmwasm_std::{
    to_json_binary, Addr, Api, DepsMut, Env, Event, MessageInfo, QueryRequest, Response,
    Timestamp, WasmQuery,
};
use ttorang_common::allocator::{
    allocate_primary, allocate_supplement, display_order, CandidateDirectory, CandidateProfile,
    TicketStream,
};
use ttorang_common::types::DrawPhase;

use crate::beacon;
use crate::error::ContractError;
use crate::msg::RegistryQueryMsg;
use crate::state::{
    DirectoryResponse, PeriodDraw, PeriodInfoResponse, PeriodProductsResponse, ProductWinners,
    CONFIG, PERIOD_DRAWS, PRODUCT_WINNERS, STATS, USER_WINS, USER_WIN_COUNT,
};

/// Finalize window bounds (seconds).
pub const MIN_FINALIZE_DEADLINE: u64 = 300;
pub const MAX_FINALIZE_DEADLINE: u64 = 86400;

/// Page size when walking the registry directory.
const DIRECTORY_PAGE_LIMIT: u32 = 100;

/// Claim the draw for a period. Anyone can call.
///
/// The first claim on a closed period wins and pins the target beacon
/// round. A raced claim is a success for both callers: the draw runs once
/// and everyone polls the same record. Only a Failed draw can be claimed
/// again, on a fresh attempt.
pub fn begin_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    period: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let attempt = match PERIOD_DRAWS.may_load(deps.storage, &period)? {
        Some(draw) => match draw.phase {
            DrawPhase::Processing => {
                return Ok(Response::new()
                    .add_attribute("action", "begin_draw")
                    .add_attribute("period", period)
                    .add_attribute("result", "already_processing"));
            }
            DrawPhase::Done => {
                return Ok(Response::new()
                    .add_attribute("action", "begin_draw")
                    .add_attribute("period", period)
                    .add_attribute("result", "already_done"));
            }
            DrawPhase::Failed => draw.attempt + 1,
        },
        None => 1,
    };

    // The registry must know the period, with registration over
    let period_query = QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: config.registry.to_string(),
        msg: to_json_binary(&RegistryQueryMsg::Period {
            period: period.clone(),
        })?,
    });
    let period_info: Option<PeriodInfoResponse> = deps.querier.query(&period_query)?;
    let period_info = period_info.ok_or(ContractError::PeriodNotFound {
        period: period.clone(),
    })?;
    if period_info.registration_open {
        return Err(ContractError::RegistrationStillOpen { period });
    }

    // Pin a beacon round nobody has seen at claim time
    let now = env.block.time.seconds();
    let target_round = beacon::round_after(
        config.genesis_time,
        config.period_seconds,
        now + config.round_lookahead_seconds,
    );
    let finalize_deadline = Timestamp::from_seconds(now + config.finalize_deadline_seconds);

    let draw = PeriodDraw {
        period: period.clone(),
        phase: DrawPhase::Processing,
        winners_ready: false,
        started_at: env.block.time,
        started_by: info.sender.clone(),
        target_round,
        finalize_deadline,
        attempt,
        draw_order: vec![],
        seed: None,
        generated_at: None,
        failed_at: None,
    };
    PERIOD_DRAWS.save(deps.storage, &period, &draw)?;

    Ok(Response::new()
        .add_attribute("action", "begin_draw")
        .add_attribute("period", period.clone())
        .add_attribute("result", "claimed")
        .add_event(
            Event::new("ttorang_draw_claimed")
                .add_attribute("period", period)
                .add_attribute("attempt", attempt.to_string())
                .add_attribute("target_round", target_round.to_string())
                .add_attribute(
                    "finalize_deadline",
                    finalize_deadline.seconds().to_string(),
                )
                .add_attribute("started_by", info.sender.to_string()),
        ))
}

/// Finalize a claimed draw with the target round's beacon signature.
/// Anyone can call: the signature itself is the authority.
///
/// 1. Check the draw is Processing and inside its deadline
/// 2. Verify the signature for the draw's pinned round
/// 3. Pull products, registrants and the member directory from the registry
/// 4. Run the primary raffles, then the supplemental fill
/// 5. Persist winners, per-user win counts, stats and the finished draw
pub fn finalize_draw(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    period: String,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut draw =
        PERIOD_DRAWS
            .may_load(deps.storage, &period)?
            .ok_or(ContractError::DrawNotFound {
                period: period.clone(),
            })?;

    if draw.phase != DrawPhase::Processing {
        return Err(ContractError::DrawNotProcessing { period });
    }
    if env.block.time > draw.finalize_deadline {
        return Err(ContractError::DeadlinePassed {
            period,
            deadline: draw.finalize_deadline.seconds(),
        });
    }

    // 1. The pinned round must be public before its signature can exist
    let publish =
        beacon::publish_time(config.genesis_time, config.period_seconds, draw.target_round);
    if env.block.time.seconds() < publish {
        return Err(ContractError::RoundNotReached {
            round: draw.target_round,
        });
    }

    // 2. BLS verification via drand-verify; randomness = sha256(signature)
    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;
    let randomness =
        beacon::verify_round_signature(&config.beacon_pubkey, draw.target_round, &signature)
            .map_err(|e| ContractError::VerificationFailed {
                reason: e.to_string(),
            })?;

    // 3. Products with their registrants, straight from the registry
    let products_query = QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: config.registry.to_string(),
        msg: to_json_binary(&RegistryQueryMsg::PeriodProducts {
            period: period.clone(),
        })?,
    });
    let products_response: PeriodProductsResponse = deps.querier.query(&products_query)?;
    let products = products_response.products;

    // 4. Candidate directory: every active member, weighted by tier and
    //    prior wins. Registrants who left it cannot win.
    let mut directory = CandidateDirectory::new();
    let mut start_after: Option<String> = None;
    loop {
        let directory_query = QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: config.registry.to_string(),
            msg: to_json_binary(&RegistryQueryMsg::Directory {
                start_after: start_after.clone(),
                limit: Some(DIRECTORY_PAGE_LIMIT),
            })?,
        });
        let page: DirectoryResponse = deps.querier.query(&directory_query)?;
        let page_len = page.entries.len();
        for entry in page.entries {
            directory.insert(
                entry.address.clone(),
                CandidateProfile {
                    tier: entry.tier,
                    prior_wins: 0,
                },
            );
            start_after = Some(entry.address);
        }
        if (page_len as u32) < DIRECTORY_PAGE_LIMIT {
            break;
        }
    }
    for (address, profile) in directory.iter_mut() {
        let addr = deps.api.addr_validate(address)?;
        profile.prior_wins = USER_WIN_COUNT.may_load(deps.storage, &addr)?.unwrap_or(0);
    }

    // 5. Two-phase allocation, fully determined by the beacon randomness.
    //    The supplement phase appends its picks to the winner lists, so
    //    winners_by_product holds each product's full assignment.
    let mut tickets = TicketStream::new(randomness, &period);
    let (mut winners_by_product, mut alloc_state) =
        allocate_primary(&products, &directory, &mut tickets);
    let supplement = allocate_supplement(
        &products,
        &directory,
        &mut winners_by_product,
        &mut alloc_state,
        &mut tickets,
    );

    // 6. One record per product, plus per-user win tracking
    let mut winners_assigned = 0u64;
    let mut supplement_assigned = 0u64;
    let mut period_winners: Vec<(Addr, u32)> = Vec::new();
    for product in &products {
        let winners = validate_all(deps.api, winners_by_product.get(&product.index))?;
        let extra = validate_all(deps.api, supplement.get(&product.index))?;
        winners_assigned += (winners.len() - extra.len()) as u64;
        supplement_assigned += extra.len() as u64;
        for addr in winners.iter() {
            period_winners.push((addr.clone(), product.index));
        }

        let record = ProductWinners {
            index: product.index,
            required_pins: product.required_pins,
            winner_count: product.winner_count,
            winners,
            supplement: extra,
        };
        PRODUCT_WINNERS.save(deps.storage, (period.as_str(), product.index), &record)?;
    }
    for (addr, product_index) in &period_winners {
        USER_WINS.save(deps.storage, (addr, period.as_str()), product_index)?;
        let count = USER_WIN_COUNT.may_load(deps.storage, addr)?.unwrap_or(0);
        USER_WIN_COUNT.save(deps.storage, addr, &(count + 1))?;
    }

    // 7. Close out the draw record and stats
    draw.phase = DrawPhase::Done;
    draw.winners_ready = true;
    draw.draw_order = display_order(&products);
    draw.seed = Some(hex::encode(randomness));
    draw.generated_at = Some(env.block.time);
    PERIOD_DRAWS.save(deps.storage, &period, &draw)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.draws_completed += 1;
    stats.winners_assigned += winners_assigned;
    stats.supplement_assigned += supplement_assigned;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("action", "finalize_draw")
        .add_attribute("period", period.clone())
        .add_attribute(
            "winners",
            (winners_assigned + supplement_assigned).to_string(),
        )
        .add_event(
            Event::new("ttorang_draw_result")
                .add_attribute("period", period)
                .add_attribute("attempt", draw.attempt.to_string())
                .add_attribute("round", draw.target_round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("products", products.len().to_string())
                .add_attribute("winners", winners_assigned.to_string())
                .add_attribute("supplement", supplement_assigned.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Mark a draw that missed its finalize window as Failed. Anyone can call.
///
/// Failed is durable: pollers read it instead of waiting out the deadline
/// themselves, and a later BeginDraw starts a fresh attempt.
pub fn expire_draw(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    period: String,
) -> Result<Response, ContractError> {
    let mut draw =
        PERIOD_DRAWS
            .may_load(deps.storage, &period)?
            .ok_or(ContractError::DrawNotFound {
                period: period.clone(),
            })?;

    if draw.phase != DrawPhase::Processing {
        return Err(ContractError::DrawNotProcessing { period });
    }
    if env.block.time <= draw.finalize_deadline {
        return Err(ContractError::DeadlineNotPassed {
            period,
            deadline: draw.finalize_deadline.seconds(),
        });
    }

    draw.phase = DrawPhase::Failed;
    draw.failed_at = Some(env.block.time);
    PERIOD_DRAWS.save(deps.storage, &period, &draw)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.draws_failed += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("action", "expire_draw")
        .add_attribute("period", period.clone())
        .add_event(
            Event::new("ttorang_draw_failed")
                .add_attribute("period", period)
                .add_attribute("attempt", draw.attempt.to_string())
                .add_attribute("deadline", draw.finalize_deadline.seconds().to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    registry: Option<String>,
    finalize_deadline_seconds: Option<u64>,
    round_lookahead_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(registry) = registry {
        config.registry = deps.api.addr_validate(&registry)?;
    }
    if let Some(deadline) = finalize_deadline_seconds {
        validate_finalize_deadline(deadline)?;
        config.finalize_deadline_seconds = deadline;
    }
    if let Some(lookahead) = round_lookahead_seconds {
        if lookahead < config.period_seconds {
            return Err(ContractError::InvalidLookahead {
                min: config.period_seconds,
                got: lookahead,
            });
        }
        config.round_lookahead_seconds = lookahead;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}

/// The finalize window must sit between 5 minutes and 24 hours.
pub fn validate_finalize_deadline(seconds: u64) -> Result<(), ContractError> {
    if !(MIN_FINALIZE_DEADLINE..=MAX_FINALIZE_DEADLINE).contains(&seconds) {
        return Err(ContractError::InvalidFinalizeDeadline {
            min: MIN_FINALIZE_DEADLINE,
            max: MAX_FINALIZE_DEADLINE,
            got: seconds,
        });
    }
    Ok(())
}

fn validate_all(api: &dyn Api, addresses: Option<&Vec<String>>) -> Result<Vec<Addr>, ContractError> {
    let mut validated = Vec::new();
    if let Some(addresses) = addresses {
        for address in addresses {
            validated.push(api.addr_validate(address)?);
        }
    }
    Ok(validated)
}
