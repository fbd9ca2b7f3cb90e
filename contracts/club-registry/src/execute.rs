use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response};
use ttorang_common::types::MembershipTier;

use crate::error::ContractError;
use crate::msg::{PinGrant, ProductInit};
use crate::state::{
    MemberInfo, PeriodInfo, Product, CONFIG, MEMBERS, MEMBER_ENTRIES, PERIODS, PRODUCTS,
    REGISTRANTS,
};

/// Period keys become storage map keys, so keep them short.
const MAX_PERIOD_KEY_LENGTH: usize = 64;

/// Enroll a new club member. Operator only.
pub fn enroll_member(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    address: String,
    name: String,
    tier: MembershipTier,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can enroll members".to_string(),
        });
    }

    let addr = deps.api.addr_validate(&address)?;
    if MEMBERS.has(deps.storage, &addr) {
        return Err(ContractError::MemberAlreadyEnrolled { address });
    }

    let member = MemberInfo {
        name: name.clone(),
        tier: tier.clone(),
        pins: 0,
        active: true,
        joined_at: env.block.time,
    };
    MEMBERS.save(deps.storage, &addr, &member)?;

    Ok(Response::new()
        .add_attribute("action", "enroll_member")
        .add_attribute("member", addr.to_string())
        .add_event(
            Event::new("ttorang_member")
                .add_attribute("action", "enrolled")
                .add_attribute("member", addr.to_string())
                .add_attribute("name", name)
                .add_attribute("tier", tier_label(&tier)),
        ))
}

/// Change a member's tier. Operator only.
pub fn set_member_tier(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    address: String,
    tier: MembershipTier,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can set member tiers".to_string(),
        });
    }

    let addr = deps.api.addr_validate(&address)?;
    let mut member = MEMBERS
        .may_load(deps.storage, &addr)?
        .ok_or(ContractError::MemberNotFound { address })?;
    member.tier = tier.clone();
    MEMBERS.save(deps.storage, &addr, &member)?;

    Ok(Response::new()
        .add_attribute("action", "set_member_tier")
        .add_attribute("member", addr.to_string())
        .add_event(
            Event::new("ttorang_member")
                .add_attribute("action", "tier_changed")
                .add_attribute("member", addr.to_string())
                .add_attribute("tier", tier_label(&tier)),
        ))
}

/// Activate or deactivate a member. Operator only. Deactivated members
/// keep their record and pin balance but leave the directory.
pub fn set_member_active(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    address: String,
    active: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can set member status".to_string(),
        });
    }

    let addr = deps.api.addr_validate(&address)?;
    let mut member = MEMBERS
        .may_load(deps.storage, &addr)?
        .ok_or(ContractError::MemberNotFound { address })?;
    member.active = active;
    MEMBERS.save(deps.storage, &addr, &member)?;

    Ok(Response::new()
        .add_attribute("action", "set_member_active")
        .add_attribute("member", addr.to_string())
        .add_event(
            Event::new("ttorang_member")
                .add_attribute("action", if active { "activated" } else { "deactivated" })
                .add_attribute("member", addr.to_string()),
        ))
}

/// Credit pins to a batch of members. Operator only.
pub fn award_pins(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    grants: Vec<PinGrant>,
    memo: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can award pins".to_string(),
        });
    }

    let mut total_awarded: u64 = 0;
    for grant in &grants {
        let addr = deps.api.addr_validate(&grant.address)?;
        let mut member =
            MEMBERS
                .may_load(deps.storage, &addr)?
                .ok_or(ContractError::MemberNotFound {
                    address: grant.address.clone(),
                })?;
        member.pins += grant.amount;
        MEMBERS.save(deps.storage, &addr, &member)?;
        total_awarded += u64::from(grant.amount);
    }

    Ok(Response::new()
        .add_attribute("action", "award_pins")
        .add_attribute("grants", grants.len().to_string())
        .add_event(
            Event::new("ttorang_pins")
                .add_attribute("grants", grants.len().to_string())
                .add_attribute("total_awarded", total_awarded.to_string())
                .add_attribute("memo", memo.unwrap_or_default()),
        ))
}

/// Open a draw period with its initial products. Operator only.
pub fn open_period(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    period: String,
    products: Vec<ProductInit>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can open periods".to_string(),
        });
    }

    validate_period_key(&period)?;
    if PERIODS.has(deps.storage, &period) {
        return Err(ContractError::PeriodAlreadyExists { period });
    }

    for (i, product) in products.iter().enumerate() {
        validate_product(product)?;
        let record = Product {
            index: i as u32,
            name: product.name.clone(),
            required_pins: product.required_pins,
            winner_count: product.winner_count,
            registrant_count: 0,
        };
        PRODUCTS.save(deps.storage, (period.as_str(), i as u32), &record)?;
    }

    let period_info = PeriodInfo {
        registration_open: true,
        opened_at: env.block.time,
        closed_at: None,
        product_count: products.len() as u32,
    };
    PERIODS.save(deps.storage, &period, &period_info)?;

    Ok(Response::new()
        .add_attribute("action", "open_period")
        .add_attribute("period", period.clone())
        .add_event(
            Event::new("ttorang_period")
                .add_attribute("action", "opened")
                .add_attribute("period", period)
                .add_attribute("products", products.len().to_string()),
        ))
}

/// Append a product to a period that is still open. Operator only.
pub fn add_product(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    period: String,
    product: ProductInit,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can add products".to_string(),
        });
    }

    let mut period_info =
        PERIODS
            .may_load(deps.storage, &period)?
            .ok_or(ContractError::PeriodNotFound {
                period: period.clone(),
            })?;
    if !period_info.registration_open {
        return Err(ContractError::RegistrationClosed { period });
    }

    validate_product(&product)?;
    let index = period_info.product_count;
    let record = Product {
        index,
        name: product.name.clone(),
        required_pins: product.required_pins,
        winner_count: product.winner_count,
        registrant_count: 0,
    };
    PRODUCTS.save(deps.storage, (period.as_str(), index), &record)?;

    period_info.product_count += 1;
    PERIODS.save(deps.storage, &period, &period_info)?;

    Ok(Response::new()
        .add_attribute("action", "add_product")
        .add_attribute("period", period.clone())
        .add_attribute("index", index.to_string())
        .add_event(
            Event::new("ttorang_product")
                .add_attribute("period", period)
                .add_attribute("index", index.to_string())
                .add_attribute("name", product.name)
                .add_attribute("required_pins", product.required_pins.to_string())
                .add_attribute("winner_count", product.winner_count.to_string()),
        ))
}

/// Close a period's registration window. Operator only. Registration and
/// cancellation stop here; the draw hub requires a closed period before it
/// starts a draw.
pub fn close_registration(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    period: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can close registration".to_string(),
        });
    }

    let mut period_info =
        PERIODS
            .may_load(deps.storage, &period)?
            .ok_or(ContractError::PeriodNotFound {
                period: period.clone(),
            })?;
    if !period_info.registration_open {
        return Err(ContractError::RegistrationClosed { period });
    }

    period_info.registration_open = false;
    period_info.closed_at = Some(env.block.time);
    PERIODS.save(deps.storage, &period, &period_info)?;

    Ok(Response::new()
        .add_attribute("action", "close_registration")
        .add_attribute("period", period.clone())
        .add_event(
            Event::new("ttorang_period")
                .add_attribute("action", "closed")
                .add_attribute("period", period),
        ))
}

/// Enter a product's raffle, spending its pin cost. Any active member.
pub fn register(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    period: String,
    product_index: u32,
) -> Result<Response, ContractError> {
    let mut member =
        MEMBERS
            .may_load(deps.storage, &info.sender)?
            .ok_or(ContractError::MemberNotFound {
                address: info.sender.to_string(),
            })?;
    if !member.active {
        return Err(ContractError::MemberInactive {
            address: info.sender.to_string(),
        });
    }

    let period_info =
        PERIODS
            .may_load(deps.storage, &period)?
            .ok_or(ContractError::PeriodNotFound {
                period: period.clone(),
            })?;
    if !period_info.registration_open {
        return Err(ContractError::RegistrationClosed { period });
    }

    let mut product = PRODUCTS
        .may_load(deps.storage, (period.as_str(), product_index))?
        .ok_or(ContractError::ProductNotFound {
            period: period.clone(),
            product_index,
        })?;

    let mut entries = MEMBER_ENTRIES
        .may_load(deps.storage, (period.as_str(), &info.sender))?
        .unwrap_or_default();
    if entries.contains(&product_index) {
        return Err(ContractError::AlreadyRegistered {
            period,
            product_index,
        });
    }

    if member.pins < product.required_pins {
        return Err(ContractError::InsufficientPins {
            required: product.required_pins,
            available: member.pins,
        });
    }
    member.pins -= product.required_pins;
    MEMBERS.save(deps.storage, &info.sender, &member)?;

    let mut registrants = REGISTRANTS
        .may_load(deps.storage, (period.as_str(), product_index))?
        .unwrap_or_default();
    registrants.push(info.sender.clone());
    REGISTRANTS.save(deps.storage, (period.as_str(), product_index), &registrants)?;

    entries.push(product_index);
    MEMBER_ENTRIES.save(deps.storage, (period.as_str(), &info.sender), &entries)?;

    product.registrant_count += 1;
    PRODUCTS.save(deps.storage, (period.as_str(), product_index), &product)?;

    Ok(Response::new()
        .add_attribute("action", "register")
        .add_attribute("period", period.clone())
        .add_attribute("product_index", product_index.to_string())
        .add_event(
            Event::new("ttorang_registration")
                .add_attribute("action", "registered")
                .add_attribute("period", period)
                .add_attribute("product_index", product_index.to_string())
                .add_attribute("member", info.sender.to_string())
                .add_attribute("pins_spent", product.required_pins.to_string()),
        ))
}

/// Withdraw a registration while the period is still open. Refunds the
/// product's pin cost.
pub fn cancel_registration(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    period: String,
    product_index: u32,
) -> Result<Response, ContractError> {
    let period_info =
        PERIODS
            .may_load(deps.storage, &period)?
            .ok_or(ContractError::PeriodNotFound {
                period: period.clone(),
            })?;
    if !period_info.registration_open {
        return Err(ContractError::RegistrationClosed { period });
    }

    let mut entries = MEMBER_ENTRIES
        .may_load(deps.storage, (period.as_str(), &info.sender))?
        .unwrap_or_default();
    if !entries.contains(&product_index) {
        return Err(ContractError::NotRegistered {
            period,
            product_index,
        });
    }

    let mut product = PRODUCTS
        .may_load(deps.storage, (period.as_str(), product_index))?
        .ok_or(ContractError::ProductNotFound {
            period: period.clone(),
            product_index,
        })?;

    let mut member =
        MEMBERS
            .may_load(deps.storage, &info.sender)?
            .ok_or(ContractError::MemberNotFound {
                address: info.sender.to_string(),
            })?;
    member.pins += product.required_pins;
    MEMBERS.save(deps.storage, &info.sender, &member)?;

    entries.retain(|i| *i != product_index);
    MEMBER_ENTRIES.save(deps.storage, (period.as_str(), &info.sender), &entries)?;

    let mut registrants = REGISTRANTS
        .may_load(deps.storage, (period.as_str(), product_index))?
        .unwrap_or_default();
    registrants.retain(|addr| addr != &info.sender);
    REGISTRANTS.save(deps.storage, (period.as_str(), product_index), &registrants)?;

    product.registrant_count -= 1;
    PRODUCTS.save(deps.storage, (period.as_str(), product_index), &product)?;

    Ok(Response::new()
        .add_attribute("action", "cancel_registration")
        .add_attribute("period", period.clone())
        .add_attribute("product_index", product_index.to_string())
        .add_event(
            Event::new("ttorang_registration")
                .add_attribute("action", "cancelled")
                .add_attribute("period", period)
                .add_attribute("product_index", product_index.to_string())
                .add_attribute("member", info.sender.to_string())
                .add_attribute("pins_refunded", product.required_pins.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    admin: Option<String>,
    operator: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(new_admin) = admin {
        config.admin = deps.api.addr_validate(&new_admin)?;
    }
    if let Some(new_operator) = operator {
        config.operator = deps.api.addr_validate(&new_operator)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}

fn tier_label(tier: &MembershipTier) -> &'static str {
    match tier {
        MembershipTier::Member => "member",
        MembershipTier::Associate => "associate",
    }
}

fn validate_period_key(period: &str) -> Result<(), ContractError> {
    if period.is_empty() {
        return Err(ContractError::InvalidPeriodKey {
            reason: "must not be empty".to_string(),
        });
    }
    if period.len() > MAX_PERIOD_KEY_LENGTH {
        return Err(ContractError::InvalidPeriodKey {
            reason: format!("longer than {MAX_PERIOD_KEY_LENGTH} bytes"),
        });
    }
    Ok(())
}

fn validate_product(product: &ProductInit) -> Result<(), ContractError> {
    if product.winner_count == 0 {
        return Err(ContractError::InvalidWinnerCount {
            name: product.name.clone(),
        });
    }
    Ok(())
}
