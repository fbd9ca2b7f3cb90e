use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;
use sha2::{Digest, Sha256};

use crate::types::MembershipTier;

/// One prize product in a draw run: its entry cost in pins, the number of
/// prizes available, and who registered for its raffle.
#[cw_serde]
pub struct ProductDraw {
    pub index: u32,
    pub required_pins: u32,
    pub winner_count: u32,
    pub registrants: Vec<String>,
}

/// What the allocator needs to know about one candidate.
#[cw_serde]
pub struct CandidateProfile {
    pub tier: MembershipTier,
    pub prior_wins: u32,
}

/// Candidate address → profile. Ordered so weight walks iterate identically
/// on every node.
pub type CandidateDirectory = BTreeMap<String, CandidateProfile>;

/// State threaded from the primary phase into the supplement phase of one
/// draw run.
///
/// `global_winners` enforces one prize per candidate per run across all
/// products. `losers_by_product` feeds the supplement-phase bonus for
/// candidates who entered costlier raffles and lost them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllocationState {
    pub global_winners: BTreeSet<String>,
    pub losers_by_product: BTreeMap<u32, ProductLosers>,
}

/// The registrants of one product who did not win it, kept with the
/// product's pin cost for the supplement-phase bonus comparison.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductLosers {
    pub required_pins: u32,
    pub losers: BTreeSet<String>,
}

/// Deterministic ticket source for one draw run.
///
/// Each ticket is `sha256(seed || label || counter)` truncated to its first
/// 16 bytes, read as a big-endian u128 and reduced modulo the requested
/// total. The counter advances once per ticket; the label binds the stream
/// to its period key so two runs never share tickets even if a beacon were
/// ever reused.
pub struct TicketStream {
    seed: [u8; 32],
    label: Vec<u8>,
    counter: u64,
}

impl TicketStream {
    pub fn new(seed: [u8; 32], label: &str) -> Self {
        TicketStream {
            seed,
            label: label.as_bytes().to_vec(),
            counter: 0,
        }
    }

    /// Next ticket in `[0, total)`. `total` must be non-zero.
    pub fn next_ticket(&mut self, total: u128) -> u128 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(&self.label);
        hasher.update(self.counter.to_be_bytes());
        let digest = hasher.finalize();
        self.counter += 1;

        let mut ticket_bytes = [0u8; 16];
        ticket_bytes.copy_from_slice(&digest[0..16]);
        u128::from_be_bytes(ticket_bytes) % total
    }
}

/// Selection weight for a known candidate: base 1, ×1.5 for full members,
/// ×0.7 for anyone who already won a prize in an earlier period.
pub fn profile_weight(profile: &CandidateProfile) -> Decimal {
    let mut weight = Decimal::one();
    if profile.tier == MembershipTier::Member {
        weight = weight * Decimal::percent(150);
    }
    if profile.prior_wins > 0 {
        weight = weight * Decimal::percent(70);
    }
    weight
}

/// Weight for `addr` under `directory`. Addresses missing from the
/// directory weigh zero: they stay in the pool but can never be drawn.
pub fn candidate_weight(directory: &CandidateDirectory, addr: &str) -> Decimal {
    match directory.get(addr) {
        Some(profile) => profile_weight(profile),
        None => Decimal::zero(),
    }
}

/// Pick one pool entry by cumulative weight. Returns the winning position,
/// or `None` when the pool's total weight is zero, which ends the product's
/// draw early.
fn draw_one(pool: &[(String, Decimal)], tickets: &mut TicketStream) -> Option<usize> {
    let total: u128 = pool
        .iter()
        .map(|(_, weight)| weight.atomics().u128())
        .sum();
    if total == 0 {
        return None;
    }

    let winning_ticket = tickets.next_ticket(total);
    let mut cumulative: u128 = 0;
    for (position, (_, weight)) in pool.iter().enumerate() {
        cumulative += weight.atomics().u128();
        if winning_ticket < cumulative {
            return Some(position);
        }
    }
    // winning_ticket < total, so the walk above always returns
    None
}

/// Phase one: the primary raffle, run per product over its own registrants.
///
/// Products draw in input order. Each winner is removed from its product's
/// pool and excluded from every later pool in the run (one prize per
/// candidate per period); registrants who were not drawn are recorded as
/// that product's losers for the supplement phase.
pub fn allocate_primary(
    products: &[ProductDraw],
    directory: &CandidateDirectory,
    tickets: &mut TicketStream,
) -> (BTreeMap<u32, Vec<String>>, AllocationState) {
    let mut state = AllocationState::default();
    let mut winners_by_product: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    for product in products {
        let mut pool: Vec<(String, Decimal)> = product
            .registrants
            .iter()
            .filter(|addr| !state.global_winners.contains(addr.as_str()))
            .map(|addr| (addr.clone(), candidate_weight(directory, addr)))
            .collect();

        let mut winners: Vec<String> = Vec::new();
        for _ in 0..product.winner_count {
            match draw_one(&pool, tickets) {
                Some(position) => {
                    let (winner, _) = pool.remove(position);
                    state.global_winners.insert(winner.clone());
                    winners.push(winner);
                }
                None => break,
            }
        }

        let losers: BTreeSet<String> = product
            .registrants
            .iter()
            .filter(|addr| !winners.contains(addr))
            .cloned()
            .collect();
        state.losers_by_product.insert(
            product.index,
            ProductLosers {
                required_pins: product.required_pins,
                losers,
            },
        );
        winners_by_product.insert(product.index, winners);
    }

    (winners_by_product, state)
}

/// Phase two: supplemental fill from the whole candidate directory, run
/// only after every product's primary raffle has finished.
///
/// Products whose raffle never legitimately ran (no registrants at a
/// non-zero pin cost) keep their slots empty. Candidates who entered a
/// costlier raffle and lost it get `+0.25` on a bonus multiplier per such
/// loss, capped at `2`; everyone already holding a prize is excluded.
///
/// Each pick is appended to its product's entry in `winners_by_product`
/// and also returned in the supplement map, so the winner list always
/// carries the full assignment while the supplement map identifies which
/// of those winners came from the fill.
pub fn allocate_supplement(
    products: &[ProductDraw],
    directory: &CandidateDirectory,
    winners_by_product: &mut BTreeMap<u32, Vec<String>>,
    state: &mut AllocationState,
    tickets: &mut TicketStream,
) -> BTreeMap<u32, Vec<String>> {
    let mut supplement_by_product: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    for product in products {
        if product.registrants.is_empty() && product.required_pins > 0 {
            continue;
        }

        let filled = winners_by_product
            .get(&product.index)
            .map(|w| w.len())
            .unwrap_or(0);
        let open_slots = (product.winner_count as usize).saturating_sub(filled);
        if open_slots == 0 {
            continue;
        }

        let mut pool: Vec<(String, Decimal)> = directory
            .iter()
            .filter(|(addr, _)| !state.global_winners.contains(addr.as_str()))
            .map(|(addr, profile)| {
                let missed =
                    costlier_losses(addr, product.required_pins, &state.losers_by_product);
                (addr.clone(), profile_weight(profile) * bonus_multiplier(missed))
            })
            .collect();

        let mut picks: Vec<String> = Vec::new();
        for _ in 0..open_slots {
            match draw_one(&pool, tickets) {
                Some(position) => {
                    let (winner, _) = pool.remove(position);
                    state.global_winners.insert(winner.clone());
                    picks.push(winner);
                }
                None => break,
            }
        }
        winners_by_product
            .entry(product.index)
            .or_default()
            .extend(picks.iter().cloned());
        supplement_by_product.insert(product.index, picks);
    }

    supplement_by_product
}

/// Count the products costlier than `required_pins` whose loser set
/// contains `addr`. A product never counts toward its own fill because the
/// comparison is strict.
fn costlier_losses(
    addr: &str,
    required_pins: u32,
    losers_by_product: &BTreeMap<u32, ProductLosers>,
) -> u32 {
    losers_by_product
        .values()
        .filter(|entry| entry.required_pins > required_pins && entry.losers.contains(addr))
        .count() as u32
}

/// Supplement-phase bonus multiplier: `1 + 0.25` per costlier raffle lost,
/// capped at `2`.
fn bonus_multiplier(missed: u32) -> Decimal {
    let percent = 100u64 + 25u64 * u64::from(missed);
    Decimal::percent(percent.min(200))
}

/// Presentation order for a finished draw: costliest product first, ties
/// broken by ascending index. Drawing itself always runs in input order.
pub fn display_order(products: &[ProductDraw]) -> Vec<u32> {
    let mut ordered: Vec<&ProductDraw> = products.iter().collect();
    ordered.sort_by(|a, b| {
        b.required_pins
            .cmp(&a.required_pins)
            .then(a.index.cmp(&b.index))
    });
    ordered.into_iter().map(|p| p.index).collect()
}
