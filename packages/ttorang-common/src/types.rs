use cosmwasm_schema::cw_serde;

/// Membership level of a club member. Full members carry a higher draw
/// weight than associates.
#[cw_serde]
pub enum MembershipTier {
    Member,
    Associate,
}

/// The lifecycle phase of a period's prize draw.
#[cw_serde]
pub enum DrawPhase {
    Processing,
    Done,
    Failed,
}

/// One active member as served by the club registry's directory queries.
#[cw_serde]
pub struct DirectoryEntry {
    pub address: String,
    pub tier: MembershipTier,
}

/// Recommended cadence for clients waiting on another caller's in-flight
/// draw: re-query the draw status every two seconds, give up after ten
/// attempts and surface a timeout.
pub const STATUS_POLL_INTERVAL_SECONDS: u64 = 2;
pub const STATUS_POLL_MAX_ATTEMPTS: u32 = 10;
