pub mod allocator;
pub mod types;

pub use allocator::{
    allocate_primary, allocate_supplement, candidate_weight, display_order, AllocationState,
    CandidateDirectory, CandidateProfile, ProductDraw, ProductLosers, TicketStream,
};
pub use types::{
    DirectoryEntry, DrawPhase, MembershipTier, STATUS_POLL_INTERVAL_SECONDS,
    STATUS_POLL_MAX_ATTEMPTS,
};
