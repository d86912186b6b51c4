use crate::Tier;

/// Reasons a request cannot be simulated. All of them are raised before the
/// first trial runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("all {distinct} tier {tier} entities are locked, the pool is empty")]
    AllLocked { tier: Tier, distinct: u32, locked: u32 },

    #[error("{taken} copies of the target are taken but only {pool_per_entity} exist")]
    TargetExhausted { taken: u32, pool_per_entity: u32 },

    #[error(
        "tier pool of {pool_size} cards is drained by {target_taken} target and {other_taken} other taken copies"
    )]
    PoolExhausted {
        pool_size: u32,
        target_taken: u32,
        other_taken: u32,
    },

    #[error("level {level} cannot roll any tier, no drop rates configured")]
    UnknownLevel { level: u8 },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("invalid tier table: {reason}")]
    InvalidTiers { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tier must be in [1, 5], got {0}")]
pub struct InvalidTier(pub u8);
