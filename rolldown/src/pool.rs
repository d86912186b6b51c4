use tracing::debug;

use crate::{SimulationError, SimulationRequest, Tier};

/// Cards of the target tier still in the shared pool. Both counts only ever
/// go down while a trial runs, and `remaining_target <= remaining_pool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    remaining_target: u32,
    remaining_pool: u32,
}

impl PoolState {
    pub(crate) fn new(remaining_target: u32, remaining_pool: u32) -> Self {
        debug_assert!(remaining_target <= remaining_pool);
        PoolState {
            remaining_target,
            remaining_pool,
        }
    }

    pub fn remaining_target(&self) -> u32 {
        self.remaining_target
    }

    pub fn remaining_pool(&self) -> u32 {
        self.remaining_pool
    }

    /// Chance that a slot which already resolved to the tier shows the target.
    /// The pool size is floored at one so a drained pool yields zero.
    pub fn draw_probability(&self) -> f64 {
        self.remaining_target as f64 / self.remaining_pool.max(1) as f64
    }

    /// Removes one bought copy of the target from the pool.
    pub fn take_target(&mut self) {
        if self.remaining_target > 0 {
            self.remaining_target -= 1;
            self.remaining_pool -= 1;
        }
    }
}

/// Starting point shared by every trial of one aggregate run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialPool {
    pub state: PoolState,
    /// Chance a single slot resolves to the target tier at the requested level.
    pub tier_hit_probability: f64,
    pub effective_distinct: u32,
    pub total_pool_size: u32,
}

impl InitialPool {
    /// Derives the starting pool of `request`, or the reason it cannot be rolled.
    pub fn derive(request: &SimulationRequest) -> Result<InitialPool, SimulationError> {
        request.tiers.validate()?;
        let tier_hit_probability = request
            .tiers
            .tier_hit_probability(request.level, request.tier)
            .ok_or(SimulationError::UnknownLevel {
                level: request.level,
            })?;
        if request.copies_needed == 0 {
            return Err(SimulationError::InvalidRequest {
                reason: String::from("copies_needed must be at least 1"),
            });
        }

        let stats = request.tiers.stats(request.tier);
        let locked = request.locked_count();
        if locked >= stats.distinct_entities {
            return Err(SimulationError::AllLocked {
                tier: request.tier,
                distinct: stats.distinct_entities,
                locked,
            });
        }
        let effective_distinct = stats.distinct_entities - locked;
        let total_pool_size = stats
            .pool_per_entity
            .checked_mul(effective_distinct)
            .ok_or_else(|| pool_overflow(request.tier))?;

        if request.target_taken >= stats.pool_per_entity {
            return Err(SimulationError::TargetExhausted {
                taken: request.target_taken,
                pool_per_entity: stats.pool_per_entity,
            });
        }
        let remaining_target = stats.pool_per_entity - request.target_taken;

        let taken = request.target_taken as u64 + request.other_taken as u64;
        if taken >= total_pool_size as u64 {
            return Err(SimulationError::PoolExhausted {
                pool_size: total_pool_size,
                target_taken: request.target_taken,
                other_taken: request.other_taken,
            });
        }
        let max_other = max_other_taken(stats.pool_per_entity, effective_distinct)
            .ok_or_else(|| pool_overflow(request.tier))?;
        if request.other_taken > max_other {
            return Err(SimulationError::InvalidRequest {
                reason: format!(
                    "{} other copies taken but the other {} entities only have {}",
                    request.other_taken,
                    effective_distinct - 1,
                    max_other
                ),
            });
        }
        let remaining_pool = total_pool_size - request.target_taken - request.other_taken;

        let initial = InitialPool {
            state: PoolState::new(remaining_target, remaining_pool),
            tier_hit_probability,
            effective_distinct,
            total_pool_size,
        };
        debug!(
            tier = %request.tier,
            level = request.level,
            effective_distinct,
            total_pool_size,
            remaining_target,
            remaining_pool,
            "derived initial pool"
        );
        Ok(initial)
    }

    /// Odds that one slot shows the target before anything is bought. Not sampled.
    pub fn single_slot_probability(&self) -> f64 {
        if self.state.remaining_pool == 0 {
            return 0.0;
        }
        self.tier_hit_probability * self.state.draw_probability()
    }
}

/// Upper bound of copies of the other unlocked entities that can be outside the pool.
/// None if the count does not fit in a `u32`.
pub fn max_other_taken(pool_per_entity: u32, effective_distinct: u32) -> Option<u32> {
    pool_per_entity.checked_mul(effective_distinct.saturating_sub(1))
}

fn pool_overflow(tier: Tier) -> SimulationError {
    SimulationError::InvalidTiers {
        reason: format!("tier {} pool does not fit in {} cards", tier, u32::MAX),
    }
}
