use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{SimulationError, Tier};

/// Pool facts shared by every entity of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStats {
    /// Physical copies of each distinct entity.
    pub pool_per_entity: u32,
    /// Distinct entities, counting the ones that are still locked.
    pub distinct_entities: u32,
    #[serde(default)]
    pub default_locked: u32,
}

impl TierStats {
    pub const fn new(pool_per_entity: u32, distinct_entities: u32, default_locked: u32) -> Self {
        TierStats {
            pool_per_entity,
            distinct_entities,
            default_locked,
        }
    }
}

/// Static pool tables of one edition: per tier pool facts plus the chance that
/// a single shop slot resolves to each tier, keyed by player level.
///
/// The drop rate list of a level is indexed by tier. Tiers past the end of the
/// list cannot show up at that level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    tiers: [TierStats; 5],
    drop_rates: BTreeMap<u8, Vec<f64>>,
}

impl TierConfig {
    pub fn new(tiers: [TierStats; 5], drop_rates: BTreeMap<u8, Vec<f64>>) -> Self {
        TierConfig { tiers, drop_rates }
    }

    /// Checks the invariants that deserialization cannot express.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (index, stats) in self.tiers.iter().enumerate() {
            if stats.pool_per_entity == 0 {
                return Err(SimulationError::InvalidTiers {
                    reason: format!("tier {} has no copies per entity", index + 1),
                });
            }
            if stats.default_locked > stats.distinct_entities {
                return Err(SimulationError::InvalidTiers {
                    reason: format!(
                        "tier {} locks {} of only {} entities",
                        index + 1,
                        stats.default_locked,
                        stats.distinct_entities
                    ),
                });
            }
        }
        for (level, rates) in &self.drop_rates {
            if rates.len() > self.tiers.len() {
                return Err(SimulationError::InvalidTiers {
                    reason: format!("level {} lists {} tiers", level, rates.len()),
                });
            }
            if let Some(rate) = rates.iter().find(|rate| !(0.0..=1.0).contains(*rate)) {
                return Err(SimulationError::InvalidTiers {
                    reason: format!("level {} has drop rate {} outside [0, 1]", level, rate),
                });
            }
        }
        Ok(())
    }

    pub fn stats(&self, tier: Tier) -> &TierStats {
        &self.tiers[tier.index()]
    }

    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.drop_rates.keys().copied()
    }

    pub fn drop_rates(&self, level: u8) -> Option<&[f64]> {
        self.drop_rates.get(&level).map(Vec::as_slice)
    }

    /// Chance that one shop slot resolves to `tier` at `level`. Returns None if
    /// the level is not configured.
    pub fn tier_hit_probability(&self, level: u8, tier: Tier) -> Option<f64> {
        self.drop_rates(level)
            .map(|rates| rates.get(tier.index()).copied().unwrap_or(0.0))
    }

    /// Locked entity count left after unlocking `unlocked` of the tier's default
    /// locked entities. Unlocking more than are locked unlocks all of them.
    pub fn locked_after_unlocking(&self, tier: Tier, unlocked: u32) -> u32 {
        let default_locked = self.stats(tier).default_locked;
        default_locked - unlocked.min(default_locked)
    }
}

fn standard_drop_rates(late_levels: [[f64; 5]; 4]) -> BTreeMap<u8, Vec<f64>> {
    let early_levels: [[f64; 5]; 6] = [
        [1.00, 0.00, 0.00, 0.00, 0.00],
        [1.00, 0.00, 0.00, 0.00, 0.00],
        [0.75, 0.25, 0.00, 0.00, 0.00],
        [0.55, 0.30, 0.15, 0.00, 0.00],
        [0.45, 0.33, 0.20, 0.02, 0.00],
        [0.30, 0.40, 0.25, 0.05, 0.00],
    ];
    early_levels
        .iter()
        .chain(late_levels.iter())
        .enumerate()
        .map(|(index, rates)| (index as u8 + 1, rates.to_vec()))
        .collect()
}

pub(crate) fn s16() -> TierConfig {
    TierConfig::new(
        [
            TierStats::new(30, 14, 0),
            TierStats::new(25, 19, 6),
            TierStats::new(18, 18, 5),
            TierStats::new(10, 25, 13),
            TierStats::new(9, 24, 16),
        ],
        standard_drop_rates([
            [0.19, 0.30, 0.40, 0.10, 0.01], // 7
            [0.15, 0.20, 0.32, 0.30, 0.03],
            [0.12, 0.18, 0.25, 0.33, 0.12],
            [0.05, 0.10, 0.20, 0.40, 0.25], // 10
        ]),
    )
}

pub(crate) fn s10() -> TierConfig {
    TierConfig::new(
        [
            TierStats::new(30, 13, 0),
            TierStats::new(25, 13, 0),
            TierStats::new(18, 13, 0),
            TierStats::new(12, 13, 0),
            TierStats::new(10, 11, 0),
        ],
        standard_drop_rates([
            [0.19, 0.35, 0.35, 0.10, 0.01], // 7
            [0.18, 0.25, 0.36, 0.18, 0.03],
            [0.10, 0.20, 0.25, 0.35, 0.10],
            [0.05, 0.10, 0.20, 0.40, 0.25], // 10
        ]),
    )
}
