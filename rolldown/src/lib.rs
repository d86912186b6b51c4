mod error;
pub mod pool;
pub mod report;
pub mod simulation;
mod tiers;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;

pub use error::{InvalidTier, SimulationError};
pub use pool::{InitialPool, PoolState};
pub use report::{HistogramBin, SimulationReport, Verdict};
pub use simulation::{Simulator, SimulatorEventHandler, TrialOutcome};
pub use tiers::{TierConfig, TierStats};

/// Gold paid for one shop refresh.
pub const REFRESH_COST: u32 = 2;
/// Number of slots revealed by every refresh.
pub const SHOP_SLOTS: u8 = 5;

/// A cost bracket. Every entity of a tier shares the same pool size and drop rates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    One = 1,
    Two,
    Three,
    Four,
    Five,
}

impl Tier {
    pub fn cost(&self) -> u8 {
        *self as u8
    }

    /// Zero based position of the tier in per-tier tables.
    pub fn index(&self) -> usize {
        (self.cost() - 1) as usize
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.cost()
    }
}

impl TryFrom<u8> for Tier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            3 => Ok(Tier::Three),
            4 => Ok(Tier::Four),
            5 => Ok(Tier::Five),
            _ => Err(InvalidTier(value)),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cost())
    }
}

/// Built-in game editions with known pool tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Serialize_enum_str, Deserialize_enum_str)]
pub enum Edition {
    // Quest-locked entities stay out of the pool until unlocked.
    S16,
    S10,
}

impl Edition {
    pub fn tiers(&self) -> TierConfig {
        match self {
            Edition::S16 => tiers::s16(),
            Edition::S10 => tiers::s10(),
        }
    }
}

/// Everything needed for one aggregate run. Built fresh for every run.
#[derive(Clone, Debug)]
pub struct SimulationRequest<'a> {
    pub tiers: &'a TierConfig,
    pub level: u8,
    pub tier: Tier,
    pub gold: u32,
    pub copies_needed: u32,
    /// Copies of the wanted entity held outside the pool.
    pub target_taken: u32,
    /// Copies of other same tier entities held outside the pool.
    pub other_taken: u32,
    pub trial_count: u32,
    /// Entities excluded from the pool. `None` falls back to the tier's default.
    pub locked: Option<u32>,
}

impl<'a> SimulationRequest<'a> {
    pub fn new(tiers: &'a TierConfig, level: u8, tier: Tier) -> Self {
        SimulationRequest {
            tiers,
            level,
            tier,
            gold: 50,
            copies_needed: 1,
            target_taken: 0,
            other_taken: 0,
            trial_count: 1000,
            locked: None,
        }
    }

    /// Number of entities kept out of the pool for this request.
    pub fn locked_count(&self) -> u32 {
        self.locked
            .unwrap_or_else(|| self.tiers.stats(self.tier).default_locked)
    }

    /// Marks `unlocked` of the tier's default locked entities as unlocked.
    pub fn with_unlocked(mut self, unlocked: u32) -> Self {
        self.locked = Some(self.tiers.locked_after_unlocking(self.tier, unlocked));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn tier_conversion_matches_cost() {
        for tier in Tier::iter() {
            let cost: u8 = tier.into();
            assert_eq!(Tier::try_from(cost), Ok(tier));
            assert_eq!(tier.index() + 1, cost as usize);
        }
        assert_eq!(Tier::try_from(0), Err(InvalidTier(0)));
        assert_eq!(Tier::try_from(6), Err(InvalidTier(6)));
    }

    #[test]
    fn edition_parses_from_string() {
        assert_eq!("S16".parse::<Edition>().unwrap(), Edition::S16);
        assert_eq!("S10".parse::<Edition>().unwrap(), Edition::S10);
        assert!("S99".parse::<Edition>().is_err());
        assert_eq!(Edition::S10.to_string(), "S10");
    }

    #[test]
    fn locked_count_defaults_to_tier_default() {
        let tiers = Edition::S16.tiers();
        let request = SimulationRequest::new(&tiers, 8, Tier::Four);
        assert_eq!(request.locked_count(), 13);

        let request = request.with_unlocked(3);
        assert_eq!(request.locked_count(), 10);

        let request = SimulationRequest {
            locked: Some(0),
            ..SimulationRequest::new(&tiers, 8, Tier::Four)
        };
        assert_eq!(request.locked_count(), 0);
    }
}
