use rand::Rng;

use crate::{PoolState, REFRESH_COST, SHOP_SLOTS};

/// Result of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    pub success: bool,
    pub gold_spent: u32,
    pub copies_found: u32,
}

/// One player rolling the shop until the goal is met or the gold runs out.
/// Owns a private copy of the pool, which is thrown away with the trial.
#[derive(Debug, Clone)]
pub struct Trial {
    gold: u32,
    gold_spent: u32,
    copies_found: u32,
    copies_needed: u32,
    tier_hit_probability: f64,
    pool: PoolState,
}

impl Trial {
    pub fn new(gold: u32, tier_hit_probability: f64, copies_needed: u32, pool: PoolState) -> Self {
        Trial {
            gold,
            gold_spent: 0,
            copies_found: 0,
            copies_needed,
            tier_hit_probability,
            pool,
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.gold >= REFRESH_COST
    }

    pub fn is_complete(&self) -> bool {
        self.copies_found >= self.copies_needed
    }

    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    /// Pays for one refresh and buys every target copy shown. Panics if the
    /// refresh cannot be paid for. Returns the copies bought by this refresh.
    ///
    /// Slots that show another entity of the tier leave the pool untouched.
    pub fn refresh<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        assert!(self.can_refresh(), "Not enough gold to refresh!");
        self.gold -= REFRESH_COST;
        self.gold_spent += REFRESH_COST;

        let mut bought = 0;
        for _ in 0..SHOP_SLOTS {
            if rng.gen::<f64>() >= self.tier_hit_probability {
                continue;
            }
            if rng.gen::<f64>() < self.pool.draw_probability() {
                self.pool.take_target();
                bought += 1;
            }
        }
        self.copies_found += bought;
        bought
    }

    /// Keeps refreshing while gold lasts, stopping at the first refresh that
    /// completes the goal.
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> TrialOutcome {
        while self.can_refresh() {
            self.refresh(rng);
            if self.is_complete() {
                break;
            }
        }
        self.outcome()
    }

    pub fn outcome(&self) -> TrialOutcome {
        TrialOutcome {
            success: self.is_complete(),
            gold_spent: self.gold_spent,
            copies_found: self.copies_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    /// Every draw is 0.0, so every slot hits as long as its odds are positive.
    fn always_hit() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Every draw is just below 1.0, so only certain events happen.
    fn always_miss() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn lucky_refresh_fills_every_slot() {
        let mut trial = Trial::new(50, 0.18, 3, PoolState::new(10, 120));
        let bought = trial.refresh(&mut always_hit());
        assert_eq!(bought, SHOP_SLOTS as u32);
        assert_eq!(*trial.pool(), PoolState::new(5, 115));
        assert!(trial.is_complete());
    }

    #[test]
    fn run_stops_once_goal_is_met() {
        let outcome = Trial::new(50, 0.18, 7, PoolState::new(10, 120)).run(&mut always_hit());
        assert_eq!(
            outcome,
            TrialOutcome {
                success: true,
                gold_spent: 4,
                copies_found: 10,
            }
        );
    }

    #[test]
    fn drained_target_stops_buying() {
        let outcome = Trial::new(10, 1.0, 3, PoolState::new(2, 2)).run(&mut always_hit());
        assert_eq!(
            outcome,
            TrialOutcome {
                success: false,
                gold_spent: 10,
                copies_found: 2,
            }
        );
    }

    #[test]
    fn unlucky_trial_spends_everything() {
        let outcome = Trial::new(51, 1.0, 1, PoolState::new(10, 120)).run(&mut always_miss());
        assert_eq!(
            outcome,
            TrialOutcome {
                success: false,
                gold_spent: 50,
                copies_found: 0,
            }
        );
    }

    #[test]
    fn certain_draw_always_hits() {
        let outcome = Trial::new(2, 1.0, 1, PoolState::new(4, 4)).run(&mut always_miss());
        assert!(outcome.success);
        assert_eq!(outcome.copies_found, 4);
    }

    #[test]
    fn poor_player_cannot_refresh() {
        for gold in 0..REFRESH_COST {
            let outcome = Trial::new(gold, 1.0, 1, PoolState::new(10, 10)).run(&mut always_hit());
            assert_eq!(
                outcome,
                TrialOutcome {
                    success: false,
                    gold_spent: 0,
                    copies_found: 0,
                }
            );
        }
    }

    #[test]
    #[should_panic]
    fn refresh_without_gold_should_panic() {
        let mut trial = Trial::new(1, 1.0, 1, PoolState::new(10, 10));
        trial.refresh(&mut always_hit());
    }

    #[test]
    fn pool_never_grows() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut trial = Trial::new(200, 0.5, 10, PoolState::new(10, 40));
        let mut last = *trial.pool();
        while trial.can_refresh() {
            trial.refresh(&mut rng);
            let pool = *trial.pool();
            assert!(pool.remaining_target() <= last.remaining_target());
            assert!(pool.remaining_pool() <= last.remaining_pool());
            assert!(pool.remaining_target() <= pool.remaining_pool());
            assert_eq!(
                last.remaining_pool() - pool.remaining_pool(),
                last.remaining_target() - pool.remaining_target()
            );
            last = pool;
        }
    }
}
