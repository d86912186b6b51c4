use crate::{InitialPool, TrialOutcome};

/// Success rate above which rolling down is worth it.
const PUSH_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Roll now.
    Push,
    /// Odds are poor. Save gold or level up first.
    Hold,
}

/// One equal-width bucket of the gold spent by successful trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Outcomes of an aggregate run, in trial order, with the statistics built on them.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    initial: InitialPool,
    gold: u32,
    copies_needed: u32,
    outcomes: Vec<TrialOutcome>,
}

impl SimulationReport {
    pub fn new(
        initial: InitialPool,
        gold: u32,
        copies_needed: u32,
        outcomes: Vec<TrialOutcome>,
    ) -> Self {
        SimulationReport {
            initial,
            gold,
            copies_needed,
            outcomes,
        }
    }

    pub fn initial(&self) -> &InitialPool {
        &self.initial
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn copies_needed(&self) -> u32 {
        self.copies_needed
    }

    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.success).count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.outcomes.len() as f64
        }
    }

    /// Mean gold spent by the trials that succeeded. None if none did.
    pub fn expected_cost(&self) -> Option<f64> {
        let costs = self.successful_costs();
        if costs.is_empty() {
            return None;
        }
        let total: u64 = costs.iter().map(|cost| *cost as u64).sum();
        Some(total as f64 / costs.len() as f64)
    }

    pub fn successful_costs(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.success)
            .map(|outcome| outcome.gold_spent)
            .collect()
    }

    /// Nearest-rank percentile of the successful costs, `p` in [0, 1].
    pub fn cost_percentile(&self, p: f64) -> Option<u32> {
        let mut costs = self.successful_costs();
        if costs.is_empty() {
            return None;
        }
        costs.sort_unstable();
        let rank = (p.clamp(0.0, 1.0) * costs.len() as f64).ceil() as usize;
        Some(costs[rank.clamp(1, costs.len()) - 1])
    }

    /// Splits the successful costs into `bins` equal-width buckets between the
    /// cheapest and the most expensive success.
    pub fn cost_histogram(&self, bins: usize) -> Vec<HistogramBin> {
        let costs = self.successful_costs();
        let (min, max) = match (costs.iter().min(), costs.iter().max()) {
            (Some(min), Some(max)) if bins > 0 => (*min as f64, *max as f64),
            _ => return Vec::new(),
        };
        if min == max {
            return vec![HistogramBin {
                lower: min,
                upper: max,
                count: costs.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for cost in &costs {
            let index = ((*cost as f64 - min) / width) as usize;
            counts[index.min(bins - 1)] += 1;
        }
        counts
            .into_iter()
            .enumerate()
            .map(|(index, count)| HistogramBin {
                lower: min + width * index as f64,
                upper: min + width * (index + 1) as f64,
                count,
            })
            .collect()
    }

    /// Odds that a single slot shows the target at the start of the run.
    /// Computed from the initial pool, not sampled.
    pub fn single_slot_probability(&self) -> f64 {
        self.initial.single_slot_probability()
    }

    pub fn verdict(&self) -> Verdict {
        if self.success_rate() > PUSH_THRESHOLD {
            Verdict::Push
        } else {
            Verdict::Hold
        }
    }
}
