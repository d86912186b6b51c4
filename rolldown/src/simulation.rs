pub mod shop;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::{InitialPool, SimulationError, SimulationReport, SimulationRequest};

pub use self::shop::{Trial, TrialOutcome};

/// Number of progress reports sent to a handler over one aggregate run.
const PROGRESS_REPORTS: u32 = 10;

/// Runs independent trials of a request and collects their outcomes.
/// Owns its random source, so seeding the simulator makes a run repeatable.
pub struct Simulator<R: Rng = StdRng> {
    rng: R,
}

impl Simulator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulator<R> {
    pub fn new(rng: R) -> Self {
        Simulator { rng }
    }

    pub fn simulate(
        &mut self,
        request: &SimulationRequest,
    ) -> Result<SimulationReport, SimulationError> {
        self.simulate_with_handler(request, &mut NoopHandler)
    }

    /// Runs `request.trial_count` trials, each from a fresh copy of the same
    /// initial pool. An infeasible request fails before any trial runs.
    pub fn simulate_with_handler<U: SimulatorEventHandler>(
        &mut self,
        request: &SimulationRequest,
        handler: &mut U,
    ) -> Result<SimulationReport, SimulationError> {
        let initial = InitialPool::derive(request)?;
        let total = request.trial_count;
        info!(
            level = request.level,
            tier = %request.tier,
            gold = request.gold,
            copies_needed = request.copies_needed,
            trials = total,
            "rolling down"
        );
        handler.on_run_begin(&initial, total);

        let progress_step = (total / PROGRESS_REPORTS).max(1);
        let mut outcomes = Vec::with_capacity(total as usize);
        for index in 0..total {
            let trial = Trial::new(
                request.gold,
                initial.tier_hit_probability,
                request.copies_needed,
                initial.state,
            );
            let outcome = trial.run(&mut self.rng);
            handler.on_trial_finished(index, &outcome);
            outcomes.push(outcome);

            let completed = index + 1;
            if completed % progress_step == 0 || completed == total {
                handler.on_progress(completed, total);
            }
        }

        let report = SimulationReport::new(initial, request.gold, request.copies_needed, outcomes);
        info!(
            success_rate = report.success_rate(),
            expected_cost = ?report.expected_cost(),
            "roll down finished"
        );
        handler.on_run_end(&report);
        Ok(report)
    }
}

/// Observes an aggregate run. It cannot change the course of the run.
pub trait SimulatorEventHandler {
    fn on_run_begin(&mut self, _initial: &InitialPool, _trial_count: u32) {}
    fn on_trial_finished(&mut self, _index: u32, _outcome: &TrialOutcome) {}
    /// Called about every tenth of the run, and once more when it is done.
    fn on_progress(&mut self, _completed: u32, _total: u32) {}
    fn on_run_end(&mut self, _report: &SimulationReport) {}
}

pub struct NoopHandler;

impl SimulatorEventHandler for NoopHandler {}
