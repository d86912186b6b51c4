use rolldown::{
    HistogramBin, InitialPool, SimulationError, SimulationReport, Simulator,
    SimulatorEventHandler, Verdict,
};
use rolldown_drivers::{Config, ConfigError};
use tracing::info;

const HISTOGRAM_WIDTH: usize = 40;

#[derive(Debug, Clone, Default)]
struct Handler;

impl SimulatorEventHandler for Handler {
    fn on_run_begin(&mut self, initial: &InitialPool, trial_count: u32) {
        info!(
            trials = trial_count,
            remaining_target = initial.state.remaining_target(),
            remaining_pool = initial.state.remaining_pool(),
            effective_distinct = initial.effective_distinct,
            "pool ready"
        );
    }

    fn on_progress(&mut self, completed: u32, total: u32) {
        info!("{}/{} trials", completed, total);
    }
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    let tiers = config.request.tiers()?;
    let request = config
        .request
        .to_request(&tiers, config.simulator.trial_count)?;
    let mut simulator = match config.simulator.seed {
        Some(seed) => Simulator::with_seed(seed),
        None => Simulator::from_entropy(),
    };

    let report = simulator.simulate_with_handler(&request, &mut Handler)?;
    print_report(&report, config.simulator.histogram_bins);
    Ok(())
}

/// Turns a failed run into the message shown to the player.
pub fn describe_failure(err: &anyhow::Error) -> String {
    if let Some(err) = err.downcast_ref::<SimulationError>() {
        return describe_simulation_error(err);
    }
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::Tiers(err)) => describe_simulation_error(err),
        Some(err) => format!("Bad config: {}", err),
        None => format!("Unknown error: {}", err),
    }
}

fn describe_simulation_error(err: &SimulationError) -> String {
    match err {
        SimulationError::AllLocked { .. } => {
            String::from("Every card of this tier is locked, the pool is empty!")
        }
        SimulationError::TargetExhausted { .. } => {
            String::from("Every copy of this card is already taken!")
        }
        SimulationError::PoolExhausted { .. } => {
            String::from("The tier pool has been drained, check the taken counts.")
        }
        SimulationError::UnknownLevel { .. } => {
            String::from("This level cannot roll cards of that cost.")
        }
        other => other.to_string(),
    }
}

fn print_report(report: &SimulationReport, histogram_bins: usize) {
    println!("Simulated {} trials", report.outcomes().len());
    println!(
        "Success rate:      {:.1}%",
        report.success_rate() * 100.0
    );
    match report.expected_cost() {
        Some(cost) => println!("Expected cost:     {:.0} gold", cost),
        None => println!("Expected cost:     n/a, no trial succeeded"),
    }
    println!(
        "Single slot odds:  {:.2}%",
        report.single_slot_probability() * 100.0
    );
    if let (Some(median), Some(p90)) = (report.cost_percentile(0.5), report.cost_percentile(0.9)) {
        println!("Median cost:       {} gold (90th percentile {})", median, p90);
    }

    let histogram = report.cost_histogram(histogram_bins);
    if !histogram.is_empty() {
        println!();
        println!("Gold spent by successful trials (budget {}):", report.gold());
        for line in render_histogram(&histogram) {
            println!("{}", line);
        }
    }

    println!();
    let advice = match report.verdict() {
        Verdict::Push => "Go for it!",
        Verdict::Hold => "Risky, consider holding.",
    };
    println!(
        "Verdict: {:.1}% to hit. {}",
        report.success_rate() * 100.0,
        advice
    );
}

fn render_histogram(histogram: &[HistogramBin]) -> Vec<String> {
    let peak = histogram.iter().map(|bin| bin.count).max().unwrap_or(0).max(1);
    histogram
        .iter()
        .map(|bin| {
            let bar = "#".repeat(bin.count * HISTOGRAM_WIDTH / peak);
            format!(
                "{:>6.1} - {:>6.1} | {:<width$} {}",
                bin.lower,
                bin.upper,
                bar,
                bin.count,
                width = HISTOGRAM_WIDTH
            )
        })
        .collect()
}
