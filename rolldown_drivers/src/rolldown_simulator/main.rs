mod simulation;

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use rolldown::Tier;
use rolldown_drivers::{parse_config_from_file, Config};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "~/.rolldown.yml";

/// Estimates the odds of finding the copies you need before your gold runs out.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Player level
    #[arg(long)]
    level: Option<u8>,

    /// Cost tier of the wanted card, 1 to 5
    #[arg(long, value_parser = parse_tier)]
    tier: Option<Tier>,

    /// Gold available for refreshing
    #[arg(long)]
    gold: Option<u32>,

    /// Copies still needed
    #[arg(long)]
    copies: Option<u32>,

    /// Copies of the wanted card held by other players
    #[arg(long)]
    target_taken: Option<u32>,

    /// Copies of other cards of the same tier held by other players
    #[arg(long)]
    other_taken: Option<u32>,

    /// Locked entities of the tier that have been unlocked
    #[arg(long)]
    unlocked: Option<u32>,

    /// Number of trials
    #[arg(short, long)]
    trials: Option<u32>,

    /// Seed of the random generator, for repeatable runs
    #[arg(long)]
    seed: Option<u64>,
}

impl CommandLineArgs {
    fn apply(&self, config: &mut Config) {
        let request = &mut config.request;
        if let Some(level) = self.level {
            request.level = level;
        }
        if let Some(tier) = self.tier {
            request.tier = tier;
        }
        if let Some(gold) = self.gold {
            request.gold = gold;
        }
        if let Some(copies) = self.copies {
            request.copies_needed = copies;
        }
        if let Some(target_taken) = self.target_taken {
            request.target_taken = target_taken;
        }
        if let Some(other_taken) = self.other_taken {
            request.other_taken = other_taken;
        }
        if let Some(unlocked) = self.unlocked {
            request.unlocked = Some(unlocked);
            request.locked = None;
        }
        if let Some(trials) = self.trials {
            config.simulator.trial_count = trials;
        }
        if self.seed.is_some() {
            config.simulator.seed = self.seed;
        }
    }
}

fn parse_tier(value: &str) -> Result<Tier, String> {
    let cost: u8 = value
        .parse()
        .map_err(|_| format!("{} is not a tier", value))?;
    Tier::try_from(cost).map_err(|err| err.to_string())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("ROLLDOWN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config named on the command line. The default path may be absent,
/// in which case the built-in defaults are used.
fn load_config(path: &str) -> anyhow::Result<Config> {
    if path != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(path).with_context(|| format!("loading {}", path));
    }

    let home_dir = home::home_dir().context("Cannot find home directory")?;
    let config_file_path = home_dir.join(".rolldown.yml");
    if !config_file_path.exists() {
        warn!("{} not found, using defaults", DEFAULT_CONFIG_PATH);
        return Ok(Config::default());
    }
    if config_file_path.is_dir() {
        bail!("This should be a path rather than a directory");
    }
    let path = path_to_str(&config_file_path)?;
    Ok(parse_config_from_file(path)?)
}

fn path_to_str(path: &Path) -> anyhow::Result<&str> {
    path.to_str()
        .with_context(|| format!("{} is not valid UTF-8", path.display()))
}

fn main() {
    init_tracing();
    let args = CommandLineArgs::parse();

    let result = load_config(&args.config).and_then(|mut config| {
        args.apply(&mut config);
        simulation::run(&config)
    });
    if let Err(err) = result {
        eprintln!("error: {}", simulation::describe_failure(&err));
        std::process::exit(1);
    }
}
