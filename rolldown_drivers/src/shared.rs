use rolldown::{Edition, SimulationError, SimulationRequest, Tier, TierConfig};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown edition {0}")]
    UnknownEdition(String),

    #[error(transparent)]
    Tiers(#[from] SimulationError),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub request: ConfigRequest,
    #[serde(default)]
    pub simulator: ConfigSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRequest {
    #[serde(default = "default_edition")]
    pub edition: String,
    /// Replaces the edition's tables when present.
    #[serde(default)]
    pub custom_tiers: Option<TierConfig>,
    pub level: u8,
    /// Cost tier of the wanted card, written as 1 to 5.
    pub tier: Tier,
    pub gold: u32,
    pub copies_needed: u32,
    #[serde(default)]
    pub target_taken: u32,
    #[serde(default)]
    pub other_taken: u32,
    /// Default locked entities the player has unlocked.
    #[serde(default)]
    pub unlocked: Option<u32>,
    /// Exact number of locked entities. Cannot be combined with `unlocked`.
    #[serde(default)]
    pub locked: Option<u32>,
}

impl Default for ConfigRequest {
    fn default() -> Self {
        ConfigRequest {
            edition: default_edition(),
            custom_tiers: None,
            level: 8,
            tier: Tier::Four,
            gold: 50,
            copies_needed: 3,
            target_taken: 0,
            other_taken: 10,
            unlocked: None,
            locked: None,
        }
    }
}

impl ConfigRequest {
    /// Tables to roll against: the custom ones if given, otherwise the edition's.
    pub fn tiers(&self) -> Result<TierConfig, ConfigError> {
        let tiers = match &self.custom_tiers {
            Some(tiers) => {
                tiers.validate()?;
                tiers.clone()
            }
            None => {
                let edition: Edition = self
                    .edition
                    .parse()
                    .map_err(|_| ConfigError::UnknownEdition(self.edition.clone()))?;
                edition.tiers()
            }
        };
        Ok(tiers)
    }

    pub fn to_request<'a>(
        &self,
        tiers: &'a TierConfig,
        trial_count: u32,
    ) -> Result<SimulationRequest<'a>, ConfigError> {
        let mut request = SimulationRequest {
            gold: self.gold,
            copies_needed: self.copies_needed,
            target_taken: self.target_taken,
            other_taken: self.other_taken,
            trial_count,
            locked: self.locked,
            ..SimulationRequest::new(tiers, self.level, self.tier)
        };
        if let Some(unlocked) = self.unlocked {
            if self.locked.is_some() {
                return Err(ConfigError::Invalid(String::from(
                    "set either locked or unlocked, not both",
                )));
            }
            request = request.with_unlocked(unlocked);
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSimulator {
    pub trial_count: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

impl Default for ConfigSimulator {
    fn default() -> Self {
        ConfigSimulator {
            trial_count: 1000,
            seed: None,
            histogram_bins: default_histogram_bins(),
        }
    }
}

fn default_edition() -> String {
    Edition::S16.to_string()
}

fn default_histogram_bins() -> usize {
    20
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Io {
        path: String::from(filename),
        source,
    })?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPICAL_CONFIG: &str = r#"
request:
  edition: S10
  level: 8
  tier: 4
  gold: 60
  copies_needed: 2
  target_taken: 1
  other_taken: 12
simulator:
  trial_count: 500
  seed: 7
"#;

    #[test]
    fn can_parse_config() {
        let config = parse_config(TYPICAL_CONFIG).unwrap();
        assert_eq!(config.request.edition, "S10");
        assert_eq!(config.request.gold, 60);
        assert_eq!(config.request.unlocked, None);
        assert_eq!(config.simulator.trial_count, 500);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.simulator.histogram_bins, 20);
    }

    #[test]
    fn can_convert_request() {
        let config = parse_config(TYPICAL_CONFIG).unwrap();
        let tiers = config.request.tiers().unwrap();
        assert_eq!(tiers, Edition::S10.tiers());
        let request = config
            .request
            .to_request(&tiers, config.simulator.trial_count)
            .unwrap();
        assert_eq!(request.tier, Tier::Four);
        assert_eq!(request.level, 8);
        assert_eq!(request.copies_needed, 2);
        assert_eq!(request.target_taken, 1);
        assert_eq!(request.other_taken, 12);
        assert_eq!(request.trial_count, 500);
        assert_eq!(request.locked_count(), 0);
    }

    #[test]
    fn simulator_section_is_optional() {
        let config = parse_config(
            r#"
request:
  level: 7
  tier: 3
  gold: 30
  copies_needed: 1
  unlocked: 2
"#,
        )
        .unwrap();
        assert_eq!(config.simulator.trial_count, 1000);
        assert_eq!(config.request.edition, "S16");
        let tiers = config.request.tiers().unwrap();
        let request = config.request.to_request(&tiers, 1000).unwrap();
        assert_eq!(request.locked_count(), 3);
    }

    #[test]
    fn custom_tiers_replace_edition() {
        let config = parse_config(
            r#"
request:
  edition: not checked
  custom_tiers:
    tiers:
      - { pool_per_entity: 22, distinct_entities: 13 }
      - { pool_per_entity: 20, distinct_entities: 13 }
      - { pool_per_entity: 17, distinct_entities: 13 }
      - { pool_per_entity: 10, distinct_entities: 12, default_locked: 2 }
      - { pool_per_entity: 9, distinct_entities: 8 }
    drop_rates:
      1: [1.0]
      8: [0.18, 0.25, 0.32, 0.22, 0.03]
  level: 8
  tier: 4
  gold: 50
  copies_needed: 1
"#,
        )
        .unwrap();
        let tiers = config.request.tiers().unwrap();
        assert_eq!(tiers.stats(Tier::Four).default_locked, 2);
        assert_eq!(tiers.stats(Tier::One).default_locked, 0);
        assert_eq!(tiers.tier_hit_probability(1, Tier::Two), Some(0.0));
        let request = config.request.to_request(&tiers, 10).unwrap();
        assert_eq!(request.locked_count(), 2);
    }

    #[test]
    fn should_return_error_when_converting_request() {
        let mut config = parse_config(TYPICAL_CONFIG).unwrap();
        config.request.edition = String::from("Not an edition");
        assert!(matches!(
            config.request.tiers(),
            Err(ConfigError::UnknownEdition(_))
        ));

        let tiers = Edition::S10.tiers();
        config.request.tier = Tier::Two;
        config.request.locked = Some(1);
        config.request.unlocked = Some(1);
        assert!(matches!(
            config.request.to_request(&tiers, 10),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn out_of_range_tier_is_rejected_while_parsing() {
        let err = parse_config(&TYPICAL_CONFIG.replace("tier: 4", "tier: 6")).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
        assert!(err.to_string().contains("tier must be in [1, 5], got 6"));

        let config = parse_config(&TYPICAL_CONFIG.replace("tier: 4", "tier: 1")).unwrap();
        assert_eq!(config.request.tier, Tier::One);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            parse_config_from_file("/nonexistent/rolldown.yml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
