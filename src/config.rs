use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::{EligibilityRules, Matcher, RedistributionMode, ScoringWeights, WeightModel};
use crate::error::EngineError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub dataset: DatasetSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: f64,
    #[serde(default = "default_own_city_radius_km")]
    pub own_city_radius_km: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Largest budget gap a ranked candidate may have; unlimited when unset
    pub budget_window: Option<f64>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_radius_km: default_max_radius_km(),
            own_city_radius_km: default_own_city_radius_km(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            budget_window: None,
        }
    }
}

fn default_max_radius_km() -> f64 { 200.0 }
fn default_own_city_radius_km() -> f64 { 25.0 }
fn default_limit() -> usize { 10 }
fn default_max_limit() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_boost_multiplier")]
    pub boost_multiplier: f64,
    #[serde(default)]
    pub redistribution: RedistributionMode,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            boost_multiplier: default_boost_multiplier(),
            redistribution: RedistributionMode::default(),
        }
    }
}

fn default_boost_multiplier() -> f64 { 1.5 }

/// Base weights as written in config files (snake_case keys)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_destination_weight")]
    pub destination: f64,
    #[serde(default = "default_date_overlap_weight")]
    pub date_overlap: f64,
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_age_weight")]
    pub age: f64,
    #[serde(default = "default_personality_weight")]
    pub personality: f64,
    #[serde(default = "default_location_origin_weight")]
    pub location_origin: f64,
    #[serde(default = "default_lifestyle_weight")]
    pub lifestyle: f64,
    #[serde(default = "default_religion_weight")]
    pub religion: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            destination: default_destination_weight(),
            date_overlap: default_date_overlap_weight(),
            budget: default_budget_weight(),
            interests: default_interests_weight(),
            age: default_age_weight(),
            personality: default_personality_weight(),
            location_origin: default_location_origin_weight(),
            lifestyle: default_lifestyle_weight(),
            religion: default_religion_weight(),
        }
    }
}

fn default_destination_weight() -> f64 { 0.25 }
fn default_date_overlap_weight() -> f64 { 0.20 }
fn default_budget_weight() -> f64 { 0.20 }
fn default_interests_weight() -> f64 { 0.10 }
fn default_age_weight() -> f64 { 0.10 }
fn default_personality_weight() -> f64 { 0.05 }
fn default_location_origin_weight() -> f64 { 0.05 }
fn default_lifestyle_weight() -> f64 { 0.03 }
fn default_religion_weight() -> f64 { 0.02 }

impl From<WeightsConfig> for ScoringWeights {
    fn from(config: WeightsConfig) -> Self {
        ScoringWeights {
            destination: config.destination,
            date_overlap: config.date_overlap,
            budget: config.budget,
            interests: config.interests,
            age: config.age,
            personality: config.personality,
            location_origin: config.location_origin,
            lifestyle: config.lifestyle,
            religion: config.religion,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
    #[serde(default = "default_preset")]
    pub preset: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            preset: default_preset(),
        }
    }
}

fn default_dataset_path() -> PathBuf { PathBuf::from("data/match_events.jsonl") }
fn default_preset() -> String { "balanced".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

fn environment() -> Environment {
    // e.g., KOVARI__SERVER__PORT -> server.port
    Environment::with_prefix("KOVARI")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with KOVARI__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Immutable base weights, validated
    pub fn scoring_weights(&self) -> Result<ScoringWeights, EngineError> {
        let weights = ScoringWeights::from(self.scoring.weights);
        weights.validate()?;
        if !weights.sums_to_one() {
            tracing::warn!(
                "Scoring weights sum to {:.4}, scores may leave [0, 1]",
                weights.sum()
            );
        }
        Ok(weights)
    }

    pub fn eligibility_rules(&self) -> EligibilityRules {
        EligibilityRules {
            own_city_radius_km: self.matching.own_city_radius_km,
            max_radius_km: self.matching.max_radius_km,
        }
    }

    /// Build the matcher described by this configuration
    pub fn build_matcher(&self) -> Result<Matcher, EngineError> {
        if !(self.scoring.boost_multiplier.is_finite() && self.scoring.boost_multiplier > 0.0) {
            return Err(EngineError::invalid("scoring.boost_multiplier must be positive"));
        }

        let weights = WeightModel::new(self.scoring_weights()?, self.scoring.redistribution);
        Ok(Matcher::new(weights, self.eligibility_rules(), self.matching.budget_window))
    }
}
