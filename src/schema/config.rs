//! Configuration types for recipe evolution runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of generations to run when none is given on the command line.
    /// Unset means the CLI asks for it.
    #[serde(default)]
    pub generations: Option<usize>,
    /// Mutation settings applied to every offspring.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// How survivors are drawn from the old and new populations.
    #[serde(default)]
    pub survivors: SurvivorSplit,
    /// Number of ranked recipes written at the end of a run.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Breed offspring on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Directory holding the seed corpus, one recipe per file.
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    /// Directory receiving the ranked recipes.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generations: None,
            mutation: MutationConfig::default(),
            survivors: SurvivorSplit::default(),
            top_k: default_top_k(),
            parallel: default_parallel(),
            random_seed: None,
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_top_k() -> usize {
    5
}
fn default_parallel() -> bool {
    true
}
fn default_input_dir() -> String {
    "input".to_string()
}
fn default_output_dir() -> String {
    "fittest recipes".to_string()
}

/// Mutation operator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that an offspring is mutated at all (0.0-1.0).
    #[serde(default = "default_mutation_probability")]
    pub probability: f64,
    /// Range of the multiplicative factor used by `change_amount`.
    #[serde(default = "default_amount_factor_bounds")]
    pub amount_factor_bounds: (f64, f64),
    /// Range of the amount given to an added ingredient (half-open).
    #[serde(default = "default_new_amount_bounds")]
    pub new_amount_bounds: (f64, f64),
    /// Normalization applied after a mutation.
    #[serde(default)]
    pub normalization: NormalizationConfig,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            probability: default_mutation_probability(),
            amount_factor_bounds: default_amount_factor_bounds(),
            new_amount_bounds: default_new_amount_bounds(),
            normalization: NormalizationConfig::default(),
        }
    }
}

fn default_mutation_probability() -> f64 {
    0.4
}
fn default_amount_factor_bounds() -> (f64, f64) {
    (0.1, 1.9)
}
fn default_new_amount_bounds() -> (f64, f64) {
    (0.0, 100.0)
}

/// Target total and pruning threshold for `Recipe::normalize_with`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Total amount (oz) a normalized recipe sums to.
    #[serde(default = "default_target_total")]
    pub target_total: f64,
    /// Ingredients below this amount (oz) after scaling are dropped.
    #[serde(default = "default_min_amount")]
    pub min_amount: f64,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            target_total: default_target_total(),
            min_amount: default_min_amount(),
        }
    }
}

fn default_target_total() -> f64 {
    100.0
}
fn default_min_amount() -> f64 {
    0.01
}

/// Survivor selection policy.
///
/// Both policies keep the fitter part of the old population and the fitter
/// part of the offspring; they differ only in how odd sizes are rounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SurvivorSplit {
    /// Keep `floor(n / 2)` of each side. Odd populations shrink.
    #[default]
    Floor,
    /// Keep `ceil(n / 2)` of the old population and `floor(m / 2)` of the
    /// offspring, so a population bred to its own size stays constant.
    PreserveSize,
}

impl SurvivorSplit {
    /// Number of old and new recipes that survive.
    pub fn keep_counts(self, old_len: usize, new_len: usize) -> (usize, usize) {
        match self {
            SurvivorSplit::Floor => (old_len / 2, new_len / 2),
            SurvivorSplit::PreserveSize => (old_len.div_ceil(2), new_len / 2),
        }
    }
}

impl EvolutionConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: EvolutionConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generations == Some(0) {
            return Err(ConfigError::InvalidGenerations);
        }

        let m = &self.mutation;
        if !(0.0..=1.0).contains(&m.probability) {
            return Err(ConfigError::InvalidProbability(m.probability));
        }

        let check_bounds = |bounds: (f64, f64), name: &str| {
            if bounds.0 < 0.0 || bounds.0 > bounds.1 {
                Err(ConfigError::InvalidBounds(format!(
                    "{} min ({}) must be non-negative and <= max ({})",
                    name, bounds.0, bounds.1
                )))
            } else {
                Ok(())
            }
        };
        check_bounds(m.amount_factor_bounds, "amount_factor")?;
        check_bounds(m.new_amount_bounds, "new_amount")?;

        if m.normalization.target_total <= 0.0 {
            return Err(ConfigError::InvalidTargetTotal(m.normalization.target_total));
        }
        if m.normalization.min_amount < 0.0 {
            return Err(ConfigError::InvalidMinAmount(m.normalization.min_amount));
        }
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Mutation probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),
    #[error("Normalization target total must be positive, got {0}")]
    InvalidTargetTotal(f64),
    #[error("Normalization minimum amount must be non-negative, got {0}")]
    InvalidMinAmount(f64),
    #[error("generations must be at least 1")]
    InvalidGenerations,
    #[error("top_k must be at least 1")]
    InvalidTopK,
    #[error("Failed to read config: {0}")]
    Io(String),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
