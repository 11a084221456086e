// Configuration module for reading Xings.toml
// This module provides the tunable parameters for pacing, sampling, the spatial index and the strategies

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub sampling: SamplingConfig,
    pub index: IndexConfig,
    pub strategies: StrategyConfig,
    pub scheduler: SchedulerConfig,
    pub journal: JournalConfig,
    pub profiling: ProfilingConfig,
}

/// Match clock and per-move budget constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Total thinking time granted to one player for the whole round
    pub match_time_limit_ms: u64,
    /// Kept in reserve so the player never runs into the referee's limit
    pub safety_buffer_ms: u64,
    /// Floor of the per-move budget
    pub min_move_budget_ms: u64,
    /// Spare time above which sampling grows
    pub slack_margin_ms: u64,
}

impl TimingConfig {
    pub fn match_time_limit(&self) -> Duration {
        Duration::from_millis(self.match_time_limit_ms)
    }

    pub fn safety_buffer(&self) -> Duration {
        Duration::from_millis(self.safety_buffer_ms)
    }

    pub fn min_move_budget(&self) -> Duration {
        Duration::from_millis(self.min_move_budget_ms.max(1))
    }

    pub fn slack_margin(&self) -> Duration {
        Duration::from_millis(self.slack_margin_ms)
    }
}

/// Candidate sampling constants
#[derive(Debug, Deserialize, Clone)]
pub struct SamplingConfig {
    pub initial_samples: u32,
    pub initial_perimeter: u32,
    /// Draw attempts per requested sample before giving up
    pub retry_factor: u32,
}

/// Spatial index constants
#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    /// Vertex count from which the R*-tree parameters are used
    pub big_tree_threshold: usize,
    /// Upper bound of the density grid tiling
    pub max_density_tiling: usize,
    /// Placed vertices per additional density tile row
    pub vertices_per_tiling_step: usize,
}

/// Strategy activation and geometry constants
#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    /// Strategies bound to the early game only run for this many moves
    pub early_game_moves: usize,
    pub bruteforce_max_cells: u64,
    pub bruteforce_min_percent_placed: f64,
    /// Sampling box around the farthest corner is canvas / divisor
    pub opposite_corner_divisor: i32,
    pub high_degree_corner_divisor: i32,
    pub dense_region_samples: usize,
    /// Strategy names (see StrategyName::as_str) that are never raced
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl StrategyConfig {
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d.eq_ignore_ascii_case(name))
    }
}

/// Worker pool constants
#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// 0 lets rayon pick the number of CPUs
    pub worker_threads: usize,
}

/// Move journal configuration
#[derive(Debug, Deserialize, Clone)]
pub struct JournalConfig {
    pub enabled: bool,
    pub directory: String,
}

/// Per-strategy profiling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ProfilingConfig {
    pub enabled: bool,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Xings.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads default configuration from Xings.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("Xings.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Xings.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                match_time_limit_ms: 300_000,
                safety_buffer_ms: 10_000,
                min_move_budget_ms: 5,
                slack_margin_ms: 1_000,
            },
            sampling: SamplingConfig {
                initial_samples: 10,
                initial_perimeter: 1,
                retry_factor: 4,
            },
            index: IndexConfig {
                big_tree_threshold: 10_000,
                max_density_tiling: 8,
                vertices_per_tiling_step: 16,
            },
            strategies: StrategyConfig {
                early_game_moves: 20,
                bruteforce_max_cells: 10_000,
                bruteforce_min_percent_placed: 70.0,
                opposite_corner_divisor: 3,
                high_degree_corner_divisor: 4,
                dense_region_samples: 10,
                disabled: Vec::new(),
            },
            scheduler: SchedulerConfig { worker_threads: 0 },
            journal: JournalConfig {
                enabled: false,
                directory: ".".to_string(),
            },
            profiling: ProfilingConfig { enabled: true },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Xings.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.sampling.retry_factor, 4);
        assert_eq!(config.index.big_tree_threshold, 10_000);
    }

    #[test]
    fn test_min_move_budget_is_never_zero() {
        let mut config = Config::default_hardcoded();
        config.timing.min_move_budget_ms = 0;
        assert!(config.timing.min_move_budget() > Duration::ZERO);
    }

    #[test]
    fn test_xings_toml_can_be_parsed() {
        let result = Config::from_file("Xings.toml");
        assert!(result.is_ok(), "Failed to parse Xings.toml: {:?}", result.err());
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Xings.toml").expect("Xings.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(
            file_config.timing.match_time_limit_ms,
            hardcoded.timing.match_time_limit_ms
        );
        assert_eq!(file_config.timing.safety_buffer_ms, hardcoded.timing.safety_buffer_ms);
        assert_eq!(
            file_config.timing.min_move_budget_ms,
            hardcoded.timing.min_move_budget_ms
        );
        assert_eq!(file_config.timing.slack_margin_ms, hardcoded.timing.slack_margin_ms);

        assert_eq!(
            file_config.sampling.initial_samples,
            hardcoded.sampling.initial_samples
        );
        assert_eq!(
            file_config.sampling.initial_perimeter,
            hardcoded.sampling.initial_perimeter
        );
        assert_eq!(file_config.sampling.retry_factor, hardcoded.sampling.retry_factor);

        assert_eq!(
            file_config.index.big_tree_threshold,
            hardcoded.index.big_tree_threshold
        );
        assert_eq!(
            file_config.index.max_density_tiling,
            hardcoded.index.max_density_tiling
        );

        assert_eq!(
            file_config.strategies.early_game_moves,
            hardcoded.strategies.early_game_moves
        );
        assert_eq!(
            file_config.strategies.bruteforce_max_cells,
            hardcoded.strategies.bruteforce_max_cells
        );
        assert_eq!(
            file_config.strategies.bruteforce_min_percent_placed,
            hardcoded.strategies.bruteforce_min_percent_placed
        );
        assert!(file_config.strategies.disabled.is_empty());
        assert_eq!(file_config.journal.enabled, hardcoded.journal.enabled);
    }

    #[test]
    fn test_disabled_strategy_lookup_ignores_case() {
        let mut config = Config::default_hardcoded();
        config.strategies.disabled = vec!["bruteforce_crossing".to_string()];
        assert!(config.strategies.is_disabled("BRUTEFORCE_CROSSING"));
        assert!(!config.strategies.is_disabled("random_move"));
    }

    #[test]
    fn test_missing_file_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }
}
