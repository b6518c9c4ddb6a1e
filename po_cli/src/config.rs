//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use poker_odds::{EstimatorConfig, StraightFlushRule, odds::DEFAULT_TRIALS};

/// Estimation settings loaded from the environment and the command line
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Monte Carlo trials per estimate
    pub trials: usize,
    /// Number of independently seeded trial slices
    pub workers: usize,
    /// Seed for every random draw; a fresh one is used when absent
    pub seed: Option<u64>,
    /// How straight flushes are recognised
    pub straight_flush_rule: StraightFlushRule,
}

/// Values given on the command line, taking priority over the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub trials: Option<usize>,
    pub workers: Option<usize>,
    pub seed: Option<u64>,
    pub straight_flush_rule: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to something unparsable
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`CliConfig::from_env`] with variables read through `lookup`.
    pub fn from_lookup<F>(overrides: CliOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let trials = match overrides.trials {
            Some(trials) => trials,
            None => parse_var_or(&lookup, "PO_TRIALS", DEFAULT_TRIALS)?,
        };
        let workers = match overrides.workers {
            Some(workers) => workers,
            None => parse_var_or(&lookup, "PO_WORKERS", 1)?,
        };
        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => lookup("PO_SEED")
                .map(|v| parse_var("PO_SEED", &v))
                .transpose()?,
        };

        let straight_flush_rule = match overrides
            .straight_flush_rule
            .or_else(|| lookup("PO_STRAIGHT_FLUSH_RULE"))
        {
            Some(v) => parse_rule(&v)?,
            None => StraightFlushRule::default(),
        };

        Ok(Self {
            trials,
            workers,
            seed,
            straight_flush_rule,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::Invalid {
                var: "PO_TRIALS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                var: "PO_WORKERS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.workers > self.trials {
            return Err(ConfigError::Invalid {
                var: "PO_WORKERS".to_string(),
                reason: format!("Cannot exceed trials ({})", self.trials),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn estimator(&self) -> EstimatorConfig {
        EstimatorConfig {
            trials: self.trials,
            workers: self.workers,
            straight_flush_rule: self.straight_flush_rule,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required value: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_rule(v: &str) -> Result<StraightFlushRule, ConfigError> {
    match v.to_lowercase().as_str() {
        "any-suit" | "any" => Ok(StraightFlushRule::AnySuit),
        "same-suit" | "same" => Ok(StraightFlushRule::SameSuit),
        other => Err(ConfigError::Invalid {
            var: "PO_STRAIGHT_FLUSH_RULE".to_string(),
            reason: format!("Expected any-suit or same-suit, got {other}"),
        }),
    }
}

fn parse_var<T>(key: &str, v: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: key.to_string(),
        reason: e.to_string(),
    })
}

/// Helper to parse a variable with default fallback when unset
fn parse_var_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => parse_var(key, &v),
        None => Ok(default),
    }
}
