use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::store::genome::GenomeError;
use crate::store::map::{DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR, DEFAULT_MAX_PROBE};

/// What to do when a record arrives for an RSID that is already stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `GenomeError::DuplicateKey` and keep the stored record
    #[default]
    Reject,
    /// Replace the stored record
    Overwrite,
}

/// Sizing and insertion settings for a [`Genome`](crate::store::genome::Genome)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    /// Slots allocated up front, rounded up to a power of two
    pub initial_capacity: usize,

    /// Load factor above which the table doubles, in `(0, 1)`
    pub max_load_factor: f64,

    /// Longest probe sequence tolerated before the table doubles
    pub max_probe: usize,

    pub duplicate_policy: DuplicatePolicy,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            max_probe: DEFAULT_MAX_PROBE,
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

impl GenomeConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Io` if the file cannot be read, or
    /// `GenomeError::InvalidConfig` if it is not valid JSON or fails validation.
    pub fn load_from_file(path: &Path) -> Result<Self, GenomeError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| GenomeError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    #[must_use]
    pub fn with_max_probe(mut self, max_probe: usize) -> Self {
        self.max_probe = max_probe;
        self
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// # Errors
    ///
    /// Returns `GenomeError::InvalidConfig` if the load factor is outside
    /// `(0, 1)`, the probe bound is zero, or the capacity is zero or too large
    /// to round up to a power of two.
    pub fn validate(&self) -> Result<(), GenomeError> {
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(GenomeError::InvalidConfig(format!(
                "max_load_factor must be in (0, 1), got {}",
                self.max_load_factor
            )));
        }
        if self.max_probe == 0 {
            return Err(GenomeError::InvalidConfig(
                "max_probe must be at least 1".to_string(),
            ));
        }
        if self.initial_capacity == 0 || self.initial_capacity.checked_next_power_of_two().is_none()
        {
            return Err(GenomeError::InvalidConfig(format!(
                "initial_capacity {} is not usable",
                self.initial_capacity
            )));
        }
        Ok(())
    }
}
