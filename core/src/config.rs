//! Generator configuration.
//!
//! Every field defaults to the reference run: seed 42, 45 daily records
//! from 2025-03-01, units in [50, 300), prices in [20.0, 100.0).
//! A JSON file may override any subset of fields.

use crate::{
    error::{SalesError, SalesResult},
    rng::RngAlgorithm,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DAYS: u32 = 45;
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;
pub const DEFAULT_HEAD_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed:           u64,
    pub rng:            RngAlgorithm,
    pub start_date:     NaiveDate,
    pub days:           u32,
    pub units_min:      u32,
    /// Exclusive.
    pub units_max:      u32,
    pub price_min:      f64,
    /// Exclusive.
    pub price_max:      f64,
    pub histogram_bins: usize,
    pub head_rows:      usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed:           DEFAULT_SEED,
            rng:            RngAlgorithm::Mt19937,
            start_date:     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or(NaiveDate::MIN),
            days:           DEFAULT_DAYS,
            units_min:      50,
            units_max:      300,
            price_min:      20.0,
            price_max:      100.0,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            head_rows:      DEFAULT_HEAD_ROWS,
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> SalesResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SalesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded generator config from {}", path.display());
        Ok(config)
    }

    /// Reject parameters the generator cannot draw from.
    pub fn validate(&self) -> SalesResult<()> {
        if self.days == 0 {
            return Err(invalid("days", "must be at least 1".into()));
        }
        if self.units_min >= self.units_max {
            return Err(invalid(
                "units_max",
                format!("must exceed units_min ({} >= {})", self.units_min, self.units_max),
            ));
        }
        if !self.price_min.is_finite() || !self.price_max.is_finite() {
            return Err(invalid("price_max", "price bounds must be finite".into()));
        }
        if self.price_min >= self.price_max {
            return Err(invalid(
                "price_max",
                format!("must exceed price_min ({} >= {})", self.price_min, self.price_max),
            ));
        }
        if self.histogram_bins == 0 {
            return Err(invalid("histogram_bins", "must be at least 1".into()));
        }
        if self.rng == RngAlgorithm::Mt19937 && self.seed > u32::MAX as u64 {
            return Err(invalid(
                "seed",
                format!("mt19937 seeds must fit in 32 bits, got {}", self.seed),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SalesError {
    SalesError::InvalidConfig { field, reason }
}
