//! The analysis pipeline.
//!
//! STAGE ORDER (fixed):
//!   1. validate config
//!   2. generate dataset (revenue derived per record)
//!   3. descriptive summary
//!   4. region aggregate
//!   5. chart views
//!   6. closing observations
//!
//! The pipeline never renders. Charts come back as data on the report
//! and the caller hands them to whichever ChartRenderer it wants.

use crate::{
    aggregate::{aggregate_by_region, RegionAggregates},
    charts::{build_charts, ChartSpec},
    config::GeneratorConfig,
    error::SalesResult,
    generator::generate_dataset,
    observations::{build_observations, Observations},
    rng::{RngAlgorithm, SalesRng},
    summary::{summarize, DatasetSummary},
    table::SalesTable,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub seed:         u64,
    pub rng:          RngAlgorithm,
    pub table:        SalesTable,
    pub summary:      DatasetSummary,
    pub aggregates:   RegionAggregates,
    pub charts:       Vec<ChartSpec>,
    pub observations: Option<Observations>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> SalesResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        writeln!(f)?;
        write!(f, "{}", self.aggregates)?;
        if let Some(observations) = &self.observations {
            writeln!(f)?;
            writeln!(f, "Observations:")?;
            for line in observations.lines() {
                writeln!(f, "- {line}")?;
            }
        }
        Ok(())
    }
}

pub struct SalesPipeline {
    config: GeneratorConfig,
}

impl SalesPipeline {
    pub fn new(config: GeneratorConfig) -> SalesResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// A fresh random source for this pipeline's seed and algorithm.
    pub fn rng(&self) -> SalesRng {
        SalesRng::new(self.config.rng, self.config.seed)
    }

    /// Run with a fresh random source built from the config.
    pub fn run(&self) -> SalesResult<AnalysisReport> {
        let mut rng = self.rng();
        self.run_with(&mut rng)
    }

    /// Run drawing from a caller-supplied random source. The report records
    /// the source's algorithm; the seed recorded is the config's.
    pub fn run_with(&self, rng: &mut SalesRng) -> SalesResult<AnalysisReport> {
        log::info!(
            "Pipeline start: seed={} rng={} days={} from {}",
            self.config.seed,
            rng.name(),
            self.config.days,
            self.config.start_date
        );

        let table = generate_dataset(&self.config, rng)?;
        let summary = summarize(&table, self.config.head_rows);
        let aggregates = aggregate_by_region(&table);
        let charts = build_charts(&table, &aggregates, self.config.histogram_bins);
        let observations = build_observations(&table, &aggregates);

        log::info!(
            "Pipeline done: {} records, {} regions, {} charts",
            table.len(),
            aggregates.len(),
            charts.len()
        );

        Ok(AnalysisReport {
            seed: self.config.seed,
            rng: rng.algorithm(),
            table,
            summary,
            aggregates,
            charts,
            observations,
        })
    }
}
