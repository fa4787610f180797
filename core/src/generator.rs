//! Deterministic dataset generation.
//!
//! DRAW ORDER (fixed, never reordered):
//!   1. every record's region
//!   2. every record's units sold
//!   3. every record's unit price
//!
//! Columns are drawn whole, one after another, so the stream lines up
//! with the reference run. Drawing row by row would give a different table.

use crate::{
    config::GeneratorConfig,
    error::{SalesError, SalesResult},
    rng::SalesRng,
    table::SalesTable,
    types::{Region, SalesRecord},
};
use chrono::{Days, NaiveDate};

/// Generate the full sales table from `rng`.
pub fn generate_dataset(config: &GeneratorConfig, rng: &mut SalesRng) -> SalesResult<SalesTable> {
    config.validate()?;

    let dates = daily_dates(config.start_date, config.days)?;
    let n = dates.len();

    let regions: Vec<Region> = (0..n).map(|_| *rng.choose(&Region::ALL)).collect();
    let units: Vec<u32> = (0..n)
        .map(|_| rng.range_u32(config.units_min, config.units_max))
        .collect();
    let prices: Vec<f64> = (0..n)
        .map(|_| rng.uniform(config.price_min, config.price_max))
        .collect();

    let records: Vec<SalesRecord> = dates
        .into_iter()
        .zip(regions)
        .zip(units.into_iter().zip(prices))
        .map(|((date, region), (units_sold, unit_price))| {
            SalesRecord::new(date, region, units_sold, unit_price)
        })
        .collect();

    log::debug!(
        "Generated {} records from {} with rng={}",
        records.len(),
        config.start_date,
        rng.name()
    );
    Ok(SalesTable::new(records))
}

/// `days` consecutive calendar days starting at `start`.
pub fn daily_dates(start: NaiveDate, days: u32) -> SalesResult<Vec<NaiveDate>> {
    (0..days as u64)
        .map(|offset| {
            start
                .checked_add_days(Days::new(offset))
                .ok_or(SalesError::DateOverflow { start, days })
        })
        .collect()
}
