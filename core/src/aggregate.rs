//! Per-region aggregation.
//!
//! Algorithm: group records by region, average units sold and revenue
//! per group, then order groups by descending mean revenue. Groups start
//! in canonical region order and the sort is stable, so equal means
//! keep that order.

use crate::{table::SalesTable, types::Region};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAggregate {
    pub region:          Region,
    pub records:         usize,
    pub mean_units_sold: f64,
    pub mean_revenue:    f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionAggregates {
    rows: Vec<RegionAggregate>,
}

#[derive(Default)]
struct Accumulator {
    records:     usize,
    units_sum:   f64,
    revenue_sum: f64,
}

/// Compute the region aggregate. Regions with no records get no row.
pub fn aggregate_by_region(table: &SalesTable) -> RegionAggregates {
    let mut groups: BTreeMap<Region, Accumulator> = BTreeMap::new();
    for record in table.records() {
        let acc = groups.entry(record.region).or_default();
        acc.records += 1;
        acc.units_sum += record.units_sold as f64;
        acc.revenue_sum += record.revenue;
    }

    let mut rows: Vec<RegionAggregate> = groups
        .into_iter()
        .map(|(region, acc)| RegionAggregate {
            region,
            records: acc.records,
            mean_units_sold: acc.units_sum / acc.records as f64,
            mean_revenue: acc.revenue_sum / acc.records as f64,
        })
        .collect();

    // sort_by is stable: ties stay in canonical region order.
    rows.sort_by(|a, b| b.mean_revenue.total_cmp(&a.mean_revenue));

    log::debug!(
        "Aggregated {} records into {} regions",
        table.len(),
        rows.len()
    );
    RegionAggregates { rows }
}

impl RegionAggregates {
    pub fn rows(&self) -> &[RegionAggregate] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, region: Region) -> Option<&RegionAggregate> {
        self.rows.iter().find(|r| r.region == region)
    }

    /// Regions from highest to lowest mean revenue.
    pub fn ranking(&self) -> Vec<Region> {
        self.rows.iter().map(|r| r.region).collect()
    }
}

impl fmt::Display for RegionAggregates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Units Sold and Revenue by Region:")?;
        writeln!(f, "{:<8}  {:>7}  {:>10}  {:>10}", "Region", "Records", "Units Sold", "Revenue")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<8}  {:>7}  {:>10.2}  {:>10.2}",
                row.region, row.records, row.mean_units_sold, row.mean_revenue
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SalesRecord;
    use chrono::NaiveDate;

    fn record(day: u32, region: Region, units: u32, price: f64) -> SalesRecord {
        SalesRecord::new(NaiveDate::from_ymd_opt(2025, 3, day).unwrap(), region, units, price)
    }

    #[test]
    fn equal_means_keep_canonical_order() {
        // South is seen first but Central sorts first on a tie.
        let table = SalesTable::new(vec![
            record(1, Region::South, 100, 10.0),
            record(2, Region::Central, 50, 20.0),
            record(3, Region::North, 10, 10.0),
        ]);
        let agg = aggregate_by_region(&table);
        assert_eq!(agg.ranking(), vec![Region::Central, Region::South, Region::North]);
    }

    #[test]
    fn absent_regions_get_no_row() {
        let table = SalesTable::new(vec![
            record(1, Region::North, 100, 10.0),
            record(2, Region::North, 200, 10.0),
        ]);
        let agg = aggregate_by_region(&table);
        assert_eq!(agg.len(), 1);
        let north = agg.get(Region::North).unwrap();
        assert_eq!(north.records, 2);
        assert_eq!(north.mean_units_sold, 150.0);
        assert_eq!(north.mean_revenue, 1500.0);
        assert!(agg.get(Region::South).is_none());
    }

    #[test]
    fn empty_table_aggregates_to_nothing() {
        assert!(aggregate_by_region(&SalesTable::default()).is_empty());
    }
}
