//! Closing observations, derived from the data rather than written by hand.

use crate::{
    aggregate::RegionAggregates,
    summary::quantile,
    table::{Column, SalesTable},
    types::{Region, SalesRecord},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRevenue {
    pub date:    NaiveDate,
    pub region:  Region,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    pub peak_day:                  DayRevenue,
    pub lowest_day:                DayRevenue,
    pub region_ranking:            Vec<Region>,
    /// 10th and 90th percentile of unit price.
    pub price_bulk:                (f64, f64),
    pub price_range:               (f64, f64),
    pub units_revenue_correlation: f64,
}

/// None for an empty table.
pub fn build_observations(table: &SalesTable, aggregates: &RegionAggregates) -> Option<Observations> {
    let records = table.records();
    // Earliest day wins ties.
    let peak = records.iter().reduce(|best, r| if r.revenue > best.revenue { r } else { best })?;
    let lowest = records.iter().reduce(|best, r| if r.revenue < best.revenue { r } else { best })?;

    let mut prices = table.unit_prices();
    prices.sort_by(f64::total_cmp);

    let units = table.numeric_column(Column::UnitsSold);
    let revenues = table.revenues();

    Some(Observations {
        peak_day: day_revenue(peak),
        lowest_day: day_revenue(lowest),
        region_ranking: aggregates.ranking(),
        price_bulk: (quantile(&prices, 0.10), quantile(&prices, 0.90)),
        price_range: (quantile(&prices, 0.0), quantile(&prices, 1.0)),
        units_revenue_correlation: pearson(&units, &revenues),
    })
}

fn day_revenue(record: &SalesRecord) -> DayRevenue {
    DayRevenue { date: record.date, region: record.region, revenue: record.revenue }
}

/// Pearson correlation coefficient. NaN when either side has no variance
/// or the lengths differ.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

/// Qualitative label for a correlation coefficient.
pub fn correlation_label(r: f64) -> &'static str {
    if !r.is_finite() {
        return "undefined";
    }
    match (r.abs(), r >= 0.0) {
        (a, true) if a >= 0.7 => "strong positive",
        (a, false) if a >= 0.7 => "strong negative",
        (a, true) if a >= 0.4 => "moderate positive",
        (a, false) if a >= 0.4 => "moderate negative",
        (a, _) if a >= 0.1 => "weak",
        _ => "negligible",
    }
}

impl Observations {
    pub fn lines(&self) -> Vec<String> {
        let ranking = self
            .region_ranking
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(", then ");
        vec![
            format!(
                "Revenue peaks on {} ({}) at {:.2} and bottoms out on {} ({}) at {:.2}.",
                self.peak_day.date,
                self.peak_day.region,
                self.peak_day.revenue,
                self.lowest_day.date,
                self.lowest_day.region,
                self.lowest_day.revenue
            ),
            format!("Average revenue by region ranks {ranking}."),
            format!(
                "Unit prices mostly fall between ${:.2} and ${:.2} (full range ${:.2} to ${:.2}).",
                self.price_bulk.0, self.price_bulk.1, self.price_range.0, self.price_range.1
            ),
            format!(
                "Units sold and revenue show a {} correlation (r = {:.2}).",
                correlation_label(self.units_revenue_correlation),
                self.units_revenue_correlation
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_detects_perfect_lines() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
        assert!(pearson(&xs, &[1.0, 1.0, 1.0, 1.0]).is_nan());
        assert!(pearson(&xs, &[1.0]).is_nan());
    }

    #[test]
    fn correlation_labels() {
        assert_eq!(correlation_label(0.85), "strong positive");
        assert_eq!(correlation_label(-0.5), "moderate negative");
        assert_eq!(correlation_label(0.2), "weak");
        assert_eq!(correlation_label(0.01), "negligible");
        assert_eq!(correlation_label(f64::NAN), "undefined");
    }

    #[test]
    fn empty_table_has_no_observations() {
        let table = SalesTable::default();
        let aggregates = crate::aggregate::aggregate_by_region(&table);
        assert!(build_observations(&table, &aggregates).is_none());
    }
}
