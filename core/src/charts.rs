//! Chart-ready views of the analysis.
//!
//! Nothing here draws. Each ChartSpec is plain data that any renderer
//! (JSON export, text, a plotting frontend) can consume.

use crate::{aggregate::RegionAggregates, table::SalesTable, types::Region};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const DAILY_REVENUE: &str = "daily_revenue";
pub const REVENUE_BY_REGION: &str = "revenue_by_region";
pub const UNIT_PRICE_DISTRIBUTION: &str = "unit_price_distribution";
pub const UNITS_VS_REVENUE: &str = "units_vs_revenue";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub date:  NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarValue {
    pub label: String,
    pub value: f64,
}

/// Bin covering [lower, upper); the last bin also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub region: Region,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Line { points: Vec<DatePoint> },
    Bar { bars: Vec<BarValue> },
    Histogram { bins: Vec<HistogramBin> },
    Scatter { series: Vec<ScatterSeries> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id:      String,
    pub title:   String,
    pub x_label: String,
    pub y_label: String,
    pub data:    ChartData,
    /// Presentation hints (colour, palette, marker size...). Renderers
    /// may ignore any key they do not understand.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style:   BTreeMap<String, Value>,
}

impl ChartSpec {
    fn new(id: &str, title: &str, x_label: &str, y_label: &str, data: ChartData) -> Self {
        Self {
            id:      id.to_string(),
            title:   title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            data,
            style:   BTreeMap::new(),
        }
    }

    fn with_style(mut self, hints: &[(&str, Value)]) -> Self {
        self.style
            .extend(hints.iter().map(|(key, value)| (key.to_string(), value.clone())));
        self
    }

    pub fn style_hint(&self, key: &str) -> Option<&Value> {
        self.style.get(key)
    }
}

/// The four standard charts, in display order.
pub fn build_charts(
    table: &SalesTable,
    aggregates: &RegionAggregates,
    histogram_bins: usize,
) -> Vec<ChartSpec> {
    vec![
        daily_revenue_chart(table),
        revenue_by_region_chart(aggregates),
        unit_price_chart(&table.unit_prices(), histogram_bins),
        units_vs_revenue_chart(table),
    ]
}

pub fn daily_revenue_chart(table: &SalesTable) -> ChartSpec {
    let points = table
        .records()
        .iter()
        .map(|r| DatePoint { date: r.date, value: r.revenue })
        .collect();
    ChartSpec::new(DAILY_REVENUE, "Daily Revenue Trend", "Date", "Revenue", ChartData::Line { points })
        .with_style(&[
            ("color", json!("darkgreen")),
            ("line_width", json!(2)),
            ("x_tick_rotation", json!(45)),
            ("grid", json!(true)),
        ])
}

/// Bars follow the aggregate's order (descending mean revenue).
pub fn revenue_by_region_chart(aggregates: &RegionAggregates) -> ChartSpec {
    let bars = aggregates
        .rows()
        .iter()
        .map(|row| BarValue { label: row.region.name().to_string(), value: row.mean_revenue })
        .collect();
    ChartSpec::new(
        REVENUE_BY_REGION,
        "Average Revenue by Region",
        "Region",
        "Average Revenue",
        ChartData::Bar { bars },
    )
    .with_style(&[("palette", json!("coolwarm"))])
}

pub fn unit_price_chart(prices: &[f64], bins: usize) -> ChartSpec {
    ChartSpec::new(
        UNIT_PRICE_DISTRIBUTION,
        "Unit Price Distribution",
        "Unit Price",
        "Frequency",
        ChartData::Histogram { bins: histogram(prices, bins) },
    )
    .with_style(&[("color", json!("slateblue")), ("edge_color", json!("white"))])
}

/// One series per region present, in canonical region order.
pub fn units_vs_revenue_chart(table: &SalesTable) -> ChartSpec {
    let series = Region::ALL
        .iter()
        .filter_map(|region| {
            let points: Vec<ScatterPoint> = table
                .records()
                .iter()
                .filter(|r| r.region == *region)
                .map(|r| ScatterPoint { x: r.units_sold as f64, y: r.revenue })
                .collect();
            (!points.is_empty()).then_some(ScatterSeries { region: *region, points })
        })
        .collect();
    ChartSpec::new(
        UNITS_VS_REVENUE,
        "Units Sold vs Revenue by Region",
        "Units Sold",
        "Revenue",
        ChartData::Scatter { series },
    )
    .with_style(&[("palette", json!("Set2")), ("marker_size", json!(100))])
}

/// Equal-width histogram spanning [min, max] of the finite values.
///
/// A degenerate range (all values equal) is widened by 0.5 on each side;
/// no values gives bins over [0, 1]. Returns no bins when `bins == 0`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if bins == 0 {
        return Vec::new();
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if finite.is_empty() {
        (lo, hi) = (0.0, 1.0);
    } else if lo == hi {
        (lo, hi) = (lo - 0.5, hi + 0.5);
    }

    let width = hi - lo;
    let mut edges: Vec<f64> = (0..=bins)
        .map(|i| lo + width * i as f64 / bins as f64)
        .collect();
    // lo + width can round below hi; the closed last bin must end at the max.
    edges[bins] = hi;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let mut index = (((v - lo) / width) * bins as f64) as usize;
        index = index.min(bins - 1);
        // Float error near an edge can land one bin off.
        if index > 0 && v < edges[index] {
            index -= 1;
        } else if index + 1 < bins && v >= edges[index + 1] {
            index += 1;
        }
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin { lower: edges[i], upper: edges[i + 1], count })
        .collect()
}
