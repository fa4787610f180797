//! Descriptive summary of a sales table.
//!
//! Everything here is a plain value: the console layout lives in the
//! Display impls, so the same summary can be printed or serialized.

use crate::{
    table::{Column, SalesTable},
    types::SalesRecord,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name:     String,
    pub non_null: usize,
    pub dtype:    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub rows:    usize,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullCount {
    pub column:  String,
    pub missing: usize,
}

/// count / mean / std / min / quartiles / max for one numeric column.
/// Missing values are skipped. Undefined statistics are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub count:  usize,
    pub mean:   f64,
    /// Sample standard deviation (n - 1).
    pub std:    f64,
    pub min:    f64,
    pub q25:    f64,
    pub median: f64,
    pub q75:    f64,
    pub max:    f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub head:        Vec<SalesRecord>,
    pub info:        TableInfo,
    pub null_counts: Vec<NullCount>,
    pub stats:       Vec<ColumnStats>,
}

impl DatasetSummary {
    pub fn stats_for(&self, column: Column) -> Option<&ColumnStats> {
        self.stats.iter().find(|s| s.column == column.label())
    }
}

pub fn summarize(table: &SalesTable, head_rows: usize) -> DatasetSummary {
    let info = TableInfo {
        rows:    table.len(),
        columns: Column::ALL
            .iter()
            .map(|c| ColumnInfo {
                name:     c.label().to_string(),
                non_null: table.len() - table.null_count(*c),
                dtype:    c.column_type().name().to_string(),
            })
            .collect(),
    };

    let null_counts = Column::ALL
        .iter()
        .map(|c| NullCount { column: c.label().to_string(), missing: table.null_count(*c) })
        .collect();

    let stats = Column::NUMERIC
        .iter()
        .map(|c| describe(c.label(), &table.numeric_column(*c)))
        .collect();

    DatasetSummary {
        head: table.head(head_rows).to_vec(),
        info,
        null_counts,
        stats,
    }
}

pub fn describe(column: &str, values: &[f64]) -> ColumnStats {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = mean(&sorted);
    let std = if count > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    ColumnStats {
        column: column.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Quantile of an ascending slice, interpolating linearly between the
/// two closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn write_record_rows(
    f: &mut fmt::Formatter<'_>,
    records: &[SalesRecord],
) -> fmt::Result {
    writeln!(
        f,
        "{:>3}  {:<10}  {:<7}  {:>10}  {:>10}  {:>10}",
        "", "Date", "Region", "Units Sold", "Unit Price", "Revenue"
    )?;
    for (i, r) in records.iter().enumerate() {
        writeln!(
            f,
            "{:>3}  {:<10}  {:<7}  {:>10}  {:>10.2}  {:>10.2}",
            i, r.date, r.region, r.units_sold, r.unit_price, r.revenue
        )?;
    }
    Ok(())
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "First {} rows of the dataset:", self.head.len())?;
        write_record_rows(f, &self.head)?;

        writeln!(f)?;
        writeln!(f, "Dataset Info:")?;
        writeln!(f, "{} entries, {} columns", self.info.rows, self.info.columns.len())?;
        writeln!(f, "{:>3}  {:<10}  {:>8}  {}", "#", "Column", "Non-Null", "Dtype")?;
        for (i, c) in self.info.columns.iter().enumerate() {
            writeln!(f, "{:>3}  {:<10}  {:>8}  {}", i, c.name, c.non_null, c.dtype)?;
        }

        writeln!(f)?;
        writeln!(f, "Missing Values:")?;
        for n in &self.null_counts {
            writeln!(f, "{:<10}  {}", n.column, n.missing)?;
        }

        writeln!(f)?;
        writeln!(f, "Statistical Summary:")?;
        write!(f, "{:<6}", "")?;
        for s in &self.stats {
            write!(f, "  {:>12}", s.column)?;
        }
        writeln!(f)?;

        let rows: [(&str, fn(&ColumnStats) -> f64); 8] = [
            ("count", |s| s.count as f64),
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.q25),
            ("50%", |s| s.median),
            ("75%", |s| s.q75),
            ("max", |s| s.max),
        ];
        for (label, pick) in rows {
            write!(f, "{label:<6}")?;
            for s in &self.stats {
                write!(f, "  {:>12.2}", pick(s))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
