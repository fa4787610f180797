//! The in-memory sales table and its column views.
//!
//! Built once by the generator and read-only afterwards.

use crate::types::{Region, SalesRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column storage type, reported by the info block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Date,
    Category,
    Int64,
    Float64,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Category => "category",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
        }
    }
}

/// Every column of the table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Date,
    Region,
    UnitsSold,
    UnitPrice,
    Revenue,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Date,
        Column::Region,
        Column::UnitsSold,
        Column::UnitPrice,
        Column::Revenue,
    ];

    /// Columns that get descriptive statistics.
    pub const NUMERIC: [Column; 3] = [Column::UnitsSold, Column::UnitPrice, Column::Revenue];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Region => "Region",
            Self::UnitsSold => "Units Sold",
            Self::UnitPrice => "Unit Price",
            Self::Revenue => "Revenue",
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Date => ColumnType::Date,
            Self::Region => ColumnType::Category,
            Self::UnitsSold => ColumnType::Int64,
            Self::UnitPrice | Self::Revenue => ColumnType::Float64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// The first `n` records (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[SalesRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn regions(&self) -> Vec<Region> {
        self.records.iter().map(|r| r.region).collect()
    }

    pub fn unit_prices(&self) -> Vec<f64> {
        self.numeric_column(Column::UnitPrice)
    }

    pub fn revenues(&self) -> Vec<f64> {
        self.numeric_column(Column::Revenue)
    }

    /// A numeric column as floats. Non-numeric columns yield an empty vec.
    pub fn numeric_column(&self, column: Column) -> Vec<f64> {
        let pick: fn(&SalesRecord) -> f64 = match column {
            Column::UnitsSold => |r| r.units_sold as f64,
            Column::UnitPrice => |r| r.unit_price,
            Column::Revenue => |r| r.revenue,
            Column::Date | Column::Region => return Vec::new(),
        };
        self.records.iter().map(pick).collect()
    }

    /// Missing values in a column. Only non-finite floats count as missing;
    /// dates, regions and unit counts cannot be absent.
    pub fn null_count(&self, column: Column) -> usize {
        match column {
            Column::UnitPrice | Column::Revenue => self
                .numeric_column(column)
                .iter()
                .filter(|v| !v.is_finite())
                .count(),
            Column::Date | Column::Region | Column::UnitsSold => 0,
        }
    }

    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SalesTable {
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        SalesTable::new(vec![
            SalesRecord::new(day(1), Region::North, 100, 20.0),
            SalesRecord::new(day(2), Region::South, 50, f64::NAN),
            SalesRecord::new(day(3), Region::Central, 75, 40.0),
        ])
    }

    #[test]
    fn head_is_clamped_to_length() {
        let table = sample();
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
    }

    #[test]
    fn non_finite_prices_count_as_missing() {
        let table = sample();
        assert_eq!(table.null_count(Column::UnitPrice), 1);
        // NaN price propagates into the derived revenue.
        assert_eq!(table.null_count(Column::Revenue), 1);
        assert_eq!(table.null_count(Column::UnitsSold), 0);
    }

    #[test]
    fn non_numeric_columns_have_no_numeric_view() {
        assert!(sample().numeric_column(Column::Region).is_empty());
        assert_eq!(sample().numeric_column(Column::UnitsSold), vec![100.0, 50.0, 75.0]);
    }
}
