//! Shared record types used across the entire pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sales region. Declaration order is the canonical grouping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Central,
    North,
    South,
}

impl Region {
    /// Every region, in canonical order. Draws index into this slice,
    /// so NEVER reorder it.
    pub const ALL: [Region; 3] = [Region::Central, Region::North, Region::South];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Central => "Central",
            Self::North => "North",
            Self::South => "South",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One simulated daily sales observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date:       NaiveDate,
    pub region:     Region,
    pub units_sold: u32,
    pub unit_price: f64,
    /// Always `units_sold * unit_price`; never drawn independently.
    pub revenue:    f64,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, region: Region, units_sold: u32, unit_price: f64) -> Self {
        Self {
            date,
            region,
            units_sold,
            unit_price,
            revenue: compute_revenue(units_sold, unit_price),
        }
    }
}

/// Derived field: revenue for one record.
pub fn compute_revenue(units_sold: u32, unit_price: f64) -> f64 {
    units_sold as f64 * unit_price
}
