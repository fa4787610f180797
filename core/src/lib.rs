//! Seeded synthetic sales data: generation, descriptive statistics,
//! regional aggregation and chart-ready views.

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod error;
pub mod generator;
pub mod observations;
pub mod pipeline;
pub mod render;
pub mod rng;
pub mod summary;
pub mod table;
pub mod types;
