use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path:   String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Date range of {days} days from {start} overflows the calendar")]
    DateOverflow { start: NaiveDate, days: u32 },

    #[error("Renderer '{name}' unavailable: {reason}")]
    RendererUnavailable { name: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SalesResult<T> = Result<T, SalesError>;
