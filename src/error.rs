//! Error types for the timeline pipeline

use thiserror::Error;

/// Errors that can occur while building or transforming a timeline
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Flag vector has {actual} entries, expected {expected}")]
    FlagCount { expected: usize, actual: usize },

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Frame sequence is empty")]
    EmptySequence,

    #[error(
        "Frame out of order: frame {index} at {timestamp}ms follows frame {previous_index} at {previous_timestamp}ms"
    )]
    OutOfOrderFrame {
        index: u64,
        timestamp: i64,
        previous_index: u64,
        previous_timestamp: i64,
    },

    #[error("Negative timestamp {timestamp}ms on frame {index}")]
    NegativeTimestamp { index: u64, timestamp: i64 },

    #[error("Invalid interval: begin {begin}ms is after end {end}ms")]
    InvalidInterval { begin: i64, end: i64 },

    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse frame records: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
