//! Magia Timeline - per-frame detection flags to clean subtitle intervals
//!
//! A classifier marks, for every video frame, which kinds of on-screen text are
//! present. This crate turns that noisy per-frame signal into non-overlapping,
//! timestamped intervals per channel through a two-stage pipeline:
//! frame-point IR (noise removal) → interval IR (gap bridging) → encoding.
//!
//! ## Modules
//!
//! - **fpir**: frame points, temporal noise removal, interval extraction
//! - **iir**: intervals, gap bridging between same-channel intervals
//! - **pipeline**: runs every pass in order with per-channel tuning

pub mod channel;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fpir;
pub mod iir;
pub mod pipeline;
pub mod schema;
pub mod types;

pub use channel::{Channel, ChannelFlags, CHANNEL_COUNT};
pub use config::{ChannelConfig, PipelineConfig};
pub use error::TimelineError;
pub use fpir::{Fpir, FpirPass, FramePoint};
pub use iir::{Iir, IirPass, Interval};
pub use pipeline::{frames_to_ass, frames_to_timeline_json, Timeline, TimelineProcessor};

// Schema exports
pub use schema::{FrameRecord, FrameRecordAdapter, SCHEMA_VERSION};

/// Crate version embedded in timeline payloads
pub const MAGIA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for timeline payloads
pub const PRODUCER_NAME: &str = "magia-timeline";
