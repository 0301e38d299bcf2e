//! Output types for the timeline payload
//!
//! These are the serialized forms handed to downstream consumers once the
//! interval IR has been cleaned.

use crate::channel::Channel;
use serde::{Deserialize, Serialize};

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// One emitted interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Position in the sorted collection, used to disambiguate event names
    pub id: usize,
    pub channel: Channel,
    pub begin_ms: i64,
    pub end_ms: i64,
    pub duration_ms: i64,
    /// `begin_ms` formatted as `HH:MM:SS.CC`
    pub begin: String,
    /// `end_ms` formatted as `HH:MM:SS.CC`
    pub end: String,
}

/// Complete timeline payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePayload {
    pub timeline_version: String,
    pub producer: TimelineProducer,
    pub computed_at_utc: String,
    /// Number of real frames the intervals were built from
    pub frame_count: usize,
    pub intervals: Vec<TimelineEntry>,
}
