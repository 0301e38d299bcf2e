//! Timeline encoding
//!
//! Renders the cleaned interval IR for downstream consumers:
//! - ASS subtitle events, one `Dialogue:` line per interval
//! - JSON timeline payloads with producer metadata

use crate::error::TimelineError;
use crate::iir::Iir;
use crate::types::{TimelineEntry, TimelinePayload, TimelineProducer};
use crate::{MAGIA_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Current timeline payload version
pub const TIMELINE_VERSION: &str = "1.0.0";

/// Format milliseconds as `HH:MM:SS.CC`.
///
/// Centiseconds are truncated, not rounded. Hours wrap at 24.
pub fn format_timestamp(timestamp_ms: i64) -> Result<String, TimelineError> {
    let time = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        TimelineError::EncodingError(format!("timestamp {timestamp_ms}ms out of range"))
    })?;
    Ok(format!(
        "{}.{:02}",
        time.format("%H:%M:%S"),
        time.timestamp_subsec_millis() / 10
    ))
}

/// ASS event encoder
#[derive(Debug, Clone, Default)]
pub struct AssEncoder {
    header: Option<String>,
}

impl AssEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder that copies `header` (script info, styles, `[Events]` format line)
    /// verbatim ahead of the events
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
        }
    }

    /// One `Dialogue:` line per interval, tagged with its position
    pub fn encode(&self, iir: &Iir) -> Result<String, TimelineError> {
        let mut ass = String::new();
        if let Some(header) = &self.header {
            ass.push_str(header);
            if !header.is_empty() && !header.ends_with('\n') {
                ass.push('\n');
            }
        }
        for (id, interval) in iir.intervals().iter().enumerate() {
            ass.push_str(&interval.to_ass(&id.to_string())?);
            ass.push('\n');
        }
        Ok(ass)
    }
}

/// JSON timeline encoder
pub struct TimelineEncoder {
    instance_id: String,
}

impl Default for TimelineEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn encode(&self, iir: &Iir, frame_count: usize) -> Result<TimelinePayload, TimelineError> {
        let intervals = iir
            .intervals()
            .iter()
            .enumerate()
            .map(|(id, interval)| -> Result<TimelineEntry, TimelineError> {
                Ok(TimelineEntry {
                    id,
                    channel: interval.channel(),
                    begin_ms: interval.begin(),
                    end_ms: interval.end(),
                    duration_ms: interval.duration_ms(),
                    begin: format_timestamp(interval.begin())?,
                    end: format_timestamp(interval.end())?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TimelinePayload {
            timeline_version: TIMELINE_VERSION.to_string(),
            producer: TimelineProducer {
                name: PRODUCER_NAME.to_string(),
                version: MAGIA_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            frame_count,
            intervals,
        })
    }

    pub fn encode_to_json(&self, iir: &Iir, frame_count: usize) -> Result<String, TimelineError> {
        let payload = self.encode(iir, frame_count)?;
        serde_json::to_string_pretty(&payload).map_err(TimelineError::JsonError)
    }
}
