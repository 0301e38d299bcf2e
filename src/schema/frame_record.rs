//! frame_record.v1 schema definition

use crate::channel::ChannelFlags;
use crate::error::TimelineError;
use crate::fpir::FramePoint;
use serde::{Deserialize, Serialize};

/// Current schema version
pub const SCHEMA_VERSION: &str = "frame_record.v1";

/// One frame as reported by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Schema version identifier; records that omit it are read as the current version
    #[serde(default = "current_schema_version")]
    pub schema_version: String,
    /// Frame number in the source video
    pub index: u64,
    /// Presentation time (milliseconds)
    pub timestamp: i64,
    /// One detection result per channel, in channel ordinal order
    pub flags: Vec<bool>,
}

impl FrameRecord {
    pub fn new(index: u64, timestamp: i64, flags: Vec<bool>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            index,
            timestamp,
            flags,
        }
    }

    /// Check the record on its own, without regard to its neighbours
    pub fn validate(&self) -> Result<(), TimelineError> {
        self.to_frame_point().map(|_| ())
    }

    pub fn to_frame_point(&self) -> Result<FramePoint, TimelineError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(TimelineError::InvalidSchemaVersion {
                expected: SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }
        if self.timestamp < 0 {
            return Err(TimelineError::NegativeTimestamp {
                index: self.index,
                timestamp: self.timestamp,
            });
        }
        let flags = ChannelFlags::from_slice(&self.flags)?;
        Ok(FramePoint::with_flags(self.index, self.timestamp, flags))
    }
}

fn current_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl From<&FramePoint> for FrameRecord {
    fn from(point: &FramePoint) -> Self {
        Self::new(point.index, point.timestamp, point.flags.as_array().to_vec())
    }
}
