//! Frame-point intermediate representation
//!
//! The FPIR owns the time-ordered sequence of [`FramePoint`]s produced by the
//! classifier. Passes implementing [`FpirPass`] either clean the flags in place
//! (noise removal) or derive data from them (interval extraction).

mod build_intervals;
mod remove_noise;

pub use build_intervals::BuildIntervals;
pub use remove_noise::{RemoveNoise, DEFAULT_MIN_NEGATIVE_LENGTH, DEFAULT_MIN_POSITIVE_LENGTH};

use crate::channel::{ChannelFlags, CHANNEL_COUNT};
use crate::encoder::format_timestamp;
use crate::error::TimelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

/// One frame's timestamped flag vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePoint {
    /// Frame number in the source
    pub index: u64,
    /// Presentation time (milliseconds)
    pub timestamp: i64,
    /// Per-channel detection result
    pub flags: ChannelFlags,
}

impl FramePoint {
    /// Create a frame point, failing unless `flags` has one entry per channel
    pub fn new(index: u64, timestamp: i64, flags: &[bool]) -> Result<Self, TimelineError> {
        Ok(Self::with_flags(index, timestamp, ChannelFlags::from_slice(flags)?))
    }

    pub fn with_flags(index: u64, timestamp: i64, flags: ChannelFlags) -> Self {
        Self {
            index,
            timestamp,
            flags,
        }
    }

    /// Long form including the flag vector
    pub fn describe_full(&self) -> String {
        format!("{} {:?}", self, self.flags.as_array())
    }
}

impl fmt::Display for FramePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format_timestamp(self.timestamp) {
            Ok(ts) => write!(f, "frame {} {}", self.index, ts),
            Err(_) => write!(f, "frame {} {}ms", self.index, self.timestamp),
        }
    }
}

/// A pass over the frame-point IR
pub trait FpirPass {
    type Output;

    fn apply(&self, fpir: &mut Fpir) -> Self::Output;
}

/// Frame Point Intermediate Representation
#[derive(Debug, Clone, Default)]
pub struct Fpir {
    pub(crate) frame_points: Vec<FramePoint>,
}

impl Fpir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an FPIR from frame points in source order
    pub fn from_frame_points(
        points: impl IntoIterator<Item = FramePoint>,
    ) -> Result<Self, TimelineError> {
        let mut fpir = Self::new();
        for point in points {
            fpir.push(point)?;
        }
        Ok(fpir)
    }

    /// Append a frame point.
    ///
    /// Frame indices must strictly increase and timestamps must be non-negative
    /// and never decrease.
    pub fn push(&mut self, point: FramePoint) -> Result<(), TimelineError> {
        if point.timestamp < 0 {
            return Err(TimelineError::NegativeTimestamp {
                index: point.index,
                timestamp: point.timestamp,
            });
        }

        if let Some(last) = self.frame_points.last() {
            if point.index <= last.index || point.timestamp < last.timestamp {
                return Err(TimelineError::OutOfOrderFrame {
                    index: point.index,
                    timestamp: point.timestamp,
                    previous_index: last.index,
                    previous_timestamp: last.timestamp,
                });
            }
        }

        if point.index % 1000 == 0 {
            log::trace!("{}", point);
        }

        self.frame_points.push(point);
        Ok(())
    }

    pub fn frame_points(&self) -> &[FramePoint] {
        &self.frame_points
    }

    pub fn len(&self) -> usize {
        self.frame_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_points.is_empty()
    }

    /// Run a pass over this IR
    pub fn accept<P: FpirPass>(&mut self, pass: &P) -> P::Output {
        pass.apply(self)
    }

    /// Synthetic closing frame: one past the last position, at the last real
    /// timestamp, with every channel off.
    pub fn virtual_end(&self) -> Result<FramePoint, TimelineError> {
        let last = self.frame_points.last().ok_or(TimelineError::EmptySequence)?;
        Ok(FramePoint::with_flags(
            self.frame_points.len() as u64,
            last.timestamp,
            ChannelFlags::new([false; CHANNEL_COUNT]),
        ))
    }

    /// The stored frames followed by the virtual end point
    pub fn frame_points_with_virtual_end(
        &self,
    ) -> Result<impl Iterator<Item = FramePoint> + '_, TimelineError> {
        let end = self.virtual_end()?;
        Ok(self.frame_points.iter().copied().chain(iter::once(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    fn point(index: u64, timestamp: i64) -> FramePoint {
        FramePoint::with_flags(index, timestamp, ChannelFlags::new([true, false, true, false]))
    }

    #[test]
    fn test_frame_point_rejects_bad_flag_count() {
        let result = FramePoint::new(0, 0, &[true, false, true]);
        assert!(matches!(
            result,
            Err(TimelineError::FlagCount {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_frame_point_display() {
        let p = point(1000, 61_239);
        assert_eq!(p.to_string(), "frame 1000 00:01:01.23");
        assert_eq!(
            p.describe_full(),
            "frame 1000 00:01:01.23 [true, false, true, false]"
        );
    }

    #[test]
    fn test_push_rejects_out_of_order() {
        let mut fpir = Fpir::new();
        fpir.push(point(0, 0)).unwrap();
        fpir.push(point(1, 40)).unwrap();

        assert!(matches!(
            fpir.push(point(1, 80)),
            Err(TimelineError::OutOfOrderFrame { .. })
        ));
        assert!(matches!(
            fpir.push(point(2, 39)),
            Err(TimelineError::OutOfOrderFrame { .. })
        ));
        assert!(matches!(
            fpir.push(point(2, -1)),
            Err(TimelineError::NegativeTimestamp { .. })
        ));

        // equal timestamps are allowed
        fpir.push(point(2, 40)).unwrap();
        assert_eq!(fpir.len(), 3);
    }

    #[test]
    fn test_virtual_end() {
        let fpir = Fpir::from_frame_points(vec![point(0, 0), point(1, 33), point(2, 67)]).unwrap();
        let end = fpir.virtual_end().unwrap();

        assert_eq!(end.index, 3);
        assert_eq!(end.timestamp, 67);
        for channel in Channel::ALL {
            assert!(!end.flags[channel]);
        }

        let all: Vec<FramePoint> = fpir.frame_points_with_virtual_end().unwrap().collect();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3], end);
    }

    #[test]
    fn test_virtual_end_on_empty_sequence() {
        let fpir = Fpir::new();
        assert!(matches!(
            fpir.virtual_end(),
            Err(TimelineError::EmptySequence)
        ));
        assert!(fpir.frame_points_with_virtual_end().is_err());
    }
}
