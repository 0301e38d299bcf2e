//! Interval extraction
//!
//! Run-length encodes one channel's flags into `[begin, end)` intervals. The
//! virtual end point closes any run still open after the last real frame, so
//! no interval ever ends past the last real timestamp.

use super::{Fpir, FpirPass};
use crate::channel::Channel;
use crate::error::TimelineError;
use crate::iir::Interval;

/// Interval-build pass for a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildIntervals {
    pub channel: Channel,
}

impl BuildIntervals {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

impl FpirPass for BuildIntervals {
    type Output = Result<Vec<Interval>, TimelineError>;

    fn apply(&self, fpir: &mut Fpir) -> Self::Output {
        let mut intervals = Vec::new();
        let mut open_since: Option<i64> = None;

        for point in fpir.frame_points_with_virtual_end()? {
            let on = point.flags[self.channel];
            match open_since {
                None if on => open_since = Some(point.timestamp),
                Some(begin) if !on => {
                    intervals.push(Interval {
                        begin,
                        end: point.timestamp,
                        channel: self.channel,
                    });
                    open_since = None;
                }
                _ => {}
            }
        }

        log::debug!(
            "built {} intervals on {}",
            intervals.len(),
            self.channel
        );
        Ok(intervals)
    }
}
