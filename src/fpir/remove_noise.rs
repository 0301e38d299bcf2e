//! Temporal noise removal
//!
//! Flips a channel's flag on any frame whose surrounding run of equal values is
//! shorter than the configured minimum. Positive (on) and negative (off) runs
//! have independent minimums; a minimum of zero disables that direction.

use super::{Fpir, FpirPass};
use crate::channel::Channel;

/// Default minimum length of an "on" run, in frames
pub const DEFAULT_MIN_POSITIVE_LENGTH: usize = 10;

/// Default minimum length of an "off" run, in frames
pub const DEFAULT_MIN_NEGATIVE_LENGTH: usize = 2;

/// Noise-removal pass for a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveNoise {
    pub channel: Channel,
    pub min_positive_length: usize,
    pub min_negative_length: usize,
}

impl RemoveNoise {
    pub fn new(channel: Channel, min_positive_length: usize, min_negative_length: usize) -> Self {
        Self {
            channel,
            min_positive_length,
            min_negative_length,
        }
    }

    /// Pass with the default run-length minimums
    pub fn with_defaults(channel: Channel) -> Self {
        Self::new(
            channel,
            DEFAULT_MIN_POSITIVE_LENGTH,
            DEFAULT_MIN_NEGATIVE_LENGTH,
        )
    }
}

impl FpirPass for RemoveNoise {
    /// Number of flags flipped
    type Output = usize;

    fn apply(&self, fpir: &mut Fpir) -> usize {
        let channel = self.channel;
        let points = &mut fpir.frame_points;
        let len = points.len();
        let mut flipped = 0;

        // Single left-to-right scan; later frames see flips made earlier in the scan.
        for id in 0..len {
            let value = points[id].flags[channel];
            let min_length = if value {
                self.min_positive_length
            } else {
                self.min_negative_length
            };

            if min_length == 0 || id < min_length || id + min_length > len - 1 {
                continue;
            }

            let backward = points[id - min_length..id]
                .iter()
                .rev()
                .take_while(|p| p.flags[channel] == value)
                .count();
            let forward = points[id + 1..=id + min_length]
                .iter()
                .take_while(|p| p.flags[channel] == value)
                .count();

            if backward + forward < min_length {
                points[id].flags[channel] = !value;
                flipped += 1;
            }
        }

        log::debug!(
            "remove noise on {}: {} of {} frames flipped",
            channel,
            flipped,
            len
        );
        flipped
    }
}
