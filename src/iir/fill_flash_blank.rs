//! Gap bridging
//!
//! A short blank between two intervals of the same channel is usually a
//! misdetected frame or a flash, not a real break. This pass moves both
//! neighbouring endpoints to the middle of such a gap. The two intervals stay
//! separate records; only their bounds change.

use super::{Iir, IirPass};
use crate::channel::Channel;

/// Default largest gap bridged, in milliseconds
pub const DEFAULT_MAX_GAP_MS: i64 = 300;

/// Gap-bridging pass for a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillFlashBlank {
    pub channel: Channel,
    pub max_gap_ms: i64,
}

impl FillFlashBlank {
    pub fn new(channel: Channel, max_gap_ms: i64) -> Self {
        Self {
            channel,
            max_gap_ms,
        }
    }
}

impl IirPass for FillFlashBlank {
    /// Number of gaps bridged
    type Output = usize;

    fn apply(&self, iir: &mut Iir) -> usize {
        let intervals = &mut iir.intervals;
        let mut bridged = 0;

        // No re-sort until the sweep is done: an interval moved as the right
        // side of one gap is later visited again as a left side.
        for id in 0..intervals.len() {
            if intervals[id].channel != self.channel {
                continue;
            }

            for other_id in id + 1..intervals.len() {
                if intervals[other_id].channel != self.channel {
                    continue;
                }

                let dist = intervals[id].dist(&intervals[other_id]);
                if dist > self.max_gap_ms {
                    break;
                }
                if dist <= 0 {
                    continue;
                }

                let mid = midpoint(intervals[id].end, intervals[other_id].begin);
                intervals[id].end = mid;
                intervals[other_id].begin = mid;
                bridged += 1;
                break;
            }
        }

        iir.sort();
        log::debug!(
            "bridged {} gaps on {} (max gap {}ms)",
            bridged,
            self.channel,
            self.max_gap_ms
        );
        bridged
    }
}

/// Floor of `(a + b) / 2` without intermediate overflow
fn midpoint(a: i64, b: i64) -> i64 {
    // always lies between a and b, so the narrowing is lossless
    (i128::from(a) + i128::from(b)).div_euclid(2) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iir::Interval;
    use pretty_assertions::assert_eq;

    fn span(begin: i64, end: i64, channel: Channel) -> Interval {
        Interval::new(begin, end, channel).unwrap()
    }

    #[test]
    fn test_short_gap_bridged_at_midpoint() {
        let mut iir = Iir::from_intervals(vec![
            span(0, 100, Channel::Dialog),
            span(150, 250, Channel::Dialog),
        ]);
        let bridged = iir.accept(&FillFlashBlank::new(Channel::Dialog, 100));

        assert_eq!(bridged, 1);
        assert_eq!(
            iir.intervals(),
            &[span(0, 125, Channel::Dialog), span(125, 250, Channel::Dialog)]
        );
    }

    #[test]
    fn test_long_gap_untouched() {
        let original = vec![span(0, 100, Channel::Dialog), span(250, 350, Channel::Dialog)];
        let mut iir = Iir::from_intervals(original.clone());
        let bridged = iir.accept(&FillFlashBlank::new(Channel::Dialog, 100));

        assert_eq!(bridged, 0);
        assert_eq!(iir.intervals(), original.as_slice());
    }

    #[test]
    fn test_midpoint_rounds_down() {
        let mut iir = Iir::from_intervals(vec![
            span(0, 100, Channel::Blackscreen),
            span(133, 200, Channel::Blackscreen),
        ]);
        iir.accept(&FillFlashBlank::new(Channel::Blackscreen, 1200));

        assert_eq!(iir.intervals()[0].end, 116);
        assert_eq!(iir.intervals()[1].begin, 116);
    }

    #[test]
    fn test_other_channels_skipped_mid_scan() {
        let mut iir = Iir::from_intervals(vec![
            span(0, 100, Channel::Dialog),
            span(110, 5000, Channel::CgSub),
            span(200, 300, Channel::Dialog),
        ]);
        iir.accept(&FillFlashBlank::new(Channel::Dialog, 300));

        assert_eq!(
            iir.intervals(),
            &[
                span(0, 150, Channel::Dialog),
                span(110, 5000, Channel::CgSub),
                span(150, 300, Channel::Dialog),
            ]
        );
    }

    #[test]
    fn test_overlapping_candidate_skipped() {
        // the second interval overlaps the first, so the third is bridged to the
        // first; the third is then bridged again as the neighbour of the second
        let mut iir = Iir::from_intervals(vec![
            span(0, 100, Channel::Dialog),
            span(50, 80, Channel::Dialog),
            span(160, 200, Channel::Dialog),
        ]);
        let bridged = iir.accept(&FillFlashBlank::new(Channel::Dialog, 100));

        assert_eq!(bridged, 2);
        assert_eq!(
            iir.intervals(),
            &[
                span(0, 130, Channel::Dialog),
                span(50, 105, Channel::Dialog),
                span(105, 200, Channel::Dialog),
            ]
        );
    }

    #[test]
    fn test_chain_of_gaps() {
        let mut iir = Iir::from_intervals(vec![
            span(0, 100, Channel::CgSub),
            span(200, 300, Channel::CgSub),
            span(400, 500, Channel::CgSub),
        ]);
        let bridged = iir.accept(&FillFlashBlank::new(Channel::CgSub, 1200));

        assert_eq!(bridged, 2);
        assert_eq!(
            iir.intervals(),
            &[
                span(0, 150, Channel::CgSub),
                span(150, 350, Channel::CgSub),
                span(350, 500, Channel::CgSub),
            ]
        );
        for pair in iir.intervals().windows(2) {
            assert!(pair[0].dist(&pair[1]) >= 0);
        }
    }

    #[test]
    fn test_pass_only_touches_its_channel() {
        let original = vec![
            span(0, 100, Channel::Whitescreen),
            span(150, 250, Channel::Whitescreen),
        ];
        let mut iir = Iir::from_intervals(original.clone());
        iir.accept(&FillFlashBlank::new(Channel::Dialog, 1200));

        assert_eq!(iir.intervals(), original.as_slice());
    }

    #[test]
    fn test_result_is_resorted() {
        let mut iir = Iir::from_intervals(vec![
            span(0, 100, Channel::Dialog),
            span(120, 130, Channel::Blackscreen),
            span(140, 240, Channel::Dialog),
        ]);
        iir.accept(&FillFlashBlank::new(Channel::Dialog, 100));

        let begins: Vec<i64> = iir.intervals().iter().map(|i| i.begin).collect();
        assert_eq!(begins, vec![0, 120, 120]);
        assert_eq!(iir.intervals()[1].channel, Channel::Blackscreen);
        assert_eq!(iir.intervals()[2], span(120, 240, Channel::Dialog));
    }

    #[test]
    fn test_midpoint_near_timestamp_limit() {
        let base = i64::MAX - 1_000;
        let mut iir = Iir::from_intervals(vec![
            span(base, base + 100, Channel::Dialog),
            span(base + 201, base + 300, Channel::Dialog),
        ]);
        let bridged = iir.accept(&FillFlashBlank::new(Channel::Dialog, 1000));

        assert_eq!(bridged, 1);
        assert_eq!(iir.intervals()[0].end, base + 150);
        assert_eq!(iir.intervals()[1].begin, base + 150);
        assert_eq!(midpoint(-3, 0), -2);
    }
}
