//! Interval intermediate representation
//!
//! The IIR holds the intervals of every channel in one collection sorted by
//! `begin`. Ties keep extraction order (channel ordinal, then time), and every
//! mutating pass re-sorts before returning.

mod fill_flash_blank;

pub use fill_flash_blank::{FillFlashBlank, DEFAULT_MAX_GAP_MS};

use crate::channel::Channel;
use crate::encoder::format_timestamp;
use crate::error::TimelineError;
use crate::fpir::{BuildIntervals, Fpir};
use serde::Serialize;

/// A channel's contiguous on-span, `[begin, end)` in milliseconds
///
/// Bounds are only moved by the IIR passes; outside the crate an interval can
/// only be made through [`Interval::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub(crate) begin: i64,
    pub(crate) end: i64,
    pub(crate) channel: Channel,
}

impl Interval {
    pub fn new(begin: i64, end: i64, channel: Channel) -> Result<Self, TimelineError> {
        if begin > end {
            return Err(TimelineError::InvalidInterval { begin, end });
        }
        Ok(Self {
            begin,
            end,
            channel,
        })
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn duration_ms(&self) -> i64 {
        self.end.saturating_sub(self.begin)
    }

    /// Gap between the earlier-starting interval's end and the other's begin.
    ///
    /// Negative when the intervals overlap, zero when they touch.
    pub fn dist(&self, other: &Interval) -> i64 {
        let (l, r) = if self.begin > other.begin {
            (other, self)
        } else {
            (self, other)
        };
        r.begin.saturating_sub(l.end)
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        self.dist(other) < 0
    }

    pub fn touches(&self, other: &Interval) -> bool {
        self.dist(other) == 0
    }

    /// Render as an ASS dialogue event named `SUBTITLE_<CHANNEL>_<tag>`
    pub fn to_ass(&self, tag: &str) -> Result<String, TimelineError> {
        Ok(format!(
            "Dialogue: 0,{},{},Default,,0,0,0,,SUBTITLE_{}_{}",
            format_timestamp(self.begin)?,
            format_timestamp(self.end)?,
            self.channel.label(),
            tag
        ))
    }
}

/// A pass over the interval IR
pub trait IirPass {
    type Output;

    fn apply(&self, iir: &mut Iir) -> Self::Output;
}

/// Interval Intermediate Representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Iir {
    pub(crate) intervals: Vec<Interval>,
}

impl Iir {
    /// Extract every channel's intervals from the FPIR
    pub fn from_fpir(fpir: &mut Fpir) -> Result<Self, TimelineError> {
        let mut intervals = Vec::new();
        for channel in Channel::ALL {
            intervals.extend(fpir.accept(&BuildIntervals::new(channel))?);
        }
        Ok(Self::from_intervals(intervals))
    }

    /// Wrap existing intervals, sorting them by `begin`
    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        let mut iir = Self { intervals };
        iir.sort();
        iir
    }

    /// Stable sort by `begin`
    pub fn sort(&mut self) {
        self.intervals.sort_by_key(|interval| interval.begin);
    }

    pub fn accept<P: IirPass>(&mut self, pass: &P) -> P::Output {
        pass.apply(self)
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Intervals of one channel, in collection order
    pub fn channel_intervals(&self, channel: Channel) -> impl Iterator<Item = &Interval> + '_ {
        self.intervals
            .iter()
            .filter(move |interval| interval.channel == channel)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelFlags;
    use crate::fpir::FramePoint;
    use pretty_assertions::assert_eq;

    fn span(begin: i64, end: i64, channel: Channel) -> Interval {
        Interval::new(begin, end, channel).unwrap()
    }

    #[test]
    fn test_interval_rejects_reversed_bounds() {
        assert!(matches!(
            Interval::new(200, 100, Channel::Dialog),
            Err(TimelineError::InvalidInterval {
                begin: 200,
                end: 100
            })
        ));
        assert!(Interval::new(100, 100, Channel::Dialog).is_ok());
    }

    #[test]
    fn test_accessors() {
        let interval = span(250, 1_000, Channel::Whitescreen);
        assert_eq!(interval.begin(), 250);
        assert_eq!(interval.end(), 1_000);
        assert_eq!(interval.channel(), Channel::Whitescreen);
        assert_eq!(interval.duration_ms(), 750);
        assert_eq!(span(40, 40, Channel::Dialog).duration_ms(), 0);
    }

    #[test]
    fn test_extreme_bounds_do_not_overflow() {
        let wide = span(i64::MIN, i64::MAX, Channel::Dialog);
        let right = span(i64::MAX, i64::MAX, Channel::Dialog);
        assert_eq!(wide.duration_ms(), i64::MAX);
        assert_eq!(wide.dist(&right), 0);

        let left = span(i64::MIN, i64::MIN, Channel::Dialog);
        let far = span(i64::MAX, i64::MAX, Channel::Dialog);
        assert_eq!(left.dist(&far), i64::MAX);
    }

    #[test]
    fn test_dist_is_symmetric() {
        let a = span(0, 100, Channel::Dialog);
        let b = span(150, 250, Channel::Dialog);
        assert_eq!(a.dist(&b), 50);
        assert_eq!(b.dist(&a), 50);

        let c = span(50, 120, Channel::Dialog);
        assert_eq!(a.dist(&c), -50);
        assert!(a.intersects(&c));

        let d = span(100, 130, Channel::Dialog);
        assert!(a.touches(&d));
        assert!(!a.intersects(&d));
    }

    #[test]
    fn test_to_ass() {
        let interval = span(61_239, 3_723_456, Channel::CgSub);
        assert_eq!(
            interval.to_ass("7").unwrap(),
            "Dialogue: 0,00:01:01.23,01:02:03.45,Default,,0,0,0,,SUBTITLE_CGSUB_7"
        );
    }

    #[test]
    fn test_from_intervals_sorts_stably() {
        let iir = Iir::from_intervals(vec![
            span(300, 400, Channel::Dialog),
            span(100, 200, Channel::Blackscreen),
            span(100, 150, Channel::CgSub),
            span(0, 50, Channel::Whitescreen),
        ]);

        let order: Vec<(i64, Channel)> = iir
            .intervals()
            .iter()
            .map(|i| (i.begin, i.channel))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, Channel::Whitescreen),
                (100, Channel::Blackscreen),
                (100, Channel::CgSub),
                (300, Channel::Dialog),
            ]
        );
    }

    #[test]
    fn test_from_fpir_merges_channels() {
        let samples: [(i64, [bool; 4]); 5] = [
            (0, [false, true, false, false]),
            (100, [true, true, false, false]),
            (200, [true, false, false, true]),
            (300, [false, false, false, true]),
            (400, [false, false, false, false]),
        ];
        let points = samples
            .iter()
            .enumerate()
            .map(|(i, &(ts, flags))| FramePoint::with_flags(i as u64, ts, ChannelFlags::new(flags)));
        let mut fpir = Fpir::from_frame_points(points).unwrap();

        let iir = Iir::from_fpir(&mut fpir).unwrap();
        assert_eq!(
            iir.intervals(),
            &[
                span(0, 200, Channel::Blackscreen),
                span(100, 300, Channel::Dialog),
                span(200, 400, Channel::CgSub),
            ]
        );
        assert_eq!(iir.channel_intervals(Channel::Dialog).count(), 1);
        assert_eq!(iir.channel_intervals(Channel::Whitescreen).count(), 0);
    }

    #[test]
    fn test_from_fpir_empty_sequence() {
        let mut fpir = Fpir::new();
        assert!(matches!(
            Iir::from_fpir(&mut fpir),
            Err(TimelineError::EmptySequence)
        ));
    }
}
