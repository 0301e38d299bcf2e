//! Detection channels
//!
//! Every frame carries one boolean per channel. The set of channels is closed:
//! flag vectors are fixed-size arrays indexed by the channel ordinal, and every
//! per-channel pass is instantiated once per variant of [`Channel`].

use crate::error::TimelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Number of channels tracked per frame
pub const CHANNEL_COUNT: usize = 4;

/// Independent signal category detected on each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Dialog box with text
    Dialog,
    /// Text on a black full-screen background
    Blackscreen,
    /// Text on a white full-screen background
    Whitescreen,
    /// Subtitle burnt into a CG scene
    CgSub,
}

impl Channel {
    /// All channels in ordinal order
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Dialog,
        Channel::Blackscreen,
        Channel::Whitescreen,
        Channel::CgSub,
    ];

    pub fn ordinal(self) -> usize {
        match self {
            Channel::Dialog => 0,
            Channel::Blackscreen => 1,
            Channel::Whitescreen => 2,
            Channel::CgSub => 3,
        }
    }

    /// Look up a channel by ordinal
    pub fn from_ordinal(ordinal: usize) -> Result<Self, TimelineError> {
        Self::ALL
            .get(ordinal)
            .copied()
            .ok_or_else(|| TimelineError::UnknownChannel(ordinal.to_string()))
    }

    /// Snake-case name used in configuration and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Dialog => "dialog",
            Channel::Blackscreen => "blackscreen",
            Channel::Whitescreen => "whitescreen",
            Channel::CgSub => "cg_sub",
        }
    }

    /// Upper-case name used in subtitle event names
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Dialog => "DIALOG",
            Channel::Blackscreen => "BLACKSCREEN",
            Channel::Whitescreen => "WHITESCREEN",
            Channel::CgSub => "CGSUB",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| TimelineError::UnknownChannel(s.to_string()))
    }
}

/// One boolean per channel, indexed by [`Channel`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFlags([bool; CHANNEL_COUNT]);

impl ChannelFlags {
    pub fn new(flags: [bool; CHANNEL_COUNT]) -> Self {
        Self(flags)
    }

    /// Build flags from a slice, failing unless it holds exactly one entry per channel
    pub fn from_slice(flags: &[bool]) -> Result<Self, TimelineError> {
        let array: [bool; CHANNEL_COUNT] =
            flags.try_into().map_err(|_| TimelineError::FlagCount {
                expected: CHANNEL_COUNT,
                actual: flags.len(),
            })?;
        Ok(Self(array))
    }

    /// Flags with every channel off
    pub fn none() -> Self {
        Self([false; CHANNEL_COUNT])
    }

    pub fn get(&self, channel: Channel) -> bool {
        self.0[channel.ordinal()]
    }

    pub fn set(&mut self, channel: Channel, value: bool) {
        self.0[channel.ordinal()] = value;
    }

    pub fn as_array(&self) -> &[bool; CHANNEL_COUNT] {
        &self.0
    }
}

impl Index<Channel> for ChannelFlags {
    type Output = bool;

    fn index(&self, channel: Channel) -> &bool {
        &self.0[channel.ordinal()]
    }
}

impl IndexMut<Channel> for ChannelFlags {
    fn index_mut(&mut self, channel: Channel) -> &mut bool {
        &mut self.0[channel.ordinal()]
    }
}

impl TryFrom<&[bool]> for ChannelFlags {
    type Error = TimelineError;

    fn try_from(flags: &[bool]) -> Result<Self, Self::Error> {
        Self::from_slice(flags)
    }
}
