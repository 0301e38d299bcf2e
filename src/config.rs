//! Pipeline configuration
//!
//! Every channel carries its own noise-removal and gap-bridging thresholds.
//! Brief categories such as dialog boxes tolerate only short gaps, while
//! full-screen transitions fade slowly and need a longer tolerance.

use crate::channel::Channel;
use crate::error::TimelineError;
use crate::fpir::{RemoveNoise, DEFAULT_MIN_NEGATIVE_LENGTH, DEFAULT_MIN_POSITIVE_LENGTH};
use crate::iir::{FillFlashBlank, DEFAULT_MAX_GAP_MS};
use serde::{Deserialize, Serialize};

/// Thresholds for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Minimum on-run length in frames (0 disables)
    pub min_positive_length: usize,
    /// Minimum off-run length in frames (0 disables)
    pub min_negative_length: usize,
    /// Largest gap bridged between two intervals (milliseconds)
    pub max_gap_ms: i64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            min_positive_length: DEFAULT_MIN_POSITIVE_LENGTH,
            min_negative_length: DEFAULT_MIN_NEGATIVE_LENGTH,
            max_gap_ms: DEFAULT_MAX_GAP_MS,
        }
    }
}

impl ChannelConfig {
    pub fn remove_noise_pass(&self, channel: Channel) -> RemoveNoise {
        RemoveNoise::new(channel, self.min_positive_length, self.min_negative_length)
    }

    pub fn fill_flash_blank_pass(&self, channel: Channel) -> FillFlashBlank {
        FillFlashBlank::new(channel, self.max_gap_ms)
    }
}

/// Per-channel thresholds for the whole pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dialog: ChannelConfig,
    pub blackscreen: ChannelConfig,
    pub whitescreen: ChannelConfig,
    pub cg_sub: ChannelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let slow = ChannelConfig {
            max_gap_ms: 1200,
            ..ChannelConfig::default()
        };
        Self {
            dialog: ChannelConfig::default(),
            blackscreen: slow,
            whitescreen: ChannelConfig {
                min_negative_length: 0,
                ..slow
            },
            cg_sub: slow,
        }
    }
}

impl PipelineConfig {
    pub fn channel(&self, channel: Channel) -> &ChannelConfig {
        match channel {
            Channel::Dialog => &self.dialog,
            Channel::Blackscreen => &self.blackscreen,
            Channel::Whitescreen => &self.whitescreen,
            Channel::CgSub => &self.cg_sub,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut ChannelConfig {
        match channel {
            Channel::Dialog => &mut self.dialog,
            Channel::Blackscreen => &mut self.blackscreen,
            Channel::Whitescreen => &mut self.whitescreen,
            Channel::CgSub => &mut self.cg_sub,
        }
    }

    /// Reject thresholds that cannot be applied
    pub fn validate(&self) -> Result<(), TimelineError> {
        for channel in Channel::ALL {
            let config = self.channel(channel);
            if config.max_gap_ms < 0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "{}.max_gap_ms must not be negative (got {})",
                    channel, config.max_gap_ms
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, TimelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
