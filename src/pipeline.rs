//! Pipeline orchestration
//!
//! This module provides the public API for building a timeline. It runs the
//! passes in a fixed order, each to completion before the next starts:
//! 1. RemoveNoise - once per channel, on the frame-point IR
//! 2. BuildIntervals - once per channel, merged into the interval IR
//! 3. FillFlashBlank - once per channel, on the interval IR

use crate::channel::Channel;
use crate::config::PipelineConfig;
use crate::encoder::{AssEncoder, TimelineEncoder};
use crate::error::TimelineError;
use crate::fpir::Fpir;
use crate::iir::Iir;
use crate::schema::{FrameRecord, FrameRecordAdapter};

/// Convert NDJSON frame records to ASS dialogue events with the default tuning.
///
/// # Example
/// ```ignore
/// let events = frames_to_ass(ndjson)?;
/// ```
pub fn frames_to_ass(ndjson: &str) -> Result<String, TimelineError> {
    let records = FrameRecordAdapter::parse_ndjson(ndjson)?;
    let timeline = TimelineProcessor::default().process_records(&records)?;
    AssEncoder::new().encode(&timeline.iir)
}

/// Convert NDJSON frame records to a JSON timeline payload with the default tuning.
pub fn frames_to_timeline_json(ndjson: &str) -> Result<String, TimelineError> {
    let records = FrameRecordAdapter::parse_ndjson(ndjson)?;
    let timeline = TimelineProcessor::default().process_records(&records)?;
    TimelineEncoder::new().encode_to_json(&timeline.iir, timeline.frame_count)
}

/// Result of a full pipeline run
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Number of real frames processed
    pub frame_count: usize,
    /// Cleaned intervals, sorted by begin
    pub iir: Iir,
}

/// Runs the cleanup passes with per-channel tuning
#[derive(Debug, Clone, Default)]
pub struct TimelineProcessor {
    config: PipelineConfig,
}

impl TimelineProcessor {
    /// Create a processor, rejecting an invalid configuration
    pub fn new(config: PipelineConfig) -> Result<Self, TimelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Denoise the FPIR in place and return the bridged interval IR
    pub fn process(&self, fpir: &mut Fpir) -> Result<Iir, TimelineError> {
        if fpir.is_empty() {
            return Err(TimelineError::EmptySequence);
        }

        log::info!("FPIR passes over {} frames", fpir.len());
        for channel in Channel::ALL {
            let pass = self.config.channel(channel).remove_noise_pass(channel);
            let flipped = fpir.accept(&pass);
            log::info!(
                "remove noise {}: {} flags flipped (min positive {}, min negative {})",
                channel,
                flipped,
                pass.min_positive_length,
                pass.min_negative_length
            );
        }

        log::info!("FPIR to IIR");
        let mut iir = Iir::from_fpir(fpir)?;
        log::info!("{} intervals extracted", iir.len());

        log::info!("IIR passes");
        for channel in Channel::ALL {
            let pass = self.config.channel(channel).fill_flash_blank_pass(channel);
            let bridged = iir.accept(&pass);
            log::info!(
                "fill flash blank {}: {} gaps bridged (max gap {}ms)",
                channel,
                bridged,
                pass.max_gap_ms
            );
        }

        Ok(iir)
    }

    /// Load frame records and run the full pipeline
    pub fn process_records(&self, records: &[FrameRecord]) -> Result<Timeline, TimelineError> {
        let mut fpir = FrameRecordAdapter::to_fpir(records)?;
        let iir = self.process(&mut fpir)?;
        Ok(Timeline {
            frame_count: fpir.len(),
            iir,
        })
    }
}
