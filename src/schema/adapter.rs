//! Adapter for loading frame records into the frame-point IR

use crate::error::TimelineError;
use crate::fpir::Fpir;
use crate::schema::frame_record::FrameRecord;

/// Adapter for converting frame records to an FPIR
pub struct FrameRecordAdapter;

impl FrameRecordAdapter {
    /// Parse a JSON string containing an array of FrameRecords
    pub fn parse_array(json: &str) -> Result<Vec<FrameRecord>, TimelineError> {
        let records: Vec<FrameRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) containing FrameRecords
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<FrameRecord>, TimelineError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<FrameRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(TimelineError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Load records in order, failing on the first invalid or out-of-order one
    pub fn to_fpir(records: &[FrameRecord]) -> Result<Fpir, TimelineError> {
        let mut fpir = Fpir::new();
        for record in records {
            fpir.push(record.to_frame_point()?)?;
        }
        log::info!("loaded {} frame points", fpir.len());
        Ok(fpir)
    }

    /// Validate a batch of records, including their ordering.
    ///
    /// Each record's index and timestamp are compared with the record
    /// immediately before it, whether or not that record was valid itself.
    pub fn validate_records(records: &[FrameRecord]) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        let mut previous: Option<&FrameRecord> = None;

        for (position, record) in records.iter().enumerate() {
            let error = match record.validate() {
                Err(e) => Some(e),
                Ok(()) => previous
                    .filter(|prev| record.index <= prev.index || record.timestamp < prev.timestamp)
                    .map(|prev| TimelineError::OutOfOrderFrame {
                        index: record.index,
                        timestamp: record.timestamp,
                        previous_index: prev.index,
                        previous_timestamp: prev.timestamp,
                    }),
            };
            previous = Some(record);

            if let Some(error) = error {
                results.push(ValidationResult {
                    position,
                    frame_index: record.index,
                    error,
                });
            }
        }

        results
    }
}

/// A record that failed validation
#[derive(Debug)]
pub struct ValidationResult {
    /// Position of the record in the input
    pub position: usize,
    pub frame_index: u64,
    pub error: TimelineError,
}
