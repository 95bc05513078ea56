// src/telemetry.rs
//
// Rollout telemetry sinks.
// - RolloutSink: trait used by the rollout harness
// - NoopSink:    discards all records
// - FileSink:    writes one JSON line per step for replay / analysis

use std::fs::File;
use std::io::{self, BufWriter, Write};

use serde::{Deserialize, Serialize};

/// One step of a rollout, as written to telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Episode counter at the time of the step.
    pub episode: u64,
    /// Step index within the episode.
    pub tick: u64,
    /// Action applied (mode-sized, normalized).
    pub action: Vec<f64>,
    /// Scalar reward.
    pub reward: f64,
    /// Episode terminated on this step.
    pub done: bool,
    /// End-effector/goal separation.
    pub separation: f64,
}

/// Episode boundary marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetRecord {
    /// Episode counter after the reset.
    pub episode: u64,
    /// Sampled goal position.
    pub goal: [f64; 3],
}

/// Abstract sink for per-step rollout telemetry.
pub trait RolloutSink {
    fn log_reset(&mut self, record: &ResetRecord);
    fn log_step(&mut self, record: &TickRecord);
}

/// Sink that discards all records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl RolloutSink for NoopSink {
    fn log_reset(&mut self, _record: &ResetRecord) {
        // intentionally no-op
    }

    fn log_step(&mut self, _record: &TickRecord) {
        // intentionally no-op
    }
}

/// JSONL file sink.
///
/// Each record is written as a single JSON object on its own line.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new sink writing to `path`.
    pub fn create(path: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_line(&mut self, line: &str) {
        // If telemetry fails we don't want to crash the rollout, so I/O
        // errors are deliberately ignored.
        let _ = self.writer.write_all(line.as_bytes());
        let _ = self.writer.write_all(b"\n");
        let _ = self.writer.flush();
    }
}

impl RolloutSink for FileSink {
    fn log_reset(&mut self, record: &ResetRecord) {
        if let Ok(line) = serde_json::to_string(record) {
            self.write_line(&line);
        }
    }

    fn log_step(&mut self, record: &TickRecord) {
        if let Ok(line) = serde_json::to_string(record) {
            self.write_line(&line);
        }
    }
}
