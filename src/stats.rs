use chrono::{DateTime, Local};
use serde::Serialize;

const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Monotonic ingestion counters. Initialized at process start, never reset.
pub struct IngestStats {
    total_readings: u64,
    total_chunks: u64,
    first_update: Option<DateTime<Local>>,
    last_update: Option<DateTime<Local>>,
}

impl IngestStats {
    pub fn new() -> Self {
        IngestStats {
            total_readings: 0,
            total_chunks: 0,
            first_update: None,
            last_update: None,
        }
    }

    /// Account one accepted batch. An empty batch still counts as a chunk.
    pub fn record_batch(&mut self, sample_count: usize) {
        self.record_batch_at(sample_count, Local::now());
    }

    fn record_batch_at(&mut self, sample_count: usize, now: DateTime<Local>) {
        self.total_readings += sample_count as u64;
        self.total_chunks += 1;
        if self.first_update.is_none() {
            self.first_update = Some(now);
        }
        self.last_update = Some(now);
    }

    pub fn total_readings(&self) -> u64 {
        self.total_readings
    }

    pub fn total_chunks(&self) -> u64 {
        self.total_chunks
    }

    /// Readings per second over the span between the first and the most
    /// recent accepted batch. Advisory only; 0.0 until two batch instants
    /// exist. Computed from stored state, so reads without intervening
    /// ingestion always agree.
    fn sampling_rate(&self) -> f64 {
        match (self.first_update, self.last_update) {
            (Some(first), Some(last)) if last > first => {
                let secs = (last - first).num_milliseconds() as f64 / 1000.0;
                let rate = self.total_readings as f64 / secs;
                (rate * 100.0).round() / 100.0
            }
            _ => 0.0,
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_readings: self.total_readings,
            total_chunks: self.total_chunks,
            last_update: self
                .last_update
                .map(|t| t.format(LAST_UPDATE_FORMAT).to_string())
                .unwrap_or_else(|| "Never".to_string()),
            sampling_rate: self.sampling_rate(),
        }
    }
}

impl Default for IngestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter view served by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_readings: u64,
    pub total_chunks: u64,
    pub last_update: String,
    pub sampling_rate: f64,
}
