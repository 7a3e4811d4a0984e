use std::sync::{Arc, Mutex};

use crate::error::{GatewayError, GatewayResult};
use crate::queue::LogQueue;
use crate::stats::{IngestStats, StatsSnapshot};
use crate::telemetry::SensorSample;
use crate::window::{LiveWindow, LiveWindowSnapshot};

/// Window and stats live behind one lock: they are always updated together,
/// and a reader must never see one advanced without the other.
struct LiveState {
    window: LiveWindow,
    stats: IngestStats,
}

/// Shared gateway state handed to request handlers and the log writer.
///
/// Constructed once at startup and passed around by handle; the queue keeps
/// its own lock because the writer drains it on a different cadence than
/// dashboard reads. Neither lock is ever held across disk I/O.
#[derive(Clone)]
pub struct GatewayState {
    live: Arc<Mutex<LiveState>>,
    queue: Arc<LogQueue>,
}

impl GatewayState {
    pub fn new(window_size: usize) -> Self {
        GatewayState {
            live: Arc::new(Mutex::new(LiveState {
                window: LiveWindow::new(window_size),
                stats: IngestStats::new(),
            })),
            queue: Arc::new(LogQueue::new()),
        }
    }

    /// Apply one decoded batch: queue it for persistence, then update the
    /// live window and counters in a single critical section. Samples keep
    /// their batch order on both paths.
    pub fn ingest(&self, samples: Vec<SensorSample>) -> GatewayResult<()> {
        self.queue.push_batch(&samples)?;

        let mut live = self
            .live
            .lock()
            .map_err(|_| GatewayError::Internal("live state lock poisoned".to_string()))?;
        for sample in &samples {
            live.window.append(sample);
        }
        live.stats.record_batch(samples.len());
        Ok(())
    }

    pub fn window_snapshot(&self) -> GatewayResult<LiveWindowSnapshot> {
        let live = self
            .live
            .lock()
            .map_err(|_| GatewayError::Internal("live state lock poisoned".to_string()))?;
        Ok(live.window.snapshot())
    }

    pub fn stats_snapshot(&self) -> GatewayResult<StatsSnapshot> {
        let live = self
            .live
            .lock()
            .map_err(|_| GatewayError::Internal("live state lock poisoned".to_string()))?;
        Ok(live.stats.snapshot())
    }

    /// The persistence queue, for wiring up the log writer.
    pub fn queue(&self) -> Arc<LogQueue> {
        self.queue.clone()
    }
}
