use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{GatewayError, GatewayResult};
use crate::telemetry::SensorSample;

/// Hand-off buffer between request handlers and the log writer.
///
/// Many producers push, exactly one consumer drains. Push never blocks and
/// never rejects; the queue is unbounded so a disk stall shows up as memory
/// growth here instead of failed ingestion. Contents are volatile and lost
/// on crash.
pub struct LogQueue {
    inner: Mutex<VecDeque<SensorSample>>,
}

impl LogQueue {
    pub fn new() -> Self {
        LogQueue {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Enqueue a batch, keeping its internal order.
    pub fn push_batch(&self, samples: &[SensorSample]) -> GatewayResult<()> {
        let mut queue = self
            .inner
            .lock()
            .map_err(|_| GatewayError::Internal("log queue lock poisoned".to_string()))?;
        queue.extend(samples.iter().cloned());
        Ok(())
    }

    /// Remove and return up to `max` samples in FIFO order.
    pub fn drain(&self, max: usize) -> GatewayResult<Vec<SensorSample>> {
        let mut queue = self
            .inner
            .lock()
            .map_err(|_| GatewayError::Internal("log queue lock poisoned".to_string()))?;
        let take = max.min(queue.len());
        Ok(queue.drain(..take).collect())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: i64) -> SensorSample {
        SensorSample {
            timestamp_ms: t,
            accel_x: 0.0,
            accel_y: 0.0,
            accel_z: 9.8,
            gyro_x: 0.0,
            gyro_y: 0.0,
            gyro_z: 0.0,
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn test_drain_preserves_fifo_order() {
        let queue = LogQueue::new();
        queue.push_batch(&[sample(1), sample(2)]).unwrap();
        queue.push_batch(&[sample(3)]).unwrap();

        let drained = queue.drain(10).unwrap();
        let order: Vec<i64> = drained.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_respects_max() {
        let queue = LogQueue::new();
        let batch: Vec<SensorSample> = (0..7).map(sample).collect();
        queue.push_batch(&batch).unwrap();

        assert_eq!(queue.drain(5).unwrap().len(), 5);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(5).unwrap().len(), 2);
    }

    #[test]
    fn test_drain_empty_returns_nothing() {
        let queue = LogQueue::new();
        assert!(queue.drain(500).unwrap().is_empty());
    }
}
