use std::collections::VecDeque;

use serde::Serialize;

use crate::telemetry::SensorSample;

/// Default number of samples kept per channel for the live view.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Fixed-capacity trailing history of the most recent samples, one ring per
/// channel. All channels are appended together per sample, so index i always
/// refers to the same reading across channels and every ring has the same
/// length (0..=capacity).
pub struct LiveWindow {
    capacity: usize,
    timestamps: VecDeque<i64>,
    accel_x: VecDeque<f64>,
    accel_y: VecDeque<f64>,
    accel_z: VecDeque<f64>,
    gyro_x: VecDeque<f64>,
    gyro_y: VecDeque<f64>,
    gyro_z: VecDeque<f64>,
    lat: VecDeque<Option<f64>>,
    lon: VecDeque<Option<f64>>,
}

impl LiveWindow {
    pub fn new(capacity: usize) -> Self {
        LiveWindow {
            capacity,
            timestamps: VecDeque::with_capacity(capacity),
            accel_x: VecDeque::with_capacity(capacity),
            accel_y: VecDeque::with_capacity(capacity),
            accel_z: VecDeque::with_capacity(capacity),
            gyro_x: VecDeque::with_capacity(capacity),
            gyro_y: VecDeque::with_capacity(capacity),
            gyro_z: VecDeque::with_capacity(capacity),
            lat: VecDeque::with_capacity(capacity),
            lon: VecDeque::with_capacity(capacity),
        }
    }

    /// Append one sample to every channel, evicting the oldest when full.
    pub fn append(&mut self, sample: &SensorSample) {
        if self.timestamps.len() == self.capacity {
            self.timestamps.pop_front();
            self.accel_x.pop_front();
            self.accel_y.pop_front();
            self.accel_z.pop_front();
            self.gyro_x.pop_front();
            self.gyro_y.pop_front();
            self.gyro_z.pop_front();
            self.lat.pop_front();
            self.lon.pop_front();
        }
        self.timestamps.push_back(sample.timestamp_ms);
        self.accel_x.push_back(sample.accel_x);
        self.accel_y.push_back(sample.accel_y);
        self.accel_z.push_back(sample.accel_z);
        self.gyro_x.push_back(sample.gyro_x);
        self.gyro_y.push_back(sample.gyro_y);
        self.gyro_z.push_back(sample.gyro_z);
        self.lat.push_back(sample.lat);
        self.lon.push_back(sample.lon);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Independent copy of the window, oldest to newest. Safe to hold and
    /// iterate while the window keeps moving.
    pub fn snapshot(&self) -> LiveWindowSnapshot {
        LiveWindowSnapshot {
            timestamps: self.timestamps.iter().copied().collect(),
            accel: AxisSnapshot {
                x: self.accel_x.iter().copied().collect(),
                y: self.accel_y.iter().copied().collect(),
                z: self.accel_z.iter().copied().collect(),
            },
            gyro: AxisSnapshot {
                x: self.gyro_x.iter().copied().collect(),
                y: self.gyro_y.iter().copied().collect(),
                z: self.gyro_z.iter().copied().collect(),
            },
            lat: self.lat.iter().copied().collect(),
            lon: self.lon.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSnapshot {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

/// Copy-out view served by `GET /api/data`. Absent GPS entries serialize as
/// null so the dashboard can gap its trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveWindowSnapshot {
    pub timestamps: Vec<i64>,
    pub accel: AxisSnapshot,
    pub gyro: AxisSnapshot,
    pub lat: Vec<Option<f64>>,
    pub lon: Vec<Option<f64>>,
}
