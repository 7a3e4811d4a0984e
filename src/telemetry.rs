use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One inertial/GPS reading reported by the device module.
///
/// `timestamp_ms` is the device's own millisecond counter. It is kept opaque:
/// it is not monotonic across batches and must not be used as a sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub timestamp_ms: i64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Wire format of one sample inside a `POST /api` batch.
#[derive(Debug, Deserialize)]
pub struct RawSample {
    pub t: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub gx: f64,
    pub gy: f64,
    pub gz: f64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl From<RawSample> for SensorSample {
    fn from(raw: RawSample) -> Self {
        SensorSample {
            timestamp_ms: raw.t,
            accel_x: raw.x,
            accel_y: raw.y,
            accel_z: raw.z,
            gyro_x: raw.gx,
            gyro_y: raw.gy,
            gyro_z: raw.gz,
            lat: raw.lat,
            lon: raw.lon,
        }
    }
}

/// Why a batch was rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Missing 'data' field")]
    MissingData,

    #[error("Invalid sample: {0}")]
    BadSample(String),
}

/// Decode a `POST /api` body into samples, preserving their order.
///
/// The whole batch either decodes or is rejected; callers apply the returned
/// samples only after this succeeds, so a bad payload has no side effects.
/// Unknown fields are ignored, matching what the device firmware sends today
/// plus whatever diagnostics it may add later.
pub fn decode_batch(body: &[u8]) -> Result<Vec<SensorSample>, DecodeError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| DecodeError::InvalidJson)?;
    let data = value
        .as_object()
        .and_then(|obj| obj.get("data"))
        .ok_or(DecodeError::MissingData)?;
    let raw: Vec<RawSample> = serde_json::from_value(data.clone())
        .map_err(|err| DecodeError::BadSample(err.to_string()))?;
    Ok(raw.into_iter().map(SensorSample::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_batch() {
        let body = br#"{"data": [
            {"t": 100, "x": 0.1, "y": 0.2, "z": 9.8, "gx": 0.01, "gy": 0.02, "gz": 0.03, "lat": 12.97, "lon": 77.59},
            {"t": 120, "x": 0.2, "y": 0.1, "z": 9.7, "gx": 0.0, "gy": 0.0, "gz": 0.0}
        ]}"#;

        let samples = decode_batch(body).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp_ms, 100);
        assert_eq!(samples[0].lat, Some(12.97));
        assert_eq!(samples[1].timestamp_ms, 120);
        assert_eq!(samples[1].lat, None);
        assert_eq!(samples[1].lon, None);
    }

    #[test]
    fn test_decode_preserves_order() {
        let body = br#"{"data": [
            {"t": 3, "x": 0, "y": 0, "z": 0, "gx": 0, "gy": 0, "gz": 0},
            {"t": 1, "x": 0, "y": 0, "z": 0, "gx": 0, "gy": 0, "gz": 0},
            {"t": 2, "x": 0, "y": 0, "z": 0, "gx": 0, "gy": 0, "gz": 0}
        ]}"#;

        let samples = decode_batch(body).unwrap();
        let timestamps: Vec<i64> = samples.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(timestamps, vec![3, 1, 2]);
    }

    #[test]
    fn test_decode_empty_batch_is_valid() {
        let samples = decode_batch(br#"{"data": []}"#).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert_eq!(decode_batch(b"not json"), Err(DecodeError::InvalidJson));
        assert_eq!(decode_batch(b""), Err(DecodeError::InvalidJson));
    }

    #[test]
    fn test_decode_rejects_missing_data_field() {
        assert_eq!(decode_batch(br#"{"foo": 1}"#), Err(DecodeError::MissingData));
        assert_eq!(decode_batch(br#"[1, 2, 3]"#), Err(DecodeError::MissingData));
    }

    #[test]
    fn test_decode_rejects_sample_missing_required_field() {
        let body = br#"{"data": [{"t": 1, "x": 0, "y": 0, "z": 0, "gx": 0, "gy": 0}]}"#;
        match decode_batch(body) {
            Err(DecodeError::BadSample(msg)) => assert!(msg.contains("gz")),
            other => panic!("expected BadSample, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let body = br#"{"data": [{"t": 1, "x": 0, "y": 0, "z": 0, "gx": 0, "gy": 0, "gz": 0, "temp": 31.5}]}"#;
        assert_eq!(decode_batch(body).unwrap().len(), 1);
    }
}
