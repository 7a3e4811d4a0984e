use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use crate::queue::LogQueue;
use crate::telemetry::SensorSample;

/// Column header written once when a new log file is created.
const CSV_HEADER: &str =
    "Date,Time,Timestamp_ms,Accel_X,Accel_Y,Accel_Z,Gyro_X,Gyro_Y,Gyro_Z,Latitude,Longitude";

/// Samples taken from the queue per write pass. Bounds how long the queue
/// lock is held and how large a single append gets.
const DRAIN_LIMIT: usize = 500;

/// Idle delay between polls when the queue is empty.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Create the log directory and write the header if the file is absent.
/// Existing files are left untouched; the log is append-only.
pub fn init_csv_log(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    if !path.exists() {
        fs::write(path, format!("{}\n", CSV_HEADER))?;
        log::info!("created new log file {}", path.display());
    }
    Ok(())
}

/// Background writer draining the queue into the CSV log.
///
/// Runs for the process lifetime on its own task so request handlers never
/// touch the disk. A failed append is logged and dropped, never retried;
/// the client already got its acknowledgment when the batch was queued.
pub struct CsvLogWriter {
    queue: Arc<LogQueue>,
    path: PathBuf,
}

impl CsvLogWriter {
    pub fn new(queue: Arc<LogQueue>, path: PathBuf) -> Self {
        CsvLogWriter { queue, path }
    }

    /// Drain-and-append loop. The stop signal is observed between
    /// iterations, so an in-flight append always completes before exit.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        loop {
            let batch = match self.queue.drain(DRAIN_LIMIT) {
                Ok(batch) => batch,
                Err(err) => {
                    log::error!("cannot drain log queue: {}", err);
                    break;
                }
            };

            if batch.is_empty() {
                if *stop.borrow() {
                    break;
                }
                tokio::select! {
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                    _ = sleep(POLL_INTERVAL) => {}
                }
                continue;
            }

            match append_rows(&self.path, &batch) {
                Ok(()) => log::debug!("logged {} samples", batch.len()),
                Err(err) => log::error!(
                    "failed to log {} samples to {}: {}",
                    batch.len(),
                    self.path.display(),
                    err
                ),
            }

            if *stop.borrow() {
                break;
            }
        }
        log::info!("csv log writer stopped");
    }
}

/// Append one row per sample, stamped with the wall clock of the write.
/// The file handle lives only for this call.
fn append_rows(path: &Path, batch: &[SensorSample]) -> std::io::Result<()> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for sample in batch {
        let now = Local::now();
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{}",
            now.format("%Y-%m-%d"),
            now.format("%H:%M:%S%.6f"),
            sample.timestamp_ms,
            sample.accel_x,
            sample.accel_y,
            sample.accel_z,
            sample.gyro_x,
            sample.gyro_y,
            sample.gyro_z,
            opt_field(sample.lat),
            opt_field(sample.lon),
        )?;
    }
    writer.flush()
}

fn opt_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
