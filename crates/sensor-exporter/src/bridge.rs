//! On-demand collection bridge between a pull-based scraper and the sensor.
//!
//! A [`Collect`] implementation is asked for its descriptors once at
//! registration time and for fresh samples on every scrape. The
//! [`CollectionBridge`] answers every `collect` with exactly one hardware
//! transaction: either a full [`SampleBatch`] or a [`CollectionError`], never
//! a partial batch.

use core::error::Error;
use std::sync::Arc;
use std::sync::Mutex;

use chrono::Utc;
use error_stack::Report;
use error_stack::ResultExt;
use sensor::SensorReader;

use crate::metrics::MetricDescriptor;
use crate::metrics::MetricsError;
use crate::metrics::SampleBatch;

/// Collection errors
#[derive(Debug, derive_more::Display)]
pub enum CollectionError {
    /// The sensor transaction failed; the report carries the sensor error.
    #[display("Failed to read sensor")]
    Sensor,
    /// A previous transaction panicked while holding the device.
    #[display("Sensor device is unavailable")]
    DeviceUnavailable,
    #[display("Sensor did not answer within {millis}ms")]
    Timeout { millis: u128 },
    #[display("Collection task was aborted")]
    Aborted,
}

impl Error for CollectionError {}

/// Pull-collector contract consumed by [`crate::registry::MetricsRegistry`]
pub trait Collect: Send + Sync {
    /// Static descriptors of every series this collector produces.
    /// Never blocks and never touches hardware.
    fn describe(&self) -> &[Arc<MetricDescriptor>];

    /// Produce a fresh batch. May block on I/O.
    ///
    /// # Errors
    ///
    /// Returns a [`CollectionError`] and no samples when the batch cannot be
    /// produced in full.
    fn collect(&self) -> Result<SampleBatch, Report<CollectionError>>;
}

/// Collector for one temperature / pressure / humidity sensor.
///
/// The device handle is shared with whoever manages its lifecycle; the bridge
/// only ever locks it for the duration of one `sense` call.
pub struct CollectionBridge<R> {
    descriptors: [Arc<MetricDescriptor>; 3],
    reader: Arc<Mutex<R>>,
}

impl<R: SensorReader> CollectionBridge<R> {
    /// Create a bridge exposing `<prefix>_temperature`, `<prefix>_pressure`
    /// and `<prefix>_humidity`.
    ///
    /// # Errors
    ///
    /// - [`MetricsError::InvalidDescriptor`] if the prefix yields invalid names
    pub fn new(reader: Arc<Mutex<R>>, prefix: &str) -> Result<Self, Report<MetricsError>> {
        let descriptor = |quantity: &str| {
            MetricDescriptor::new(format!("{prefix}_{quantity}"), format!("Shows {quantity}"))
                .map(Arc::new)
        };

        Ok(Self {
            descriptors: [
                descriptor("temperature")?,
                descriptor("pressure")?,
                descriptor("humidity")?,
            ],
            reader,
        })
    }
}

impl<R: SensorReader> Collect for CollectionBridge<R> {
    fn describe(&self) -> &[Arc<MetricDescriptor>] {
        &self.descriptors
    }

    fn collect(&self) -> Result<SampleBatch, Report<CollectionError>> {
        let (sensed, timestamp) = {
            let mut reader = self
                .reader
                .lock()
                .map_err(|_| Report::new(CollectionError::DeviceUnavailable))?;
            let sensed = reader.sense();
            (sensed, Utc::now())
        };
        let reading = sensed.change_context(CollectionError::Sensor)?;

        tracing::debug!(
            temperature = reading.temperature(),
            pressure = reading.pressure(),
            humidity = reading.humidity(),
            %timestamp,
            "sensor reading captured"
        );

        let [temperature, pressure, humidity] = &self.descriptors;
        Ok(SampleBatch::new(
            timestamp,
            [
                (temperature.clone(), reading.temperature()),
                (pressure.clone(), reading.pressure()),
                (humidity.clone(), reading.humidity()),
            ],
        ))
    }
}
