use core::error::Error;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use error_stack::Report;
use serde::Serialize;

pub mod encoders;

/// Metric descriptor and encoding errors
#[derive(Debug, derive_more::Display)]
pub enum MetricsError {
    #[display("Invalid metric descriptor `{name}`")]
    InvalidDescriptor { name: String },
    #[display("Metric `{name}` is already registered")]
    DuplicateDescriptor { name: String },
    #[display("Failed to encode metrics as {format}")]
    Encode { format: &'static str },
}

impl Error for MetricsError {}

/// Static metadata of one exposed series. Labels are not supported: every
/// series this exporter serves has an empty label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    name: String,
    help: String,
}

impl MetricDescriptor {
    /// Create a descriptor, validating the name against the exposition grammar.
    ///
    /// # Errors
    ///
    /// - [`MetricsError::InvalidDescriptor`] if the name is not a valid metric
    ///   name or the help text is empty
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
    ) -> Result<Self, Report<MetricsError>> {
        let name = name.into();
        let help = help.into();

        prometheus::core::Desc::new(name.clone(), help.clone(), Vec::new(), HashMap::new())
            .map_err(|e| {
                Report::new(MetricsError::InvalidDescriptor { name: name.clone() })
                    .attach_printable(e.to_string())
            })?;

        Ok(Self { name, help })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }
}

/// One value of one series at the instant it was captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub descriptor: Arc<MetricDescriptor>,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Samples produced by a single successful collection. Every sample in a batch
/// carries the same capture timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    timestamp: DateTime<Utc>,
    samples: Vec<Sample>,
}

impl SampleBatch {
    pub fn new(
        timestamp: DateTime<Utc>,
        values: impl IntoIterator<Item = (Arc<MetricDescriptor>, f64)>,
    ) -> Self {
        let samples = values
            .into_iter()
            .map(|(descriptor, value)| Sample {
                descriptor,
                value,
                timestamp,
            })
            .collect();
        Self { timestamp, samples }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value of the series called `name`, if the batch has one.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|sample| sample.descriptor.name() == name)
            .map(|sample| sample.value)
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn descriptor_accepts_valid_name() {
        let descriptor =
            MetricDescriptor::new("sensors_1_temperature", "Shows temperature").expect("valid");
        assert_eq!(descriptor.name(), "sensors_1_temperature");
        assert_eq!(descriptor.help(), "Shows temperature");
    }

    #[test]
    fn descriptor_rejects_hyphenated_name() {
        let report = MetricDescriptor::new("sensors-1-temperature", "Shows temperature")
            .expect_err("hyphens are not allowed in metric names");
        assert!(matches!(
            report.current_context(),
            MetricsError::InvalidDescriptor { name } if name == "sensors-1-temperature"
        ));
    }

    #[test]
    fn descriptor_rejects_empty_help() {
        assert!(MetricDescriptor::new("sensors_1_pressure", "").is_err());
    }

    #[test]
    fn batch_shares_timestamp() {
        let timestamp = Utc::now();
        let a = Arc::new(MetricDescriptor::new("a", "a").expect("valid"));
        let b = Arc::new(MetricDescriptor::new("b", "b").expect("valid"));
        let batch = SampleBatch::new(timestamp, [(a, 1.0), (b, 2.0)]);

        assert_eq!(batch.len(), 2);
        assert!(batch.samples().iter().all(|s| s.timestamp == timestamp));
        assert_eq!(batch.value_of("b"), Some(2.0));
        assert_eq!(batch.value_of("c"), None);
    }

    #[test]
    fn metrics_error_display_formatting() {
        assert_eq!(
            MetricsError::DuplicateDescriptor {
                name: "x".to_string()
            }
            .to_string(),
            "Metric `x` is already registered"
        );
        assert_eq!(
            MetricsError::Encode { format: "json" }.to_string(),
            "Failed to encode metrics as json"
        );
    }
}
