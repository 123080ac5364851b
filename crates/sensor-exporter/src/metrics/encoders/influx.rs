use error_stack::Report;
use influxdb_line_protocol::LineProtocolBuilder;

use super::MetricsEncoder;
use crate::metrics::MetricsError;
use crate::metrics::SampleBatch;

/// InfluxDB line protocol encoder
///
/// Each sample becomes one line: the series name is the measurement, the value
/// is stored in the `value` field, the timestamp is in milliseconds.
pub struct InfluxEncoder;

impl InfluxEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsEncoder for InfluxEncoder {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn encode(&self, batches: &[SampleBatch]) -> Result<String, Report<MetricsError>> {
        let mut builder = LineProtocolBuilder::new();
        for sample in batches.iter().flat_map(|batch| batch.samples()) {
            builder = builder
                .measurement(sample.descriptor.name())
                .field("value", sample.value)
                .timestamp(sample.timestamp.timestamp_millis())
                .close_line();
        }

        String::from_utf8(builder.build()).map_err(|e| {
            tracing::error!(
                target: "metrics",
                msg = "Failed to convert line protocol bytes to string",
            );
            Report::new(MetricsError::Encode { format: "influx" }).attach_printable(e.to_string())
        })
    }
}
