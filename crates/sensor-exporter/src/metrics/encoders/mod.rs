use error_stack::Report;

use super::MetricsError;
use super::SampleBatch;

pub mod influx;
pub mod json;
pub mod prometheus;

/// Exposition formats served on `/metrics`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, derive_more::Display)]
pub enum MetricsFormat {
    /// Prometheus text exposition format 0.0.4
    #[default]
    #[display("prometheus")]
    Prometheus,
    /// InfluxDB line protocol, millisecond timestamps
    #[display("influx")]
    Influx,
    /// One JSON object per sample
    #[display("json")]
    Json,
}

/// Trait for encoding sample batches into an exposition body
pub trait MetricsEncoder: Send + Sync {
    /// `Content-Type` header value for the encoded body
    fn content_type(&self) -> &'static str;

    /// Encode every sample of every batch. Batches are emitted in order.
    fn encode(&self, batches: &[SampleBatch]) -> Result<String, Report<MetricsError>>;
}

/// Factory function to create encoders based on the configured format
pub fn create_encoder(format: MetricsFormat) -> Box<dyn MetricsEncoder> {
    match format {
        MetricsFormat::Prometheus => Box::new(prometheus::PrometheusEncoder::new()),
        MetricsFormat::Influx => Box::new(influx::InfluxEncoder::new()),
        MetricsFormat::Json => Box::new(json::JsonEncoder::new()),
    }
}
