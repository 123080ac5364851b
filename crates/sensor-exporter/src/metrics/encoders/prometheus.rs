use ::prometheus::core::Collector;
use ::prometheus::proto::MetricFamily;
use ::prometheus::Encoder;
use ::prometheus::Gauge;
use ::prometheus::Opts;
use ::prometheus::TextEncoder;
use error_stack::Report;

use super::MetricsEncoder;
use crate::metrics::MetricsError;
use crate::metrics::Sample;
use crate::metrics::SampleBatch;

/// Prometheus text format encoder. Every sample is exposed as a gauge with an
/// explicit millisecond timestamp.
pub struct PrometheusEncoder {
    inner: TextEncoder,
}

impl PrometheusEncoder {
    pub fn new() -> Self {
        Self {
            inner: TextEncoder::new(),
        }
    }
}

fn gauge_family(sample: &Sample) -> Result<Vec<MetricFamily>, Report<MetricsError>> {
    let encode_error = || MetricsError::Encode {
        format: "prometheus",
    };

    let opts = Opts::new(sample.descriptor.name(), sample.descriptor.help());
    let gauge = Gauge::with_opts(opts)
        .map_err(|e| Report::new(encode_error()).attach_printable(e.to_string()))?;
    gauge.set(sample.value);

    let mut families = gauge.collect();
    let timestamp_ms = sample.timestamp.timestamp_millis();
    for family in &mut families {
        for metric in family.mut_metric().iter_mut() {
            metric.set_timestamp_ms(timestamp_ms);
        }
    }
    Ok(families)
}

impl MetricsEncoder for PrometheusEncoder {
    fn content_type(&self) -> &'static str {
        "text/plain; version=0.0.4"
    }

    fn encode(&self, batches: &[SampleBatch]) -> Result<String, Report<MetricsError>> {
        let mut families = Vec::new();
        for sample in batches.iter().flat_map(|batch| batch.samples()) {
            families.extend(gauge_family(sample)?);
        }

        let mut buffer = Vec::new();
        self.inner.encode(&families, &mut buffer).map_err(|e| {
            Report::new(MetricsError::Encode {
                format: "prometheus",
            })
            .attach_printable(e.to_string())
        })?;

        String::from_utf8(buffer).map_err(|e| {
            Report::new(MetricsError::Encode {
                format: "prometheus",
            })
            .attach_printable(e.to_string())
        })
    }
}
