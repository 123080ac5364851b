use error_stack::Report;
use serde_json::json;

use super::MetricsEncoder;
use crate::metrics::MetricsError;
use crate::metrics::SampleBatch;

/// JSON encoder for metrics, one object per line
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsEncoder for JsonEncoder {
    fn content_type(&self) -> &'static str {
        "application/x-ndjson"
    }

    fn encode(&self, batches: &[SampleBatch]) -> Result<String, Report<MetricsError>> {
        let mut body = String::new();
        for sample in batches.iter().flat_map(|batch| batch.samples()) {
            // Non-finite values have no JSON representation
            let value = serde_json::Number::from_f64(sample.value).ok_or_else(|| {
                Report::new(MetricsError::Encode { format: "json" })
                    .attach_printable(format!("{} is {}", sample.descriptor.name(), sample.value))
            })?;

            let line = json!({
                "measure": sample.descriptor.name(),
                "help": sample.descriptor.help(),
                "ts": sample.timestamp.timestamp_millis(),
                "value": value,
            });
            body.push_str(&line.to_string());
            body.push('\n');
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::Value;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::metrics::encoders::test_support;
    use crate::metrics::MetricDescriptor;

    #[test]
    fn encodes_one_object_per_sample() {
        let encoder = JsonEncoder::new();
        let body = encoder
            .encode(&[test_support::batch()])
            .expect("encode batch");

        let parsed: Vec<Value> = body
            .lines()
            .map(|line| serde_json::from_str(line).expect("Should be valid JSON"))
            .collect();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["measure"], "sensors_1_temperature");
        assert_eq!(parsed[0]["help"], "Shows temperature");
        assert_eq!(parsed[0]["value"], 23.45);
        assert_eq!(parsed[1]["value"], 101_325.0);
        assert_eq!(parsed[2]["value"], 45.2);
        for object in &parsed {
            assert_eq!(object["ts"], test_support::TIMESTAMP_MS);
        }
    }

    #[test]
    fn rejects_non_finite_values() {
        let descriptor = Arc::new(MetricDescriptor::new("broken", "broken").expect("valid"));
        let batch = SampleBatch::new(Utc::now(), [(descriptor, f64::NAN)]);

        let report = JsonEncoder::new()
            .encode(&[batch])
            .expect_err("NaN has no JSON form");
        assert!(matches!(
            report.current_context(),
            MetricsError::Encode { format: "json" }
        ));
    }
}
