use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::api::FailurePolicy;
use crate::config::device::DeviceArgs;
use crate::metrics::encoders::MetricsFormat;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_LISTEN_ADDR",
        default_value = "0.0.0.0:9101",
        help = "HTTP metrics server listen address"
    )]
    pub listen_addr: String,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_METRICS_PREFIX",
        default_value = "sensors_1",
        help = "Prefix of the exposed series, e.g. sensors_1 gives sensors_1_temperature"
    )]
    pub metrics_prefix: String,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_METRICS_FORMAT",
        value_enum,
        default_value_t = MetricsFormat::Prometheus,
        help = "Exposition format of /metrics"
    )]
    pub metrics_format: MetricsFormat,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_SENSE_TIMEOUT_MS",
        default_value = "2000",
        help = "Deadline for one sensor transaction, in milliseconds"
    )]
    pub sense_timeout_ms: u64,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_ON_SENSE_FAILURE",
        value_enum,
        default_value_t = FailurePolicy::Fail,
        help = "Scrape response when the sensor fails: 'fail' answers 503, 'degrade' omits the series"
    )]
    pub on_sense_failure: FailurePolicy,

    #[arg(
        long,
        env = "SENSOR_EXPORTER_LOG_FILE",
        value_hint = clap::ValueHint::FilePath,
        help = "Also write logs to this file, rotated daily, e.g. /var/log/sensor-exporter/exporter.log"
    )]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    pub fn sense_timeout(&self) -> Duration {
        Duration::from_millis(self.sense_timeout_ms)
    }
}
