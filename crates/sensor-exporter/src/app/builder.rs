use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;

use crate::api::ScrapeContext;
use crate::app::device::open_device;
use crate::app::Application;
use crate::bridge::CollectionBridge;
use crate::config::ServeArgs;
use crate::metrics::encoders::create_encoder;
use crate::registry::MetricsRegistry;

/// Application builder
pub struct ApplicationBuilder {
    serve_args: ServeArgs,
}

impl ApplicationBuilder {
    /// Create new application builder
    pub fn new(serve_args: ServeArgs) -> Self {
        Self { serve_args }
    }

    /// Build complete application
    ///
    /// Fails if the sensor cannot be initialized or the configured prefix
    /// does not yield valid metric names.
    pub fn build(self) -> Result<Application> {
        tracing::info!("Building application components...");

        let device = open_device(&self.serve_args.device)
            .map_err(|e| anyhow::anyhow!("Failed to initialize sensor: {e:?}"))?;
        let sensor = Arc::new(Mutex::new(device));

        let bridge = CollectionBridge::new(sensor.clone(), &self.serve_args.metrics_prefix)
            .map_err(|e| anyhow::anyhow!("Failed to create collection bridge: {e:?}"))?;

        let mut registry = MetricsRegistry::new(self.serve_args.sense_timeout());
        registry
            .register(Arc::new(bridge))
            .map_err(|e| anyhow::anyhow!("Failed to register sensor collector: {e:?}"))?;

        for descriptor in registry.describe() {
            tracing::info!(name = descriptor.name(), "Registered metric");
        }

        let context = ScrapeContext::new(
            registry,
            create_encoder(self.serve_args.metrics_format),
            self.serve_args.on_sense_failure,
        );

        Ok(Application::new(sensor, context, self.serve_args))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::config::Cli;
    use crate::config::Commands;

    fn serve_args(extra: &[&str]) -> ServeArgs {
        let cli = Cli::try_parse_from(["sensor-exporter", "serve"].iter().chain(extra))
            .expect("valid command line");
        match cli.command {
            Commands::Serve(args) => *args,
            Commands::Read(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn builds_with_fake_sensor() {
        let app = ApplicationBuilder::new(serve_args(&["--fake-sensor"]))
            .build()
            .expect("application");
        let names: Vec<_> = app
            .context()
            .registry
            .describe()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "sensors_1_temperature",
                "sensors_1_pressure",
                "sensors_1_humidity"
            ]
        );
    }

    #[test]
    fn invalid_prefix_is_fatal() {
        let result = ApplicationBuilder::new(serve_args(&[
            "--fake-sensor",
            "--metrics-prefix",
            "sensors-1",
        ]))
        .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_bus_is_fatal() {
        let result =
            ApplicationBuilder::new(serve_args(&["--i2c-bus", "/nonexistent/i2c-bus"])).build();
        let err = match result {
            Ok(_) => panic!("bus does not exist"),
            Err(err) => err,
        };
        assert!(err.to_string().starts_with("Failed to initialize sensor"));
    }
}
