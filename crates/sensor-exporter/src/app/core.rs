use std::sync::Arc;

use anyhow::Result;

use crate::api::ScrapeContext;
use crate::app::device::SharedSensor;
use crate::app::tasks::Tasks;
use crate::config::ServeArgs;

/// Application core structure with explicit dependencies
pub struct Application {
    sensor: SharedSensor,
    context: Arc<ScrapeContext>,
    serve_args: ServeArgs,
}

impl Application {
    pub fn new(sensor: SharedSensor, context: Arc<ScrapeContext>, serve_args: ServeArgs) -> Self {
        Self {
            sensor,
            context,
            serve_args,
        }
    }

    pub fn context(&self) -> &Arc<ScrapeContext> {
        &self.context
    }

    pub fn serve_args(&self) -> &ServeArgs {
        &self.serve_args
    }

    /// Run application, start all tasks and wait for completion
    pub async fn run(&self) -> Result<()> {
        tracing::info!("Starting all application tasks...");

        let mut tasks = Tasks::new();

        if let Err(e) = tasks.spawn_all_tasks(self) {
            tracing::error!("Failed to spawn application tasks: {}", e);
            return Err(e);
        }

        if let Err(e) = tasks.wait_for_completion().await {
            tracing::error!("Error during task execution: {}", e);
            return Err(e);
        }

        tracing::info!("Application run completed");
        Ok(())
    }

    /// Gracefully shutdown application, releasing the sensor.
    ///
    /// A transaction abandoned after a timeout may still hold the device; it
    /// is released once that transaction returns.
    pub fn shutdown(self) {
        tracing::info!("Shutting down application...");

        let Self {
            sensor, context, ..
        } = self;
        drop(context);
        match Arc::try_unwrap(sensor) {
            Ok(sensor) => {
                drop(sensor);
                tracing::info!("Sensor released");
            }
            Err(_) => tracing::warn!("Sensor still in use, release deferred"),
        }

        tracing::info!("Application shutdown completed");
    }
}
