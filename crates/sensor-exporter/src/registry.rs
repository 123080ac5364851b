use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use error_stack::Report;
use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::bridge::Collect;
use crate::bridge::CollectionError;
use crate::metrics::MetricDescriptor;
use crate::metrics::MetricsError;
use crate::metrics::SampleBatch;

/// Outcome of one collector during one scrape
pub type CollectOutcome = Result<SampleBatch, Report<CollectionError>>;

/// A collector and the gate admitting one transaction at a time to it.
struct Registered {
    collector: Arc<dyn Collect>,
    gate: Arc<Semaphore>,
}

/// Explicitly constructed registry of pull collectors.
///
/// Collectors are invoked on the blocking thread pool, one task per collector
/// per scrape, each bounded by `sense_timeout`. A scrape waits for its
/// collector's gate under that same deadline, so at most one transaction per
/// collector is ever in flight and a scrape that gave up never reaches the
/// device.
pub struct MetricsRegistry {
    collectors: Vec<Registered>,
    names: HashSet<String>,
    sense_timeout: Duration,
}

impl MetricsRegistry {
    pub fn new(sense_timeout: Duration) -> Self {
        Self {
            collectors: Vec::new(),
            names: HashSet::new(),
            sense_timeout,
        }
    }

    /// Register a collector, rejecting series names that are already served.
    ///
    /// # Errors
    ///
    /// - [`MetricsError::DuplicateDescriptor`] if any descriptor name clashes
    ///   with an already registered one; the registry is left unchanged
    pub fn register(&mut self, collector: Arc<dyn Collect>) -> Result<(), Report<MetricsError>> {
        let mut incoming = HashSet::new();
        for descriptor in collector.describe() {
            let name = descriptor.name();
            if self.names.contains(name) || !incoming.insert(name.to_string()) {
                return Err(Report::new(MetricsError::DuplicateDescriptor {
                    name: name.to_string(),
                }));
            }
        }

        tracing::info!(
            series = ?incoming.iter().collect::<Vec<_>>(),
            "registered collector"
        );
        self.names.extend(incoming);
        self.collectors.push(Registered {
            collector,
            gate: Arc::new(Semaphore::new(1)),
        });
        Ok(())
    }

    /// Descriptors of every registered collector, in registration order.
    pub fn describe(&self) -> Vec<Arc<MetricDescriptor>> {
        self.collectors
            .iter()
            .flat_map(|registered| registered.collector.describe().iter().cloned())
            .collect()
    }

    pub fn sense_timeout(&self) -> Duration {
        self.sense_timeout
    }

    /// Run every collector once, concurrently, off the async reactor.
    pub async fn gather(&self) -> Vec<CollectOutcome> {
        let tasks = self
            .collectors
            .iter()
            .map(|registered| collect_blocking(registered, self.sense_timeout));
        join_all(tasks).await
    }
}

async fn collect_blocking(registered: &Registered, deadline: Duration) -> CollectOutcome {
    let collector = registered.collector.clone();
    let gate = registered.gate.clone();
    let task = async move {
        let Ok(permit) = gate.acquire_owned().await else {
            return Ok(Err(
                Report::new(CollectionError::Aborted).attach_printable("collector gate closed")
            ));
        };
        tokio::task::spawn_blocking(move || {
            // Held until the transaction returns, even if the scrape is gone.
            let _permit = permit;
            collector.collect()
        })
        .await
    };

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => {
            tracing::error!("Collection task failed: {join_error}");
            Err(Report::new(CollectionError::Aborted).attach_printable(join_error.to_string()))
        }
        Err(_) => {
            // An admitted transaction keeps running; its result is dropped.
            tracing::error!(
                timeout_ms = deadline.as_millis(),
                "Sensor transaction abandoned after deadline, device may need reinitialization"
            );
            Err(Report::new(CollectionError::Timeout {
                millis: deadline.as_millis(),
            }))
        }
    }
}
