//! In-memory sensor used for demos and tests.

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use error_stack::Report;

use crate::error::SensorError;
use crate::error::SensorResult;
use crate::reader::SensorReader;
use crate::reading::Reading;

/// Indoor conditions at sea level.
pub const BASELINE: Reading = Reading::new(21.5, 101_325.0, 40.0);

/// Sensor that replays a script, then keeps answering with a fixed reading.
#[derive(Debug)]
pub struct FakeSensor {
    baseline: Reading,
    script: VecDeque<Result<Reading, SensorError>>,
    latency: Duration,
    calls: Arc<AtomicUsize>,
}

impl Default for FakeSensor {
    fn default() -> Self {
        Self::new(BASELINE)
    }
}

impl FakeSensor {
    pub fn new(baseline: Reading) -> Self {
        Self {
            baseline,
            script: VecDeque::new(),
            latency: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Simulate the bus transaction time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Outcomes returned, in order, before falling back to the baseline.
    pub fn with_script(
        mut self,
        script: impl IntoIterator<Item = Result<Reading, SensorError>>,
    ) -> Self {
        self.script.extend(script);
        self
    }

    /// Shared counter of `sense` invocations, readable after the sensor moved.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl SensorReader for FakeSensor {
    fn sense(&mut self) -> SensorResult<Reading> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        match self.script.pop_front() {
            Some(Ok(reading)) => Ok(reading),
            Some(Err(error)) => {
                tracing::debug!(call, %error, "fake sensor returning scripted failure");
                Err(Report::new(error))
            }
            None => Ok(self.baseline),
        }
    }
}
