use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use error_stack::Report;
use sensor::fake::FakeSensor;
use sensor::Reading;
use sensor::SensorError;
use sensor::SensorReader;
use sensor::SensorResult;
use sensor_exporter::bridge::Collect;
use sensor_exporter::bridge::CollectionBridge;
use sensor_exporter::bridge::CollectionError;
use sensor_exporter::registry::MetricsRegistry;
use similar_asserts::assert_eq;
use test_log::test;

const NAMES: [&str; 3] = [
    "sensors_1_temperature",
    "sensors_1_pressure",
    "sensors_1_humidity",
];

fn bridge<R: SensorReader>(reader: R) -> CollectionBridge<R> {
    CollectionBridge::new(Arc::new(Mutex::new(reader)), "sensors_1").expect("valid prefix")
}

/// Fails the test if the hardware is touched.
struct Untouchable;

impl SensorReader for Untouchable {
    fn sense(&mut self) -> SensorResult<Reading> {
        panic!("describe must not touch the sensor");
    }
}

#[test]
fn successful_collect_yields_three_samples_with_one_timestamp() {
    let batch = bridge(FakeSensor::new(Reading::new(23.45, 101_325.0, 45.2)))
        .collect()
        .expect("reading");

    assert_eq!(batch.len(), 3);
    let names: Vec<_> = batch.samples().iter().map(|s| s.descriptor.name()).collect();
    assert_eq!(names, NAMES);
    assert!(batch
        .samples()
        .iter()
        .all(|sample| sample.timestamp == batch.timestamp()));
    assert_eq!(batch.value_of("sensors_1_temperature"), Some(23.45));
    assert_eq!(batch.value_of("sensors_1_pressure"), Some(101_325.0));
    assert_eq!(batch.value_of("sensors_1_humidity"), Some(45.2));
}

#[test]
fn failed_collect_yields_no_samples_and_keeps_the_cause() {
    let sensor = FakeSensor::default()
        .with_script([Err(SensorError::Transport("bus timeout".to_string()))]);
    let report = match bridge(sensor).collect() {
        Ok(batch) => panic!("expected failure, got {batch:?}"),
        Err(report) => report,
    };

    assert!(matches!(report.current_context(), CollectionError::Sensor));
    assert_eq!(
        report.downcast_ref::<SensorError>(),
        Some(&SensorError::Transport("bus timeout".to_string()))
    );
}

#[test]
fn describe_is_idempotent_and_never_senses() {
    let bridge = bridge(Untouchable);
    let first: Vec<_> = bridge.describe().iter().map(|d| d.name().to_string()).collect();
    let second: Vec<_> = bridge.describe().iter().map(|d| d.name().to_string()).collect();

    assert_eq!(first, NAMES);
    assert_eq!(first, second);
    let helps: Vec<_> = bridge.describe().iter().map(|d| d.help()).collect();
    assert_eq!(
        helps,
        ["Shows temperature", "Shows pressure", "Shows humidity"]
    );
}

#[test]
fn sequential_collects_take_one_reading_each() {
    let sensor = FakeSensor::default();
    let calls = sensor.call_counter();
    let bridge = bridge(sensor);

    let before = Utc::now();
    let first = bridge.collect().expect("first reading");
    let second = bridge.collect().expect("second reading");
    let after = Utc::now();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(before <= first.timestamp());
    assert!(first.timestamp() <= second.timestamp());
    assert!(second.timestamp() <= after);
}

#[test]
fn a_failure_does_not_poison_later_collects() {
    let sensor =
        FakeSensor::default().with_script([Err(SensorError::Transport("NACK".to_string()))]);
    let bridge = bridge(sensor);

    assert!(bridge.collect().is_err());
    assert_eq!(bridge.collect().expect("recovered").len(), 3);
}

/// Records overlapping `sense` calls.
struct OverlapDetector {
    in_flight: Arc<Mutex<bool>>,
    overlaps: Arc<Mutex<usize>>,
    inner: FakeSensor,
}

impl SensorReader for OverlapDetector {
    fn sense(&mut self) -> SensorResult<Reading> {
        {
            let mut in_flight = self.in_flight.lock().expect("lock");
            if *in_flight {
                *self.overlaps.lock().expect("lock") += 1;
            }
            *in_flight = true;
        }
        let result = self.inner.sense();
        *self.in_flight.lock().expect("lock") = false;
        result
    }
}

#[test]
fn concurrent_collects_never_interleave_transactions() {
    let inner = FakeSensor::default()
        .with_latency(Duration::from_millis(5))
        .with_script((0..10).map(|i| {
            let i = f64::from(i);
            Ok(Reading::new(i, 1000.0 + i, i / 2.0))
        }));
    let calls = inner.call_counter();
    let overlaps = Arc::new(Mutex::new(0));
    let bridge = Arc::new(bridge(OverlapDetector {
        in_flight: Arc::new(Mutex::new(false)),
        overlaps: overlaps.clone(),
        inner,
    }));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let bridge = bridge.clone();
            std::thread::spawn(move || bridge.collect())
        })
        .collect();
    let mut temperatures = Vec::new();
    for handle in handles {
        let batch = handle.join().expect("thread").expect("reading");
        assert_eq!(batch.len(), 3);

        // all three values come from the same scripted reading
        let temperature = batch.value_of("sensors_1_temperature").expect("temperature");
        assert_eq!(batch.value_of("sensors_1_pressure"), Some(1000.0 + temperature));
        assert_eq!(batch.value_of("sensors_1_humidity"), Some(temperature / 2.0));
        temperatures.push(temperature);
    }

    temperatures.sort_by(f64::total_cmp);
    let expected: Vec<f64> = (0..10).map(f64::from).collect();
    assert_eq!(temperatures, expected);
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    assert_eq!(*overlaps.lock().expect("lock"), 0);
}

#[test(tokio::test)]
async fn registry_times_out_a_hung_sensor() {
    let sensor = FakeSensor::default().with_latency(Duration::from_millis(500));
    let mut registry = MetricsRegistry::new(Duration::from_millis(50));
    registry.register(Arc::new(bridge(sensor))).expect("register");

    let outcomes = registry.gather().await;
    assert_eq!(outcomes.len(), 1);
    let report: &Report<CollectionError> = match &outcomes[0] {
        Ok(batch) => panic!("expected timeout, got {batch:?}"),
        Err(report) => report,
    };
    assert!(matches!(
        report.current_context(),
        CollectionError::Timeout { millis: 50 }
    ));
}
