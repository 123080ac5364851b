#![cfg(feature = "bme280")]

use sensor::bme280::Bme280Sensor;
use sensor::bme280::DEFAULT_I2C_ADDRESS;
use sensor::SensorInitError;

#[test]
fn missing_bus_is_an_initialization_error() {
    let bus = missing_bus_path();
    let report = match Bme280Sensor::open(&bus, DEFAULT_I2C_ADDRESS) {
        Ok(_) => panic!("opening a non-existent bus must fail"),
        Err(report) => report,
    };

    assert_eq!(
        report.current_context(),
        &SensorInitError::BusOpen(bus.display().to_string())
    );
}

fn missing_bus_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("no-such-i2c-bus-{}", std::process::id()))
}
