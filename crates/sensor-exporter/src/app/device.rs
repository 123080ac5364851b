use std::sync::Arc;
use std::sync::Mutex;

use error_stack::Report;
use sensor::fake::FakeSensor;
use sensor::SensorInitError;
use sensor::SensorReader;

use crate::config::DeviceArgs;

/// Sensor handle shared between the lifecycle owner and the collection bridge
pub type SharedSensor = Arc<Mutex<Box<dyn SensorReader>>>;

/// Open the configured sensor.
///
/// # Errors
///
/// - [`SensorInitError`] if the bus cannot be opened or the device does not
///   answer; callers treat this as fatal
pub fn open_device(args: &DeviceArgs) -> Result<Box<dyn SensorReader>, Report<SensorInitError>> {
    if args.fake_sensor {
        tracing::warn!("Using fake sensor, readings are constant");
        return Ok(Box::new(FakeSensor::default()));
    }

    open_hardware(args)
}

#[cfg(feature = "bme280")]
fn open_hardware(args: &DeviceArgs) -> Result<Box<dyn SensorReader>, Report<SensorInitError>> {
    let sensor = sensor::bme280::Bme280Sensor::open(&args.i2c_bus, args.i2c_address)?;
    Ok(Box::new(sensor))
}

#[cfg(not(feature = "bme280"))]
fn open_hardware(args: &DeviceArgs) -> Result<Box<dyn SensorReader>, Report<SensorInitError>> {
    Err(
        Report::new(SensorInitError::BusOpen(args.i2c_bus.display().to_string()))
            .attach_printable("built without BME280 support, use --fake-sensor"),
    )
}
