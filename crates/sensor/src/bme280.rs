//! Bosch BME280 over Linux I2C (`/dev/i2c-*`).

use std::fmt::Debug;
use std::path::Path;
use std::path::PathBuf;

use ::bme280::i2c::BME280;
use ::bme280::Error;
use error_stack::Report;
use linux_embedded_hal::Delay;
use linux_embedded_hal::I2cdev;

use crate::error::SensorError;
use crate::error::SensorInitError;
use crate::error::SensorResult;
use crate::reader::SensorReader;
use crate::reading::Reading;

/// Address used when the SDO pin is pulled to ground.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x76;

pub struct Bme280Sensor {
    driver: BME280<I2cdev>,
    delay: Delay,
    bus: PathBuf,
    address: u8,
}

impl Bme280Sensor {
    /// Open the bus, probe the chip and load its calibration data.
    ///
    /// # Errors
    ///
    /// - [`SensorInitError::BusOpen`] if the bus device cannot be opened
    /// - [`SensorInitError::Probe`] if nothing usable answers at `address`
    /// - [`SensorInitError::Calibration`] if the chip's calibration block is unusable
    pub fn open(bus: impl AsRef<Path>, address: u8) -> Result<Self, Report<SensorInitError>> {
        let bus = bus.as_ref().to_path_buf();
        let i2c = I2cdev::new(&bus).map_err(|e| {
            Report::new(SensorInitError::BusOpen(bus.display().to_string()))
                .attach_printable(format!("{e:?}"))
        })?;

        let mut driver = BME280::new(i2c, address);
        let mut delay = Delay;
        driver
            .init(&mut delay)
            .map_err(|e| Report::new(init_error(e, address)))?;

        tracing::info!(bus = %bus.display(), address = format_args!("{address:#04x}"), "BME280 initialized");

        Ok(Self {
            driver,
            delay,
            bus,
            address,
        })
    }
}

fn init_error<E: Debug>(error: Error<E>, address: u8) -> SensorInitError {
    match error {
        Error::NoCalibrationData | Error::InvalidData => {
            SensorInitError::Calibration(format!("{error:?}"))
        }
        _ => SensorInitError::Probe(address),
    }
}

fn sense_error<E: Debug>(error: Error<E>) -> SensorError {
    match error {
        Error::Bus(e) => SensorError::Transport(format!("{e:?}")),
        Error::NoCalibrationData | Error::InvalidData => {
            SensorError::Calibration(format!("{error:?}"))
        }
        Error::CompensationFailed => {
            SensorError::InvalidMeasurement("compensation failed".to_string())
        }
        other => SensorError::Transport(format!("{other:?}")),
    }
}

impl SensorReader for Bme280Sensor {
    fn sense(&mut self) -> SensorResult<Reading> {
        let measurements = self.driver.measure(&mut self.delay).map_err(|e| {
            Report::new(sense_error(e)).attach_printable(format!(
                "bus {} address {:#04x}",
                self.bus.display(),
                self.address
            ))
        })?;

        Reading::checked(
            f64::from(measurements.temperature),
            f64::from(measurements.pressure),
            f64::from(measurements.humidity),
        )
    }
}

impl Drop for Bme280Sensor {
    fn drop(&mut self) {
        tracing::info!(bus = %self.bus.display(), "releasing BME280");
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn bus_failures_are_transport_errors() {
        assert_eq!(
            sense_error(Error::Bus("nack")),
            SensorError::Transport("\"nack\"".to_string())
        );
    }

    #[test]
    fn calibration_failures_keep_their_cause() {
        assert!(matches!(
            sense_error(Error::<()>::NoCalibrationData),
            SensorError::Calibration(_)
        ));
        assert!(matches!(
            sense_error(Error::<()>::InvalidData),
            SensorError::Calibration(_)
        ));
    }

    #[test]
    fn failed_compensation_is_an_invalid_measurement() {
        assert_eq!(
            sense_error(Error::<()>::CompensationFailed),
            SensorError::InvalidMeasurement("compensation failed".to_string())
        );
    }

    #[test]
    fn init_separates_calibration_from_probe_failures() {
        assert!(matches!(
            init_error(Error::<()>::NoCalibrationData, 0x76),
            SensorInitError::Calibration(_)
        ));
        assert_eq!(init_error(Error::Bus("nack"), 0x77), SensorInitError::Probe(0x77));
    }
}
