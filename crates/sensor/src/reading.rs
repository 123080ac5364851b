use error_stack::Report;
use serde::Serialize;

use crate::error::SensorError;
use crate::error::SensorResult;

/// One atomic capture of every quantity the sensor measures.
///
/// Units are fixed for the whole workspace:
/// - temperature in degrees Celsius
/// - pressure in pascals
/// - relative humidity in percent (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    #[serde(rename = "temperature_celsius")]
    temperature: f64,
    #[serde(rename = "pressure_pascals")]
    pressure: f64,
    #[serde(rename = "humidity_percent")]
    humidity: f64,
}

impl Reading {
    pub const fn new(temperature: f64, pressure: f64, humidity: f64) -> Self {
        Self {
            temperature,
            pressure,
            humidity,
        }
    }

    /// Build a reading from driver output, rejecting values that are not finite.
    pub fn checked(temperature: f64, pressure: f64, humidity: f64) -> SensorResult<Self> {
        for (quantity, value) in [
            ("temperature", temperature),
            ("pressure", pressure),
            ("humidity", humidity),
        ] {
            if !value.is_finite() {
                return Err(Report::new(SensorError::InvalidMeasurement(format!(
                    "{quantity} is {value}"
                ))));
            }
        }
        Ok(Self::new(temperature, pressure, humidity))
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }
}
