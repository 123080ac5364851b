use error_stack::Report;
use thiserror::Error;

/// Result of a single sense transaction.
pub type SensorResult<T> = Result<T, Report<SensorError>>;

/// Failure of one measurement transaction on an already initialized device.
///
/// These are transient: the next transaction may succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// Bus level failure: timeout, NACK, device gone.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed calibration data: {0}")]
    Calibration(String),

    /// The device answered, but with a value that is not a physical quantity.
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
}

/// Failure to bring the device up. Fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorInitError {
    #[error("failed to open bus `{0}`")]
    BusOpen(String),

    #[error("no sensor responded at address {0:#04x}")]
    Probe(u8),

    #[error("malformed calibration data: {0}")]
    Calibration(String),
}
