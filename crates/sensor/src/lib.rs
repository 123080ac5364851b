//! Environmental sensor access.
//!
//! A [`SensorReader`] performs one blocking hardware transaction per call and
//! yields a [`Reading`] holding temperature, pressure and relative humidity.
//! Opening the bus and probing the device are separate steps that fail with
//! [`SensorInitError`], so that startup failures are never confused with a
//! single failed measurement ([`SensorError`]).

#[cfg(feature = "bme280")]
pub mod bme280;
pub mod error;
pub mod fake;
pub mod reader;
pub mod reading;

pub use error::SensorError;
pub use error::SensorInitError;
pub use error::SensorResult;
pub use reader::SensorReader;
pub use reading::Reading;
