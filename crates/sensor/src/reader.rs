use crate::error::SensorResult;
use crate::reading::Reading;

/// Capability to take one environmental reading from hardware.
///
/// `sense` blocks for the duration of a bus transaction, typically tens to
/// hundreds of milliseconds depending on oversampling. Callers running on an
/// async runtime must move it off the reactor thread.
///
/// Implementations never retry: a failed transaction is returned as is, so the
/// caller decides whether another attempt is worth the skew in timestamps.
pub trait SensorReader: Send {
    fn sense(&mut self) -> SensorResult<Reading>;
}

impl<R: SensorReader + ?Sized> SensorReader for Box<R> {
    fn sense(&mut self) -> SensorResult<Reading> {
        (**self).sense()
    }
}
