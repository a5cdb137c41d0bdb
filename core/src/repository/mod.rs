//! State store contract consumed by the alarm engine.

use crate::error::RepositoryError;
use crate::model::{AlarmStatus, ArmingStatus, Sensor};

pub type RepositoryResult = Result<(), RepositoryError>;

/// Durable home for the sensor set, alarm status and arming status.
///
/// Every mutator is atomic from the caller's point of view. Getters return
/// `None` when the value is unavailable; the engine treats that fail-open.
pub trait SecurityRepository: Send {
    fn add_sensor(&mut self, sensor: Sensor) -> RepositoryResult;
    fn remove_sensor(&mut self, sensor: &Sensor) -> RepositoryResult;
    /// Replace the stored sensor with the same id. Unknown sensors are logged and ignored.
    fn update_sensor(&mut self, sensor: &Sensor) -> RepositoryResult;
    /// Snapshot copy; later mutations of the store do not show up in it.
    fn sensors(&self) -> Option<Vec<Sensor>>;

    fn alarm_status(&self) -> Option<AlarmStatus>;
    fn set_alarm_status(&mut self, status: AlarmStatus) -> RepositoryResult;

    fn arming_status(&self) -> Option<ArmingStatus>;
    fn set_arming_status(&mut self, status: ArmingStatus) -> RepositoryResult;
}

impl<R: SecurityRepository + ?Sized> SecurityRepository for Box<R> {
    fn add_sensor(&mut self, sensor: Sensor) -> RepositoryResult {
        (**self).add_sensor(sensor)
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        (**self).remove_sensor(sensor)
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        (**self).update_sensor(sensor)
    }

    fn sensors(&self) -> Option<Vec<Sensor>> {
        (**self).sensors()
    }

    fn alarm_status(&self) -> Option<AlarmStatus> {
        (**self).alarm_status()
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> RepositoryResult {
        (**self).set_alarm_status(status)
    }

    fn arming_status(&self) -> Option<ArmingStatus> {
        (**self).arming_status()
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> RepositoryResult {
        (**self).set_arming_status(status)
    }
}
