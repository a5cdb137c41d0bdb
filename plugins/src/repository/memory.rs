use catpoint_core::api::{
    AlarmStatus, ArmingStatus, RepositoryResult, SecurityRepository, Sensor,
};
use serde::{Deserialize, Serialize};

/// Persisted shape of the security state. Statuses are stored by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SecurityState {
    #[serde(rename = "SENSORS", default)]
    pub sensors: Vec<Sensor>,
    #[serde(rename = "ALARM_STATUS", default = "default_alarm_status")]
    pub alarm_status: AlarmStatus,
    #[serde(rename = "ARMING_STATUS", default = "default_arming_status")]
    pub arming_status: ArmingStatus,
}

fn default_alarm_status() -> AlarmStatus {
    AlarmStatus::NoAlarm
}

fn default_arming_status() -> ArmingStatus {
    ArmingStatus::Disarmed
}

impl Default for SecurityState {
    fn default() -> Self {
        Self {
            sensors: Vec::new(),
            alarm_status: default_alarm_status(),
            arming_status: default_arming_status(),
        }
    }
}

impl SecurityState {
    /// Returns true when the state actually changed.
    pub fn add_sensor(&mut self, sensor: Sensor) -> bool {
        if self.sensors.contains(&sensor) {
            tracing::debug!(sensor_id = %sensor.sensor_id(), "Sensor already tracked");
            return false;
        }
        self.sensors.push(sensor);
        true
    }

    pub fn remove_sensor(&mut self, sensor: &Sensor) -> bool {
        let before = self.sensors.len();
        self.sensors.retain(|s| s != sensor);
        self.sensors.len() != before
    }

    pub fn update_sensor(&mut self, sensor: &Sensor) -> bool {
        match self
            .sensors
            .iter_mut()
            .find(|s| s.sensor_id() == sensor.sensor_id())
        {
            Some(slot) => {
                *slot = sensor.clone();
                true
            }
            None => {
                tracing::warn!(
                    sensor_id = %sensor.sensor_id(),
                    sensor = sensor.name(),
                    "Attempted to update a sensor that is not tracked"
                );
                false
            }
        }
    }

    pub fn set_alarm_status(&mut self, status: AlarmStatus) -> bool {
        let changed = self.alarm_status != status;
        self.alarm_status = status;
        changed
    }

    pub fn set_arming_status(&mut self, status: ArmingStatus) -> bool {
        let changed = self.arming_status != status;
        self.arming_status = status;
        changed
    }
}

/// Non-durable store; state is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecurityRepository {
    state: SecurityState,
}

impl InMemorySecurityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(arming: ArmingStatus, alarm: AlarmStatus) -> Self {
        Self {
            state: SecurityState {
                alarm_status: alarm,
                arming_status: arming,
                ..SecurityState::default()
            },
        }
    }
}

impl SecurityRepository for InMemorySecurityRepository {
    fn add_sensor(&mut self, sensor: Sensor) -> RepositoryResult {
        self.state.add_sensor(sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        self.state.remove_sensor(sensor);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        self.state.update_sensor(sensor);
        Ok(())
    }

    fn sensors(&self) -> Option<Vec<Sensor>> {
        Some(self.state.sensors.clone())
    }

    fn alarm_status(&self) -> Option<AlarmStatus> {
        Some(self.state.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> RepositoryResult {
        self.state.set_alarm_status(status);
        Ok(())
    }

    fn arming_status(&self) -> Option<ArmingStatus> {
        Some(self.state.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> RepositoryResult {
        self.state.set_arming_status(status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catpoint_core::api::SensorType;

    #[test]
    fn test_defaults_are_disarmed_and_quiet() {
        let repo = InMemorySecurityRepository::new();
        assert_eq!(repo.arming_status(), Some(ArmingStatus::Disarmed));
        assert_eq!(repo.alarm_status(), Some(AlarmStatus::NoAlarm));
        assert_eq!(repo.sensors(), Some(vec![]));
    }

    #[test]
    fn test_sensor_identity_drives_add_update_remove() {
        let mut repo = InMemorySecurityRepository::new();
        let mut door = Sensor::new("Front", SensorType::Door);
        repo.add_sensor(door.clone()).unwrap();
        repo.add_sensor(door.clone()).unwrap();
        assert_eq!(repo.sensors().unwrap().len(), 1);

        door.set_active(true);
        door.set_name("Front door");
        repo.update_sensor(&door).unwrap();
        let stored = &repo.sensors().unwrap()[0];
        assert!(stored.is_active());
        assert_eq!(stored.name(), "Front door");

        repo.remove_sensor(&door).unwrap();
        assert!(repo.sensors().unwrap().is_empty());
    }

    #[test]
    fn test_update_of_unknown_sensor_is_ignored() {
        let mut repo = InMemorySecurityRepository::new();
        repo.update_sensor(&Sensor::new("Ghost", SensorType::Motion))
            .unwrap();
        assert!(repo.sensors().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_store() {
        let mut repo = InMemorySecurityRepository::new();
        repo.add_sensor(Sensor::new("Hall", SensorType::Motion))
            .unwrap();
        let mut snapshot = repo.sensors().unwrap();
        snapshot[0].set_active(true);
        snapshot.clear();
        assert_eq!(repo.sensors().unwrap().len(), 1);
        assert!(!repo.sensors().unwrap()[0].is_active());
    }

    #[test]
    fn test_state_setters_report_change() {
        let mut state = SecurityState::default();
        assert!(!state.set_alarm_status(AlarmStatus::NoAlarm));
        assert!(state.set_alarm_status(AlarmStatus::Alarm));
        assert!(state.set_arming_status(ArmingStatus::ArmedAway));
        assert!(!state.set_arming_status(ArmingStatus::ArmedAway));
    }
}
