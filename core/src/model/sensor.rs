//! Sensor value type

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

impl SensorType {
    pub const ALL: [SensorType; 3] = [Self::Door, Self::Window, Self::Motion];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Door => "DOOR",
            Self::Window => "WINDOW",
            Self::Motion => "MOTION",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DOOR" => Ok(Self::Door),
            "WINDOW" => Ok(Self::Window),
            "MOTION" => Ok(Self::Motion),
            other => Err(format!("unknown sensor type: {other}")),
        }
    }
}

/// A named, typed binary input (door/window/motion detector).
///
/// Equality and hashing use only `sensor_id`; ordering is by name, then id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    sensor_id: Uuid,
    name: String,
    sensor_type: SensorType,
    #[serde(default)]
    active: bool,
}

impl Sensor {
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            sensor_id: Uuid::new_v4(),
            name: name.into(),
            sensor_type,
            active: false,
        }
    }

    pub fn sensor_id(&self) -> Uuid {
        self.sensor_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.sensor_id == other.sensor_id
    }
}

impl Eq for Sensor {}

impl Hash for Sensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sensor_id.hash(state);
    }
}

impl Ord for Sensor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.sensor_id.cmp(&other.sensor_id))
    }
}

impl PartialOrd for Sensor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}): {}",
            self.name,
            self.sensor_type,
            if self.active { "Active" } else { "Inactive" }
        )
    }
}
