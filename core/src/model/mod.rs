//! Value types shared by the engine, its collaborators and front ends.

pub mod sensor;
pub mod status;

pub use sensor::{Sensor, SensorType};
pub use status::{AlarmStatus, ArmingStatus, Rgb};
