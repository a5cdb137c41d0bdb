//! Arming and alarm status types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display colour attached to a status (cosmetic only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Operator-selected system mode.
///
/// Persisted by variant name, never by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmingStatus {
    Disarmed,
    ArmedHome,
    ArmedAway,
}

impl ArmingStatus {
    pub const ALL: [ArmingStatus; 3] = [Self::Disarmed, Self::ArmedHome, Self::ArmedAway];

    pub fn description(self) -> &'static str {
        match self {
            Self::Disarmed => "Disarmed",
            Self::ArmedHome => "Armed - At Home",
            Self::ArmedAway => "Armed - Away",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Disarmed => Rgb::new(120, 200, 30),
            Self::ArmedHome => Rgb::new(190, 180, 50),
            Self::ArmedAway => Rgb::new(170, 30, 150),
        }
    }

    pub fn is_armed(self) -> bool {
        !matches!(self, Self::Disarmed)
    }

    /// Symbolic name used in persisted data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disarmed => "DISARMED",
            Self::ArmedHome => "ARMED_HOME",
            Self::ArmedAway => "ARMED_AWAY",
        }
    }
}

impl fmt::Display for ArmingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alarm escalation level.
///
/// The derived ordering (`NoAlarm < PendingAlarm < Alarm`) is for display;
/// transitions are decided by the engine's rules, not by comparing levels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmStatus {
    NoAlarm,
    PendingAlarm,
    Alarm,
}

impl AlarmStatus {
    pub const ALL: [AlarmStatus; 3] = [Self::NoAlarm, Self::PendingAlarm, Self::Alarm];

    pub fn description(self) -> &'static str {
        match self {
            Self::NoAlarm => "Cool and Good",
            Self::PendingAlarm => "I'm in Danger...",
            Self::Alarm => "Awooga!",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::NoAlarm => Rgb::new(120, 200, 30),
            Self::PendingAlarm => Rgb::new(200, 150, 20),
            Self::Alarm => Rgb::new(250, 80, 50),
        }
    }

    /// True for the levels a disarmed system must never hold.
    pub fn is_raised(self) -> bool {
        matches!(self, Self::PendingAlarm | Self::Alarm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAlarm => "NO_ALARM",
            Self::PendingAlarm => "PENDING_ALARM",
            Self::Alarm => "ALARM",
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
