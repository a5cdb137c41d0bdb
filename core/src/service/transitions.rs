//! Alarm transition table
//!
//! Pure decisions only; the engine owns reads, writes and notification.

use crate::model::{AlarmStatus, ArmingStatus};

/// Why the alarm-status gate refused a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// A raised level was requested while the arming status is unavailable.
    ArmingUnknown,
    /// A raised level was requested while disarmed.
    Disarmed,
}

/// Check whether `target` may be written given the current arming status.
pub fn admit(arming: Option<ArmingStatus>, target: AlarmStatus) -> Result<(), GateRejection> {
    if !target.is_raised() {
        return Ok(());
    }
    match arming {
        None => Err(GateRejection::ArmingUnknown),
        Some(arming) if !arming.is_armed() => Err(GateRejection::Disarmed),
        Some(_) => Ok(()),
    }
}

/// Next alarm level after a sensor turns on, or `None` to leave it alone.
pub fn on_sensor_activated(arming: ArmingStatus, current: AlarmStatus) -> Option<AlarmStatus> {
    if !arming.is_armed() {
        return None;
    }
    match current {
        AlarmStatus::NoAlarm => Some(AlarmStatus::PendingAlarm),
        AlarmStatus::PendingAlarm => Some(AlarmStatus::Alarm),
        AlarmStatus::Alarm => None,
    }
}

/// Next alarm level after a sensor turns off (or is removed).
///
/// Only a pending alarm is ever cleared, and only once nothing is active.
pub fn on_sensor_deactivated(current: AlarmStatus, all_inactive: bool) -> Option<AlarmStatus> {
    match current {
        AlarmStatus::PendingAlarm if all_inactive => Some(AlarmStatus::NoAlarm),
        _ => None,
    }
}

/// Next alarm level after an image evaluation.
pub fn on_cat_detection(
    cat: bool,
    arming: Option<ArmingStatus>,
    all_inactive: bool,
) -> Option<AlarmStatus> {
    if cat {
        (arming == Some(ArmingStatus::ArmedHome)).then_some(AlarmStatus::Alarm)
    } else {
        all_inactive.then_some(AlarmStatus::NoAlarm)
    }
}
