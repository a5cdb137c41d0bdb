//! Listener that republishes engine notifications on a broadcast channel.

use super::StatusListener;
use crate::model::AlarmStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// Engine notification, timestamped when it was observed.
#[derive(Debug, Clone, Serialize)]
pub enum SecurityEvent {
    AlarmStatusChanged {
        status: AlarmStatus,
        timestamp: DateTime<Utc>,
    },
    CatDetected {
        detected: bool,
        timestamp: DateTime<Utc>,
    },
    SensorsChanged { timestamp: DateTime<Utc> },
}

impl SecurityEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AlarmStatusChanged { timestamp, .. } => *timestamp,
            Self::CatDetected { timestamp, .. } => *timestamp,
            Self::SensorsChanged { timestamp } => *timestamp,
        }
    }
}

/// Moves notifications off the engine lock: register this as a listener and
/// consume events from [`EventBroadcaster::subscribe`] on your own task.
#[derive(Clone)]
pub struct EventBroadcaster {
    event_tx: broadcast::Sender<SecurityEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));
        Self { event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SecurityEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: SecurityEvent) {
        // No receivers is fine.
        let _ = self.event_tx.send(event);
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusListener for EventBroadcaster {
    fn on_alarm_status_changed(&self, status: AlarmStatus) {
        self.emit(SecurityEvent::AlarmStatusChanged {
            status,
            timestamp: Utc::now(),
        });
    }

    fn on_cat_detected(&self, detected: bool) {
        self.emit(SecurityEvent::CatDetected {
            detected,
            timestamp: Utc::now(),
        });
    }

    fn on_sensor_status_changed(&self) {
        self.emit(SecurityEvent::SensorsChanged {
            timestamp: Utc::now(),
        });
    }
}
