//! Observer contract and the listener set the engine fans out to.

pub mod broadcast;

use crate::model::AlarmStatus;
use std::sync::Arc;

pub use broadcast::{EventBroadcaster, SecurityEvent};

/// Receives engine notifications. Implement only the channels you need.
///
/// Callbacks run synchronously while the engine lock is held; hand work off
/// to your own queue instead of blocking here.
pub trait StatusListener: Send + Sync {
    fn on_alarm_status_changed(&self, _status: AlarmStatus) {}

    fn on_cat_detected(&self, _detected: bool) {}

    fn on_sensor_status_changed(&self) {}
}

/// Ordered listener handles, unique by `Arc` identity.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Arc<dyn StatusListener>>,
}

fn same_listener(a: &Arc<dyn StatusListener>, b: &Arc<dyn StatusListener>) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the listener was already registered.
    pub fn add(&mut self, listener: Arc<dyn StatusListener>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Returns false if the listener was not registered.
    pub fn remove(&mut self, listener: &Arc<dyn StatusListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        self.listeners.len() != before
    }

    pub fn contains(&self, listener: &Arc<dyn StatusListener>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn alarm_status_changed(&self, status: AlarmStatus) {
        for l in &self.listeners {
            l.on_alarm_status_changed(status);
        }
    }

    pub fn cat_detected(&self, detected: bool) {
        for l in &self.listeners {
            l.on_cat_detected(detected);
        }
    }

    pub fn sensor_status_changed(&self) {
        for l in &self.listeners {
            l.on_sensor_status_changed();
        }
    }
}
