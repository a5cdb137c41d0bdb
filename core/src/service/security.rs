//! Alarm arbitration engine

use super::transitions::{self, GateRejection};
use crate::error::ServiceError;
use crate::image::{ImageService, CAT_CONFIDENCE_THRESHOLD};
use crate::listener::{ListenerSet, StatusListener};
use crate::model::{AlarmStatus, ArmingStatus, Sensor};
use crate::repository::SecurityRepository;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Derives the authoritative alarm status from arming mode, sensor activity
/// and camera cat detection, and notifies listeners of every real change.
///
/// All state lives behind one lock that each public operation holds for its
/// whole duration, including store access, classification and listener
/// callbacks.
pub struct SecurityService {
    inner: Mutex<ServiceInner>,
    image_service: Arc<dyn ImageService>,
}

struct ServiceInner {
    repository: Box<dyn SecurityRepository>,
    listeners: ListenerSet,
    /// Result of the latest image evaluation. Never persisted.
    cat_detected: bool,
}

impl SecurityService {
    pub fn new(
        repository: impl SecurityRepository + 'static,
        image_service: impl ImageService + 'static,
    ) -> Self {
        Self::from_parts(Box::new(repository), Arc::new(image_service), ListenerSet::new())
    }

    pub fn builder() -> SecurityServiceBuilder {
        SecurityServiceBuilder::default()
    }

    fn from_parts(
        repository: Box<dyn SecurityRepository>,
        image_service: Arc<dyn ImageService>,
        listeners: ListenerSet,
    ) -> Self {
        Self {
            inner: Mutex::new(ServiceInner {
                repository,
                listeners,
                cat_detected: false,
            }),
            image_service,
        }
    }

    /// Switch arming mode. Arming resets every active sensor first; disarming
    /// clears the alarm but leaves sensors untouched.
    pub async fn set_arming_status(&self, status: impl Into<Option<ArmingStatus>>) {
        let Some(status) = status.into() else {
            tracing::warn!("Attempted to set null arming status. Ignoring.");
            return;
        };
        self.inner.lock().await.set_arming_status(status);
    }

    /// Public entry to the alarm-status gate.
    pub async fn set_alarm_status(&self, status: impl Into<Option<AlarmStatus>>) {
        let Some(status) = status.into() else {
            tracing::warn!("Attempted to set null alarm status. Ignoring.");
            return;
        };
        self.inner.lock().await.set_alarm_status(status);
    }

    /// Set `sensor`'s active flag, persist it and re-evaluate the alarm.
    ///
    /// The caller's copy is updated in place. Nothing happens, not even a
    /// notification, when the stored flag already has the requested value.
    pub async fn change_sensor_activation<'a>(
        &self,
        sensor: impl Into<Option<&'a mut Sensor>>,
        active: bool,
    ) {
        let Some(sensor) = sensor.into() else {
            tracing::warn!("Attempted to change activation status for null sensor. Ignoring.");
            return;
        };
        self.inner
            .lock()
            .await
            .change_sensor_activation(sensor, active);
    }

    /// Classify a camera frame and feed the verdict into the alarm.
    ///
    /// A missing image, a classifier error or a classifier panic all count as
    /// "no cat"; this never fails.
    #[tracing::instrument(name = "security.process_image", skip(self, image))]
    pub async fn process_image(&self, image: Option<&[u8]>) {
        let mut inner = self.inner.lock().await;
        let cat = self.classify(image).await;
        inner.handle_cat_detection(cat);
    }

    async fn classify(&self, image: Option<&[u8]>) -> bool {
        let Some(image) = image else {
            tracing::debug!("process_image called with null image, assuming no cat.");
            return false;
        };
        let call = self
            .image_service
            .image_contains_cat(image, CAT_CONFIDENCE_THRESHOLD);
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(cat)) => {
                tracing::debug!(
                    service = self.image_service.name(),
                    bytes = image.len(),
                    cat,
                    "Image processed"
                );
                cat
            }
            Ok(Err(e)) => {
                tracing::error!(
                    service = self.image_service.name(),
                    "Error processing image: {e:#}. Assuming no cat detected."
                );
                false
            }
            Err(_) => {
                tracing::error!(
                    service = self.image_service.name(),
                    "Image service panicked. Assuming no cat detected."
                );
                false
            }
        }
    }

    pub async fn add_sensor(&self, sensor: impl Into<Option<Sensor>>) {
        let Some(sensor) = sensor.into() else {
            tracing::warn!("Attempted to add null sensor.");
            return;
        };
        self.inner.lock().await.add_sensor(sensor);
    }

    /// Remove a sensor. Counts as a deactivation whatever its flag was.
    pub async fn remove_sensor<'a>(&self, sensor: impl Into<Option<&'a Sensor>>) {
        let Some(sensor) = sensor.into() else {
            tracing::warn!("Attempted to remove null sensor.");
            return;
        };
        self.inner.lock().await.remove_sensor(sensor);
    }

    pub async fn add_status_listener(&self, listener: Arc<dyn StatusListener>) {
        if self.inner.lock().await.listeners.add(listener) {
            tracing::debug!("Added status listener");
        }
    }

    pub async fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) {
        if self.inner.lock().await.listeners.remove(listener) {
            tracing::debug!("Removed status listener");
        }
    }

    pub async fn listener_count(&self) -> usize {
        self.inner.lock().await.listeners.len()
    }

    pub async fn alarm_status(&self) -> Option<AlarmStatus> {
        self.inner.lock().await.repository.alarm_status()
    }

    pub async fn arming_status(&self) -> Option<ArmingStatus> {
        self.inner.lock().await.repository.arming_status()
    }

    /// Sorted snapshot of the tracked sensors; an unavailable set reads as empty.
    pub async fn sensors(&self) -> Vec<Sensor> {
        let mut sensors = self
            .inner
            .lock()
            .await
            .repository
            .sensors()
            .unwrap_or_default();
        sensors.sort();
        sensors
    }

    /// Look a sensor up by id, or by exact name (first in display order).
    pub async fn find_sensor(&self, key: &str) -> Option<Sensor> {
        let sensors = self.sensors().await;
        let key = key.trim();
        sensors
            .iter()
            .find(|s| s.sensor_id().to_string() == key)
            .or_else(|| sensors.iter().find(|s| s.name() == key))
            .cloned()
    }

    pub async fn is_cat_detected(&self) -> bool {
        self.inner.lock().await.cat_detected
    }
}

impl ServiceInner {
    fn set_arming_status(&mut self, status: ArmingStatus) {
        if status == ArmingStatus::Disarmed {
            self.set_alarm_status(AlarmStatus::NoAlarm);
            self.persist_arming_status(status);
            tracing::info!("System status set to DISARMED");
            return;
        }

        tracing::info!(status = %status, "Arming system. Resetting sensors.");
        // Deactivate under the previous arming status; the deactivation
        // handler reads it.
        let snapshot = self.repository.sensors().unwrap_or_default();
        for mut sensor in snapshot.into_iter().filter(Sensor::is_active) {
            self.change_sensor_activation(&mut sensor, false);
            tracing::debug!(sensor = sensor.name(), "Deactivated sensor during arming");
        }

        self.persist_arming_status(status);
        tracing::info!(status = %status, "System status set");

        if status == ArmingStatus::ArmedHome && self.cat_detected {
            tracing::info!("Cat detected flag is true while arming home, setting alarm.");
            self.set_alarm_status(AlarmStatus::Alarm);
        }
    }

    fn persist_arming_status(&mut self, status: ArmingStatus) {
        if let Err(e) = self.repository.set_arming_status(status) {
            tracing::error!(status = %status, "Failed to persist arming status: {e}");
        }
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) {
        let arming = self.repository.arming_status();
        if arming.is_none() {
            tracing::error!("Arming status unavailable, cannot reliably set alarm status.");
        }
        match transitions::admit(arming, status) {
            Ok(()) => {}
            Err(GateRejection::ArmingUnknown) => {
                tracing::warn!(
                    status = %status,
                    "Preventing raised alarm because arming status is unavailable."
                );
                return;
            }
            Err(GateRejection::Disarmed) => {
                tracing::debug!(
                    status = %status,
                    "Ignoring status change while system is DISARMED."
                );
                return;
            }
        }

        let current = self.repository.alarm_status();
        if current == Some(status) {
            tracing::trace!(status = %status, "Alarm status unchanged");
            return;
        }

        tracing::info!(from = ?current, to = %status, "Changing alarm status");
        if let Err(e) = self.repository.set_alarm_status(status) {
            tracing::error!(status = %status, "Failed to persist alarm status: {e}");
        }
        self.listeners.alarm_status_changed(status);
    }

    fn change_sensor_activation(&mut self, sensor: &mut Sensor, active: bool) {
        // The stored flag is authoritative; the caller may hold a stale copy.
        let current = self.stored_activation(sensor).unwrap_or(sensor.is_active());
        if current == active {
            sensor.set_active(active);
            tracing::trace!(
                sensor = sensor.name(),
                active,
                "Sensor already in requested state"
            );
            return;
        }

        tracing::info!(
            sensor = sensor.name(),
            sensor_id = %sensor.sensor_id(),
            from = current,
            to = active,
            "Changing sensor activation status"
        );
        sensor.set_active(active);
        if let Err(e) = self.repository.update_sensor(sensor) {
            tracing::error!(sensor_id = %sensor.sensor_id(), "Failed to persist sensor: {e}");
        }

        if active {
            self.handle_sensor_activated();
        } else {
            self.handle_sensor_deactivated();
        }
        self.listeners.sensor_status_changed();
    }

    /// Active flag of the tracked sensor with `sensor`'s id, if the store has it.
    fn stored_activation(&self, sensor: &Sensor) -> Option<bool> {
        self.repository
            .sensors()?
            .iter()
            .find(|s| s.sensor_id() == sensor.sensor_id())
            .map(Sensor::is_active)
    }

    fn handle_sensor_activated(&mut self) {
        let arming = match self.repository.arming_status() {
            Some(ArmingStatus::Disarmed) => {
                tracing::debug!("Sensor activated while DISARMED. No status change.");
                return;
            }
            Some(arming) => arming,
            None => {
                tracing::error!("Cannot handle sensor activation: arming status is null.");
                return;
            }
        };
        let Some(current) = self.repository.alarm_status() else {
            tracing::error!("Cannot handle sensor activation: current alarm status is null.");
            return;
        };

        match transitions::on_sensor_activated(arming, current) {
            Some(next) => self.set_alarm_status(next),
            None => tracing::debug!(status = %current, "Sensor activated. No status change."),
        }
    }

    fn handle_sensor_deactivated(&mut self) {
        let Some(current) = self.repository.alarm_status() else {
            tracing::error!("Cannot handle sensor deactivation: current alarm status is null.");
            return;
        };
        if current != AlarmStatus::PendingAlarm {
            tracing::debug!(status = %current, "Sensor deactivated. No status change.");
            return;
        }

        match transitions::on_sensor_deactivated(current, self.all_sensors_inactive()) {
            Some(next) => self.set_alarm_status(next),
            None => tracing::debug!("Sensor deactivated while pending, others still active."),
        }
    }

    /// Fail-open: an unavailable sensor set counts as all inactive.
    fn all_sensors_inactive(&self) -> bool {
        match self.repository.sensors() {
            Some(sensors) => !sensors.iter().any(Sensor::is_active),
            None => {
                tracing::warn!("Sensor set unavailable. Assuming sensors are inactive.");
                true
            }
        }
    }

    fn handle_cat_detection(&mut self, cat: bool) {
        self.cat_detected = cat;
        tracing::debug!(cat, "Cat detection status updated");

        let arming = self.repository.arming_status();
        let all_inactive = !cat && self.all_sensors_inactive();
        match transitions::on_cat_detection(cat, arming, all_inactive) {
            Some(next) => self.set_alarm_status(next),
            None if !cat => {
                tracing::debug!("No cat detected, but sensors are active. Alarm unchanged.")
            }
            None => {}
        }

        self.listeners.cat_detected(cat);
    }

    fn add_sensor(&mut self, sensor: Sensor) {
        tracing::info!(
            sensor = sensor.name(),
            sensor_id = %sensor.sensor_id(),
            "Adding sensor"
        );
        if let Err(e) = self.repository.add_sensor(sensor) {
            tracing::error!("Failed to persist added sensor: {e}");
        }
        self.listeners.sensor_status_changed();
    }

    fn remove_sensor(&mut self, sensor: &Sensor) {
        tracing::info!(
            sensor = sensor.name(),
            sensor_id = %sensor.sensor_id(),
            "Removing sensor"
        );
        if let Err(e) = self.repository.remove_sensor(sensor) {
            tracing::error!("Failed to persist sensor removal: {e}");
        }
        self.handle_sensor_deactivated();
        self.listeners.sensor_status_changed();
    }
}

/// Fallible construction path: both collaborators are checked at `build`.
#[derive(Default)]
pub struct SecurityServiceBuilder {
    repository: Option<Box<dyn SecurityRepository>>,
    image_service: Option<Arc<dyn ImageService>>,
    listeners: ListenerSet,
}

impl SecurityServiceBuilder {
    pub fn repository(mut self, repository: impl SecurityRepository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    pub fn image_service(mut self, image_service: impl ImageService + 'static) -> Self {
        self.image_service = Some(Arc::new(image_service));
        self
    }

    pub fn listener(mut self, listener: Arc<dyn StatusListener>) -> Self {
        self.listeners.add(listener);
        self
    }

    pub fn build(self) -> Result<SecurityService, ServiceError> {
        let repository = self.repository.ok_or(ServiceError::MissingRepository)?;
        let image_service = self.image_service.ok_or(ServiceError::MissingImageService)?;
        Ok(SecurityService::from_parts(
            repository,
            image_service,
            self.listeners,
        ))
    }
}
