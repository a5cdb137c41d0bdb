#![allow(dead_code)]

use async_trait::async_trait;
use catpoint_core::api::{
    AlarmStatus, ArmingStatus, ImageService, RepositoryResult, SecurityRepository,
    SecurityService, Sensor, StatusListener,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("catpoint_core=trace")
        .try_init();
}

/// One persisted mutation, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    AddSensor(Uuid),
    RemoveSensor(Uuid),
    UpdateSensor(Uuid, bool),
    Alarm(AlarmStatus),
    Arming(ArmingStatus),
}

#[derive(Debug, Default)]
pub struct RepoState {
    pub sensors: Vec<Sensor>,
    pub alarm: Option<AlarmStatus>,
    pub arming: Option<ArmingStatus>,
    pub sensors_unavailable: bool,
    pub writes: Vec<Write>,
}

/// Store double shared between the engine and the test body.
#[derive(Clone, Default)]
pub struct SharedRepository {
    state: Arc<Mutex<RepoState>>,
}

impl SharedRepository {
    pub fn new(arming: ArmingStatus, alarm: AlarmStatus) -> Self {
        let repo = Self::default();
        {
            let mut s = repo.state.lock().unwrap();
            s.arming = Some(arming);
            s.alarm = Some(alarm);
        }
        repo
    }

    pub fn with_sensor(self, sensor: &Sensor) -> Self {
        self.state.lock().unwrap().sensors.push(sensor.clone());
        self
    }

    pub fn set_arming(&self, arming: Option<ArmingStatus>) {
        self.state.lock().unwrap().arming = arming;
    }

    pub fn set_alarm(&self, alarm: Option<AlarmStatus>) {
        self.state.lock().unwrap().alarm = alarm;
    }

    pub fn set_sensors_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().sensors_unavailable = unavailable;
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.lock().unwrap().writes.clear();
    }

    pub fn alarm(&self) -> Option<AlarmStatus> {
        self.state.lock().unwrap().alarm
    }

    pub fn arming(&self) -> Option<ArmingStatus> {
        self.state.lock().unwrap().arming
    }

    pub fn stored(&self, id: Uuid) -> Option<Sensor> {
        self.state
            .lock()
            .unwrap()
            .sensors
            .iter()
            .find(|s| s.sensor_id() == id)
            .cloned()
    }
}

impl SecurityRepository for SharedRepository {
    fn add_sensor(&mut self, sensor: Sensor) -> RepositoryResult {
        let mut s = self.state.lock().unwrap();
        s.writes.push(Write::AddSensor(sensor.sensor_id()));
        if !s.sensors.contains(&sensor) {
            s.sensors.push(sensor);
        }
        Ok(())
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        let mut s = self.state.lock().unwrap();
        s.writes.push(Write::RemoveSensor(sensor.sensor_id()));
        s.sensors.retain(|x| x != sensor);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        let mut s = self.state.lock().unwrap();
        s.writes
            .push(Write::UpdateSensor(sensor.sensor_id(), sensor.is_active()));
        if let Some(slot) = s.sensors.iter_mut().find(|x| x.sensor_id() == sensor.sensor_id()) {
            *slot = sensor.clone();
        }
        Ok(())
    }

    fn sensors(&self) -> Option<Vec<Sensor>> {
        let s = self.state.lock().unwrap();
        (!s.sensors_unavailable).then(|| s.sensors.clone())
    }

    fn alarm_status(&self) -> Option<AlarmStatus> {
        self.state.lock().unwrap().alarm
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> RepositoryResult {
        let mut s = self.state.lock().unwrap();
        s.writes.push(Write::Alarm(status));
        s.alarm = Some(status);
        Ok(())
    }

    fn arming_status(&self) -> Option<ArmingStatus> {
        self.state.lock().unwrap().arming
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> RepositoryResult {
        let mut s = self.state.lock().unwrap();
        s.writes.push(Write::Arming(status));
        s.arming = Some(status);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Verdict {
    Cat(bool),
    Fail,
    Panic,
}

/// Classifier double returning a fixed verdict and recording thresholds.
pub struct ScriptedImageService {
    verdict: Mutex<Verdict>,
    thresholds: Mutex<Vec<f32>>,
}

impl ScriptedImageService {
    pub fn new(verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            verdict: Mutex::new(verdict),
            thresholds: Mutex::new(Vec::new()),
        })
    }

    pub fn set_verdict(&self, verdict: Verdict) {
        *self.verdict.lock().unwrap() = verdict;
    }

    pub fn thresholds(&self) -> Vec<f32> {
        self.thresholds.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageService for ScriptedImageService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn image_contains_cat(&self, _image: &[u8], threshold: f32) -> anyhow::Result<bool> {
        self.thresholds.lock().unwrap().push(threshold);
        let verdict = *self.verdict.lock().unwrap();
        match verdict {
            Verdict::Cat(cat) => Ok(cat),
            Verdict::Fail => Err(anyhow::anyhow!("label service unavailable")),
            Verdict::Panic => panic!("classifier blew up"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    Alarm(AlarmStatus),
    Cat(bool),
    Sensors,
}

#[derive(Default)]
pub struct RecordingListener {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn alarms(&self) -> Vec<AlarmStatus> {
        self.seen()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Alarm(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

impl StatusListener for RecordingListener {
    fn on_alarm_status_changed(&self, status: AlarmStatus) {
        self.seen.lock().unwrap().push(Notification::Alarm(status));
    }

    fn on_cat_detected(&self, detected: bool) {
        self.seen.lock().unwrap().push(Notification::Cat(detected));
    }

    fn on_sensor_status_changed(&self) {
        self.seen.lock().unwrap().push(Notification::Sensors);
    }
}

pub struct Harness {
    pub service: SecurityService,
    pub repo: SharedRepository,
    pub images: Arc<ScriptedImageService>,
    pub listener: Arc<RecordingListener>,
}

pub async fn harness(repo: SharedRepository, verdict: Verdict) -> Harness {
    init_tracing();
    let images = ScriptedImageService::new(verdict);
    let service = SecurityService::new(repo.clone(), images.clone());
    let listener = RecordingListener::new();
    service.add_status_listener(listener.clone()).await;
    Harness {
        service,
        repo,
        images,
        listener,
    }
}
