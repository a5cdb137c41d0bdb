//! JSON-file backed state store

use super::memory::SecurityState;
use catpoint_core::api::{
    AlarmStatus, ArmingStatus, RepositoryError, RepositoryResult, SecurityRepository, Sensor,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Keeps the full state in memory and rewrites the whole document after every
/// change. A write goes to a sibling temp file that is then renamed over the
/// target, so readers never observe a half-written document.
#[derive(Debug)]
pub struct FileSecurityRepository {
    path: PathBuf,
    state: SecurityState,
}

impl FileSecurityRepository {
    /// Open the store at `path`. A missing file yields defaults; an
    /// unreadable or corrupt one is logged and also yields defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load_state(&path);
        tracing::debug!(
            path = %path.display(),
            sensors = state.sensors.len(),
            alarm = %state.alarm_status,
            arming = %state.arming_status,
            "Loaded security state"
        );
        Self { path, state }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> RepositoryResult {
        let json = serde_json::to_string_pretty(&self.state)?;
        let io_err = |source: io::Error| RepositoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = temp_path(&self.path);
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        tracing::trace!(path = %self.path.display(), "Persisted security state");
        Ok(())
    }

    fn save_if(&self, changed: bool) -> RepositoryResult {
        if changed {
            self.save()
        } else {
            Ok(())
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "state.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn load_state(path: &Path) -> SecurityState {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return SecurityState::default(),
        Err(e) => {
            tracing::error!(path = %path.display(), "Failed to read state file: {e}");
            return SecurityState::default();
        }
    };

    if raw.trim().is_empty() {
        return SecurityState::default();
    }

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::error!(
            path = %path.display(),
            "Corrupt state file, falling back to defaults: {e}"
        );
        SecurityState::default()
    })
}

impl SecurityRepository for FileSecurityRepository {
    fn add_sensor(&mut self, sensor: Sensor) -> RepositoryResult {
        let changed = self.state.add_sensor(sensor);
        self.save_if(changed)
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        let changed = self.state.remove_sensor(sensor);
        self.save_if(changed)
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> RepositoryResult {
        let changed = self.state.update_sensor(sensor);
        self.save_if(changed)
    }

    fn sensors(&self) -> Option<Vec<Sensor>> {
        Some(self.state.sensors.clone())
    }

    fn alarm_status(&self) -> Option<AlarmStatus> {
        Some(self.state.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> RepositoryResult {
        let changed = self.state.set_alarm_status(status);
        self.save_if(changed)
    }

    fn arming_status(&self) -> Option<ArmingStatus> {
        Some(self.state.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> RepositoryResult {
        let changed = self.state.set_arming_status(status);
        self.save_if(changed)
    }
}
