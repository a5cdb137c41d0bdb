//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `catpoint_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from_path, AppConfig, FakeImageConfig, ImageProvider, LabelServiceConfig,
    LoggingConfig, StorageConfig, UiConfig,
};
pub use crate::error::{CliError, RepositoryError, ServiceError};
pub use crate::image::{ImageService, CAT_CONFIDENCE_THRESHOLD};
pub use crate::listener::{EventBroadcaster, SecurityEvent, StatusListener};
pub use crate::model::{AlarmStatus, ArmingStatus, Rgb, Sensor, SensorType};
pub use crate::repository::{RepositoryResult, SecurityRepository};
pub use crate::service::{SecurityService, SecurityServiceBuilder};
