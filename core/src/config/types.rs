use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory`.
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "catpoint_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Directory for log files. Empty or unset resolves to `<data dir>/logs`.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State file path. Empty means `<data dir>/state.json`.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub provider: ImageProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageProvider {
    Fake(FakeImageConfig),
    LabelService(LabelServiceConfig),
}

impl Default for ImageProvider {
    fn default() -> Self {
        ImageProvider::Fake(FakeImageConfig::default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FakeImageConfig {
    /// Verdict the fake classifier returns for every image.
    #[serde(default)]
    pub cat_detected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelServiceConfig {
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_label_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_label_timeout_ms() -> u64 {
    10_000
}

impl Default for LabelServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8600".to_string(),
            api_key: String::new(),
            timeout_ms: default_label_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Sensors the front end lets you register before asking for premium.
    #[serde(default = "default_max_sensors")]
    pub max_sensors: usize,
}

fn default_max_sensors() -> usize {
    4
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_sensors: default_max_sensors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert!(cfg.logging.enabled);
        assert_eq!(cfg.logging.level, "warn");
        assert!(cfg.storage.path.is_empty());
        assert_eq!(cfg.ui.max_sensors, 4);
        assert!(matches!(
            cfg.image.provider,
            ImageProvider::Fake(FakeImageConfig {
                cat_detected: false
            })
        ));
    }

    #[test]
    fn test_label_service_provider_parses() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [image.provider]
            kind = "label_service"
            base_url = "https://vision.example.com"
            api_key = "secret"

            [ui]
            max_sensors = 8
            "#,
        )
        .unwrap();
        match cfg.image.provider {
            ImageProvider::LabelService(svc) => {
                assert_eq!(svc.base_url, "https://vision.example.com");
                assert_eq!(svc.api_key, "secret");
                assert_eq!(svc.timeout_ms, 10_000);
            }
            other => panic!("unexpected provider: {other:?}"),
        }
        assert_eq!(cfg.ui.max_sensors, 8);
    }
}
