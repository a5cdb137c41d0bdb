use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::{AppConfig, ImageProvider, LabelServiceConfig};

/// Get the default catpoint data directory: ~/.catpoint
pub fn get_catpoint_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".catpoint"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.catpoint/config.toml (highest)
    let data_dir = get_catpoint_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let cfg = if user_config.exists() {
        read_config(&user_config)?
    } else if local_config.exists() {
        read_config(local_config)?
    } else {
        AppConfig::default()
    };

    finish(cfg, &data_dir)
}

/// Load an explicit config file (`--config`); the file must exist.
pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<AppConfig> {
    let cfg = read_config(path.as_ref())?;
    finish(cfg, &get_catpoint_data_dir()?)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    toml::from_str::<AppConfig>(&s).with_context(|| format!("Invalid config file {:?}", path))
}

fn finish(mut cfg: AppConfig, data_dir: &Path) -> anyhow::Result<AppConfig> {
    resolve_paths(&mut cfg, data_dir);
    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

/// Fill unset storage/log locations under `data_dir`.
pub fn resolve_paths(cfg: &mut AppConfig, data_dir: &Path) {
    if cfg.storage.path.trim().is_empty() {
        cfg.storage.path = data_dir.join("state.json").to_string_lossy().to_string();
    }

    if cfg
        .logging
        .directory
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        cfg.logging.directory = Some(data_dir.join("logs").to_string_lossy().to_string());
    }
}

pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("CATPOINT_STATE_FILE") {
        cfg.storage.path = v;
    }

    if let Some(url) = non_empty("CATPOINT_IMAGE_URL") {
        match cfg.image.provider {
            ImageProvider::LabelService(ref mut svc) => svc.base_url = url,
            ImageProvider::Fake(_) => {
                cfg.image.provider = ImageProvider::LabelService(LabelServiceConfig {
                    base_url: url,
                    ..LabelServiceConfig::default()
                });
            }
        }
    }

    if let Some(key) = non_empty("CATPOINT_IMAGE_API_KEY") {
        if let ImageProvider::LabelService(ref mut svc) = cfg.image.provider {
            svc.api_key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_paths_fills_defaults() {
        let mut cfg = AppConfig::default();
        resolve_paths(&mut cfg, Path::new("/data/catpoint"));
        assert_eq!(
            PathBuf::from(&cfg.storage.path),
            Path::new("/data/catpoint").join("state.json")
        );
        assert_eq!(
            cfg.logging.directory.map(PathBuf::from),
            Some(Path::new("/data/catpoint").join("logs"))
        );
    }

    #[test]
    fn test_resolve_paths_keeps_explicit_values() {
        let mut cfg = AppConfig::default();
        cfg.storage.path = "/tmp/custom.json".to_string();
        cfg.logging.directory = Some("/tmp/logs".to_string());
        resolve_paths(&mut cfg, Path::new("/data/catpoint"));
        assert_eq!(cfg.storage.path, "/tmp/custom.json");
        assert_eq!(cfg.logging.directory.as_deref(), Some("/tmp/logs"));
    }

    #[test]
    fn test_image_url_override_switches_provider() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(
            &mut cfg,
            env(&[
                ("CATPOINT_IMAGE_URL", "https://labels.local"),
                ("CATPOINT_IMAGE_API_KEY", "k"),
                ("CATPOINT_STATE_FILE", "  "),
            ]),
        );
        match cfg.image.provider {
            ImageProvider::LabelService(svc) => {
                assert_eq!(svc.base_url, "https://labels.local");
                assert_eq!(svc.api_key, "k");
            }
            other => panic!("unexpected provider: {other:?}"),
        }
        assert!(cfg.storage.path.is_empty());
    }

    #[test]
    fn test_load_from_path_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\npath = \"/var/lib/catpoint/state.json\"\n[ui]\nmax_sensors = 2\n",
        )
        .unwrap();
        let cfg = read_config(&path).unwrap();
        assert_eq!(cfg.storage.path, "/var/lib/catpoint/state.json");
        assert_eq!(cfg.ui.max_sensors, 2);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nmax_sensors = \"many\"\n").unwrap();
        assert!(read_config(&path).is_err());
    }
}
