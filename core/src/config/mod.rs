mod load;
mod types;

pub use load::{
    apply_env_overrides, get_catpoint_data_dir, load_default, load_from_path, resolve_paths,
};
pub use types::{
    AppConfig, FakeImageConfig, ImageConfig, ImageProvider, LabelServiceConfig, LoggingConfig,
    StorageConfig, UiConfig,
};
