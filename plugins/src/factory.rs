use anyhow::Result;
use std::sync::Arc;

use catpoint_core::api::{AppConfig, ImageProvider, ImageService, SecurityRepository};

use crate::image::{FakeImageService, LabelDetectionImageService};
use crate::repository::{FileSecurityRepository, InMemorySecurityRepository};

pub fn build_repository(cfg: &AppConfig, ephemeral: bool) -> Box<dyn SecurityRepository> {
    if ephemeral {
        tracing::debug!("Using in-memory security repository");
        return Box::new(InMemorySecurityRepository::new());
    }
    let repo = FileSecurityRepository::open(&cfg.storage.path);
    tracing::debug!(path = %repo.path().display(), "Using file security repository");
    Box::new(repo)
}

pub fn build_image_service(cfg: &AppConfig) -> Result<Arc<dyn ImageService>> {
    match &cfg.image.provider {
        ImageProvider::Fake(fake) => Ok(Arc::new(FakeImageService::new(fake.cat_detected))),
        ImageProvider::LabelService(svc_cfg) => Ok(Arc::new(LabelDetectionImageService::new(
            svc_cfg.base_url.clone(),
            svc_cfg.api_key.clone(),
            svc_cfg.timeout_ms,
        )?)),
    }
}
