//! Image classifier contract consumed by the alarm engine.

use async_trait::async_trait;
use std::sync::Arc;

/// Minimum label confidence, in percent, the engine asks for.
pub const CAT_CONFIDENCE_THRESHOLD: f32 = 50.0;

#[async_trait]
pub trait ImageService: Send + Sync {
    fn name(&self) -> &str;

    /// Decide whether `image` contains a cat with at least
    /// `confidence_threshold` percent confidence.
    async fn image_contains_cat(
        &self,
        image: &[u8],
        confidence_threshold: f32,
    ) -> anyhow::Result<bool>;
}

#[async_trait]
impl<T: ImageService + ?Sized> ImageService for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn image_contains_cat(
        &self,
        image: &[u8],
        confidence_threshold: f32,
    ) -> anyhow::Result<bool> {
        (**self).image_contains_cat(image, confidence_threshold).await
    }
}
