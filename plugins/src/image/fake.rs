use async_trait::async_trait;
use catpoint_core::api::ImageService;

/// Classifier stand-in that gives the same answer for every image.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeImageService {
    cat_detected: bool,
}

impl FakeImageService {
    pub fn new(cat_detected: bool) -> Self {
        Self { cat_detected }
    }
}

#[async_trait]
impl ImageService for FakeImageService {
    fn name(&self) -> &str {
        "fake"
    }

    async fn image_contains_cat(
        &self,
        image: &[u8],
        confidence_threshold: f32,
    ) -> anyhow::Result<bool> {
        tracing::debug!(
            bytes = image.len(),
            threshold = confidence_threshold,
            cat = self.cat_detected,
            "Fake image service verdict"
        );
        Ok(self.cat_detected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_never_sees_a_cat() {
        let svc = FakeImageService::default();
        assert!(!svc.image_contains_cat(b"jpeg", 50.0).await.unwrap());
        assert!(FakeImageService::new(true)
            .image_contains_cat(&[], 50.0)
            .await
            .unwrap());
    }
}
