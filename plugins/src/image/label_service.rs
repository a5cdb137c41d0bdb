use super::http_client::{DetectedLabel, LabelClient};
use async_trait::async_trait;
use catpoint_core::api::ImageService;

const CAT_LABEL: &str = "cat";

/// Remote classifier backed by a label detection service.
pub struct LabelDetectionImageService {
    client: LabelClient,
}

impl LabelDetectionImageService {
    pub fn new(base_url: String, api_key: String, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = LabelClient::new(base_url, api_key, timeout_ms)?;
        Ok(Self { client })
    }
}

/// True when some label reads "cat" (any case) at or above the threshold.
pub fn labels_contain_cat(labels: &[DetectedLabel], confidence_threshold: f32) -> bool {
    labels.iter().any(|l| {
        l.name.trim().eq_ignore_ascii_case(CAT_LABEL) && l.confidence >= confidence_threshold
    })
}

#[async_trait]
impl ImageService for LabelDetectionImageService {
    fn name(&self) -> &str {
        "label_service"
    }

    async fn image_contains_cat(
        &self,
        image: &[u8],
        confidence_threshold: f32,
    ) -> anyhow::Result<bool> {
        let labels = self
            .client
            .detect_labels(image, confidence_threshold)
            .await?;
        for label in &labels {
            tracing::info!(
                label = %label.name,
                confidence = label.confidence,
                "Detected label"
            );
        }
        Ok(labels_contain_cat(&labels, confidence_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn label(name: &str, confidence: f32) -> DetectedLabel {
        DetectedLabel {
            name: name.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_cat_label_matching() {
        assert!(labels_contain_cat(&[label("CAT", 50.0)], 50.0));
        assert!(labels_contain_cat(&[label("Dog", 99.0), label("cat", 80.0)], 50.0));
        assert!(!labels_contain_cat(&[label("cat", 49.9)], 50.0));
        assert!(!labels_contain_cat(&[label("Catamaran", 99.0)], 50.0));
        assert!(!labels_contain_cat(&[], 50.0));
    }

    #[tokio::test]
    async fn test_service_reports_cat_from_labels() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/labels/detect")
            .with_status(200)
            .with_body(r#"{"labels":[{"name":"Animal","confidence":99.0},{"name":"Cat","confidence":92.1}]}"#)
            .create_async()
            .await;

        let svc = LabelDetectionImageService::new(server.url(), String::new(), 1_000).unwrap();
        assert!(svc.image_contains_cat(b"jpeg", 50.0).await.unwrap());
    }

    #[tokio::test]
    async fn test_service_without_cat_label() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/labels/detect")
            .with_status(200)
            .with_body(r#"{"labels":[]}"#)
            .create_async()
            .await;

        let svc = LabelDetectionImageService::new(server.url(), String::new(), 1_000).unwrap();
        assert!(!svc.image_contains_cat(b"jpeg", 50.0).await.unwrap());
    }

    #[tokio::test]
    async fn test_service_propagates_http_failure() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/labels/detect")
            .with_status(500)
            .create_async()
            .await;

        let svc = LabelDetectionImageService::new(server.url(), String::new(), 1_000).unwrap();
        assert!(svc.image_contains_cat(b"jpeg", 50.0).await.is_err());
    }
}
