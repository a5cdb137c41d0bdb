use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};

const BODY_PREVIEW_LIMIT: usize = 512;
pub const MAX_LABELS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageHttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl ImageHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ImageHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct ImageHttpError {
    kind: ImageHttpErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl ImageHttpError {
    pub fn kind(&self) -> ImageHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            ImageHttpErrorKind::Timeout
        } else if err.is_connect() {
            ImageHttpErrorKind::Connect
        } else if err.is_request() {
            ImageHttpErrorKind::Request
        } else if err.is_body() {
            ImageHttpErrorKind::Body
        } else if err.is_decode() {
            ImageHttpErrorKind::Decode
        } else {
            ImageHttpErrorKind::Unknown
        };
        ImageHttpError {
            kind,
            status: err.status().map(|s| s.as_u16()),
            url: Some(url),
            message: err.to_string(),
            source: Some(anyhow::Error::new(err)),
        }
    }

    fn status_error(status: u16, url: String, preview: String) -> Self {
        ImageHttpError {
            kind: ImageHttpErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message: preview,
            source: None,
        }
    }

    fn decode_error(status: u16, url: String, err: serde_json::Error, preview: String) -> Self {
        ImageHttpError {
            kind: ImageHttpErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            message: format!("failed to decode response body: {} | body={}", err, preview),
            source: Some(anyhow::Error::new(err)),
        }
    }
}

impl fmt::Display for ImageHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image http error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for ImageHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        out.push_str("...");
    }
    out
}

#[derive(Debug, Serialize)]
pub struct DetectLabelsRequest {
    /// Base64 (standard alphabet) encoded image bytes.
    pub image: String,
    pub max_labels: u32,
    pub min_confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectedLabel {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetectLabelsResponse {
    #[serde(default)]
    pub labels: Vec<DetectedLabel>,
}

/// Thin client for the label detection endpoint.
#[derive(Clone)]
pub struct LabelClient {
    api_key: String,
    http: reqwest::Client,
    url_detect: String,
}

impl LabelClient {
    pub fn new(base_url: String, api_key: String, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let normalized = base_url.trim_end_matches('/');
        Ok(Self {
            api_key,
            http,
            url_detect: format!("{}/v1/labels/detect", normalized),
        })
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.api_key)
        }
    }

    pub async fn detect_labels(
        &self,
        image: &[u8],
        min_confidence: f32,
    ) -> anyhow::Result<Vec<DetectedLabel>> {
        let url = &self.url_detect;
        tracing::debug!(
            stage = "image.http.detect.in",
            url = %url,
            bytes = image.len(),
            min_confidence
        );
        let payload = DetectLabelsRequest {
            image: base64::engine::general_purpose::STANDARD.encode(image),
            max_labels: MAX_LABELS,
            min_confidence,
        };
        let req = self.http.post(url).json(&payload);
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| ImageHttpError::from_reqwest(err, url.clone()))?;

        let status = resp.status();
        let url = resp.url().to_string();
        let body = resp
            .text()
            .await
            .map_err(|err| ImageHttpError::from_reqwest(err, url.clone()))?;

        if !status.is_success() {
            let preview = preview_body(&body);
            return Err(ImageHttpError::status_error(status.as_u16(), url, preview).into());
        }

        let parsed: DetectLabelsResponse = serde_json::from_str(&body).map_err(|err| {
            let preview = preview_body(&body);
            ImageHttpError::decode_error(status.as_u16(), url, err, preview)
        })?;
        tracing::debug!(
            stage = "image.http.detect.out",
            status = %status,
            labels = parsed.labels.len()
        );
        Ok(parsed.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
        assert_eq!(preview_body("short"), "short");
    }

    #[test]
    fn test_image_http_error_display_status() {
        let err = ImageHttpError::status_error(
            503,
            "https://vision.local/v1/labels/detect".to_string(),
            "unavailable".to_string(),
        );
        let msg = err.to_string();
        assert!(msg.contains("kind=status"));
        assert!(msg.contains("status=503"));
        assert!(msg.contains("url=https://vision.local/v1/labels/detect"));
        assert!(msg.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_detect_labels_sends_encoded_image() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1/labels/detect")
            .match_header("authorization", "Bearer token")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "image": "AQID",
                "max_labels": 20,
                "min_confidence": 50.0
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"labels":[{"name":"Cat","confidence":97.5},{"name":"Sofa","confidence":61.0}]}"#)
            .create_async()
            .await;

        let client = LabelClient::new(format!("{}/", server.url()), "token".to_string(), 1_000)
            .unwrap();
        let labels = client.detect_labels(&[1, 2, 3], 50.0).await.unwrap();
        m.assert_async().await;
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].name, "Cat");
    }

    #[tokio::test]
    async fn test_detect_labels_status_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/labels/detect")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = LabelClient::new(server.url(), String::new(), 1_000).unwrap();
        let err = client.detect_labels(b"img", 50.0).await.unwrap_err();
        let http = err.downcast_ref::<ImageHttpError>().unwrap();
        assert_eq!(http.kind(), ImageHttpErrorKind::Status);
        assert_eq!(http.status(), Some(502));
    }

    #[tokio::test]
    async fn test_detect_labels_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/labels/detect")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = LabelClient::new(server.url(), String::new(), 1_000).unwrap();
        let err = client.detect_labels(b"img", 50.0).await.unwrap_err();
        let http = err.downcast_ref::<ImageHttpError>().unwrap();
        assert_eq!(http.kind(), ImageHttpErrorKind::Decode);
        assert!(http.to_string().contains("body=not json"));
    }
}
