pub mod fake;
pub mod http_client;
pub mod label_service;

pub use fake::FakeImageService;
pub use http_client::{ImageHttpError, ImageHttpErrorKind};
pub use label_service::LabelDetectionImageService;
