use anyhow::{Context, Result};
use image::DynamicImage;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::detection::ContourParams;
use crate::models::Detection;

pub const DEFAULT_MIN_SCORE: f32 = 0.5;

/// Options handed to `ModelLoader::load`
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Detections scoring below this are not reported
    pub min_score: f32,
    pub contour: ContourParams,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            contour: ContourParams::default(),
        }
    }
}

/// Produces a ready-to-use detection model
pub trait ModelLoader: Send + Sync + 'static {
    type Model: DetectionModel;

    fn load(&self, config: &ModelConfig) -> impl Future<Output = Result<Self::Model>> + Send;
}

/// Object detector over a decoded image
pub trait DetectionModel: Send + Sync + 'static {
    /// Detect at most `max_results` objects; boxes are in the image's natural pixel space
    fn detect(
        &self,
        image: &DynamicImage,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<Detection>>> + Send;
}

/// Where a selected image comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        ImageSource::Bytes(Arc::from(bytes))
    }

    /// Read and decode the image
    pub async fn decode(&self) -> Result<DynamicImage> {
        match self {
            ImageSource::Path(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("failed to read image {}", path.display()))?;
                image::load_from_memory(&bytes)
                    .with_context(|| format!("failed to decode image {}", path.display()))
            }
            ImageSource::Bytes(bytes) => {
                image::load_from_memory(bytes).context("failed to decode image bytes")
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}
