use anyhow::{Result, anyhow};
use boxsight::{BoundingBox, Detection, DetectionModel, ImageSource, ModelConfig, ModelLoader};
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Luma, Rgb};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What the scripted model does for images of a given width
#[derive(Clone)]
pub enum Script {
    Detect(Vec<Detection>),
    DetectAfter(Duration, Vec<Detection>),
    Fail(&'static str),
}

/// Test double for the detection model, keyed by image width
#[derive(Clone, Default)]
pub struct ScriptedLoader {
    scripts: Arc<HashMap<u32, Script>>,
    loads: Arc<AtomicUsize>,
    fail_loads: usize,
}

impl ScriptedLoader {
    pub fn new(scripts: impl IntoIterator<Item = (u32, Script)>) -> Self {
        Self {
            scripts: Arc::new(scripts.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make the first `count` loads fail
    pub fn failing_loads(mut self, count: usize) -> Self {
        self.fail_loads = count;
        self
    }

    /// Shared counter of `load` calls
    pub fn load_counter(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }
}

pub struct ScriptedModel {
    scripts: Arc<HashMap<u32, Script>>,
}

impl ModelLoader for ScriptedLoader {
    type Model = ScriptedModel;

    async fn load(&self, _config: &ModelConfig) -> Result<ScriptedModel> {
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_loads {
            return Err(anyhow!("model weights unavailable"));
        }
        Ok(ScriptedModel {
            scripts: self.scripts.clone(),
        })
    }
}

impl DetectionModel for ScriptedModel {
    async fn detect(&self, image: &DynamicImage, max_results: usize) -> Result<Vec<Detection>> {
        let (width, _) = image.dimensions();
        match self.scripts.get(&width).cloned() {
            Some(Script::Detect(detections)) => Ok(detections.into_iter().take(max_results).collect()),
            Some(Script::DetectAfter(delay, detections)) => {
                tokio::time::sleep(delay).await;
                Ok(detections.into_iter().take(max_results).collect())
            }
            Some(Script::Fail(reason)) => Err(anyhow!(reason)),
            None => Ok(Vec::new()),
        }
    }
}

/// Encodes a solid-colour PNG of the given size
pub fn png_source(width: u32, height: u32) -> ImageSource {
    let img = ImageBuffer::from_pixel(width, height, Rgb([40u8, 120u8, 200u8]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test image");
    ImageSource::from_bytes(bytes)
}

/// Black image with white filled rectangles at (x, y, w, h)
pub fn shapes_image(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> DynamicImage {
    let img = ImageBuffer::from_fn(width, height, |px, py| {
        let inside = rects
            .iter()
            .any(|&(x, y, w, h)| px >= x && px < x + w && py >= y && py < y + h);
        if inside { Luma([255u8]) } else { Luma([0u8]) }
    });
    DynamicImage::ImageLuma8(img)
}

pub fn detection(x: f32, y: f32, w: f32, h: f32, label: &str, score: f32) -> Detection {
    Detection::new(BoundingBox::new(x, y, w, h), label, score)
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}
