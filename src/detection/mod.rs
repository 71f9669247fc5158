pub mod contours;
pub mod preprocessing;
pub mod shapes;

use anyhow::Result;
use image::DynamicImage;
use log::debug;

use crate::model::{DetectionModel, ModelConfig, ModelLoader};
use crate::models::Detection;

/// Edge and region parameters for the contour detector
#[derive(Debug, Clone, PartialEq)]
pub struct ContourParams {
    pub blur_sigma: f32,
    pub low_threshold: f32,
    pub high_threshold: f32,
    /// Smallest edge region (in pixels) worth reporting
    pub min_pixels: u32,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.5,
            low_threshold: 50.0,
            high_threshold: 100.0,
            min_pixels: 10,
        }
    }
}

/// Loads the bundled contour detector
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourLoader;

impl ModelLoader for ContourLoader {
    type Model = ContourModel;

    async fn load(&self, config: &ModelConfig) -> Result<ContourModel> {
        Ok(ContourModel::new(config))
    }
}

/// Shape detector built from edge detection and connected regions.
///
/// Reports outlines as `circle`, `ellipse`, `square` or `rectangle`.
#[derive(Debug, Clone)]
pub struct ContourModel {
    pub params: ContourParams,
    pub min_score: f32,
}

impl ContourModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            params: config.contour.clone(),
            min_score: config.min_score,
        }
    }

    /// Run detection synchronously
    pub fn detect_shapes(&self, img: &DynamicImage, max_results: usize) -> Vec<Detection> {
        let edges = preprocessing::edge_map(img, &self.params);
        let regions = contours::find_contours(&edges, self.params.min_pixels);
        debug!("Found {} edge regions", regions.len());

        let mut detections: Vec<Detection> = regions
            .iter()
            .map(shapes::classify)
            .filter(|d| d.score >= self.min_score)
            .collect();

        detections.sort_by(|a, b| b.score.total_cmp(&a.score));
        detections.truncate(max_results);
        detections
    }
}

impl DetectionModel for ContourModel {
    async fn detect(&self, image: &DynamicImage, max_results: usize) -> Result<Vec<Detection>> {
        Ok(self.detect_shapes(image, max_results))
    }
}
