pub mod config;
pub mod detection;
pub mod display;
pub mod model;
pub mod models;
pub mod normalize;
pub mod orchestrator;

pub use config::DetectionSettings;
pub use detection::{ContourLoader, ContourModel, ContourParams};
pub use display::{DisplaySurface, FitHeight, FixedSurface, NaturalSize, Unrendered};
pub use model::{DetectionModel, ImageSource, ModelConfig, ModelLoader};
pub use models::{BoundingBox, Contour, Detection, ImageDimensions, NormalizedDetection};
pub use normalize::{FALLBACK_DISPLAY, normalize_detections};
pub use orchestrator::{
    Applied, DetectionOutcome, Generation, Orchestrator, PendingDetection, PipelineFailure,
    PipelineState, RawDetections,
};

#[cfg(feature = "gui")]
pub mod gui;
