mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from boxsight for tests
pub use boxsight::{
    Applied, BoundingBox, Detection, DetectionSettings, FixedSurface, ImageDimensions,
    ImageSource, NormalizedDetection, Orchestrator, PipelineState, Unrendered,
};
