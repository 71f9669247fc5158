use anyhow::Result;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::config::DetectionSettings;
use crate::display::DisplaySurface;
use crate::model::{DetectionModel, ImageSource, ModelConfig, ModelLoader};
use crate::models::{Detection, ImageDimensions, NormalizedDetection};
use crate::normalize::normalize_detections;

pub const BUSY_LABEL: &str = "Recognizing...";
pub const IDLE_LABEL: &str = "Select Image";

/// Identifies one image-selection cycle; increases with every selection
pub type Generation = u64;

/// What the UI should show
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    /// No image selected yet
    #[default]
    Idle,
    /// Current image is being decoded or run through the model
    Loading,
    /// Current image processed; may hold no detections
    Ready(Vec<NormalizedDetection>),
}

impl PipelineState {
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Loading)
    }

    pub fn detections(&self) -> &[NormalizedDetection] {
        match self {
            PipelineState::Ready(detections) => detections,
            _ => &[],
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_busy() { BUSY_LABEL } else { IDLE_LABEL }
    }
}

/// Why a run produced no detections
#[derive(Debug, Clone)]
pub enum PipelineFailure {
    Decode(Arc<anyhow::Error>),
    Model(Arc<anyhow::Error>),
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineFailure::Decode(err) => write!(f, "image decode failed: {err:#}"),
            PipelineFailure::Model(err) => write!(f, "detection model failed: {err:#}"),
        }
    }
}

impl std::error::Error for PipelineFailure {}

/// Model output for one image, still in model-space
#[derive(Debug, Clone)]
pub struct RawDetections {
    pub model_size: ImageDimensions,
    pub detections: Vec<Detection>,
}

/// Result of a finished run, tagged with the generation that started it
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    generation: Generation,
    result: Result<RawDetections, PipelineFailure>,
}

impl DetectionOutcome {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn result(&self) -> &Result<RawDetections, PipelineFailure> {
        &self.result
    }
}

/// Whether `Orchestrator::apply` changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed,
    /// A newer selection exists, or this generation already committed
    Stale,
}

/// Lazily loaded model shared by every run of one orchestrator
struct SharedModel<L: ModelLoader> {
    loader: L,
    config: ModelConfig,
    cell: OnceCell<L::Model>,
}

impl<L: ModelLoader> SharedModel<L> {
    async fn get(&self) -> Result<&L::Model> {
        self.cell
            .get_or_try_init(|| async {
                info!("Loading detection model");
                self.loader.load(&self.config).await
            })
            .await
    }
}

/// An in-flight detection for one selected image.
///
/// Owns everything it needs so `run` can be driven on any executor.
pub struct PendingDetection<L: ModelLoader> {
    generation: Generation,
    source: ImageSource,
    model: Arc<SharedModel<L>>,
    max_results: usize,
}

impl<L: ModelLoader> PendingDetection<L> {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Decode the image and run the model over it
    pub async fn run(self) -> DetectionOutcome {
        let result = self.detect().await;
        DetectionOutcome {
            generation: self.generation,
            result,
        }
    }

    async fn detect(&self) -> Result<RawDetections, PipelineFailure> {
        let image = self
            .source
            .decode()
            .await
            .map_err(|err| PipelineFailure::Decode(Arc::new(err)))?;
        let model_size = ImageDimensions::of(&image);

        let model = self
            .model
            .get()
            .await
            .map_err(|err| PipelineFailure::Model(Arc::new(err)))?;
        let detections = model
            .detect(&image, self.max_results)
            .await
            .map_err(|err| PipelineFailure::Model(Arc::new(err)))?;

        Ok(RawDetections {
            model_size,
            detections,
        })
    }
}

/// Drives image selection → model → normalized detections.
///
/// The single writer of `PipelineState`. Runs are started with
/// `select_image` and their outcomes fed back through `apply`; only the
/// outcome of the newest selection is ever committed.
pub struct Orchestrator<L: ModelLoader, S: DisplaySurface> {
    state: PipelineState,
    generation: Generation,
    committed: Option<Generation>,
    current_image: Option<ImageSource>,
    display_size: Option<ImageDimensions>,
    model: Arc<SharedModel<L>>,
    surface: S,
    settings: DetectionSettings,
}

impl<L: ModelLoader, S: DisplaySurface> Orchestrator<L, S> {
    pub fn new(loader: L, surface: S, settings: DetectionSettings) -> Self {
        let model = Arc::new(SharedModel {
            loader,
            config: settings.model.clone(),
            cell: OnceCell::new(),
        });
        Self {
            state: PipelineState::Idle,
            generation: 0,
            committed: None,
            current_image: None,
            display_size: None,
            model,
            surface,
            settings,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn current_image(&self) -> Option<&ImageSource> {
        self.current_image.as_ref()
    }

    /// Display size the current detections were scaled to
    pub fn display_size(&self) -> Option<ImageDimensions> {
        self.display_size
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Make `source` the current image and start a new generation.
    ///
    /// Prior detections are dropped before the returned run is polled.
    pub fn select_image(&mut self, source: ImageSource) -> PendingDetection<L> {
        self.generation += 1;
        info!(
            "Selected {} (generation {})",
            source.describe(),
            self.generation
        );

        self.state = PipelineState::Loading;
        self.display_size = None;
        self.current_image = Some(source.clone());

        PendingDetection {
            generation: self.generation,
            source,
            model: Arc::clone(&self.model),
            max_results: self.settings.max_results,
        }
    }

    /// Commit a finished run if it belongs to the current generation
    pub fn apply(&mut self, outcome: DetectionOutcome) -> Applied {
        if outcome.generation != self.generation || self.committed == Some(outcome.generation) {
            debug!(
                "Discarding result for generation {} (current {})",
                outcome.generation, self.generation
            );
            return Applied::Stale;
        }

        let detections = match outcome.result {
            Ok(raw) => {
                let display_size = self.surface.rendered_size(raw.model_size);
                self.display_size = display_size;

                let mut detections = raw.detections;
                detections.truncate(self.settings.max_results);
                normalize_detections(
                    &detections,
                    Some(raw.model_size),
                    display_size,
                    self.settings.fallback_display,
                )
            }
            Err(failure) => {
                warn!("Generation {} produced no detections: {failure}", outcome.generation);
                Vec::new()
            }
        };

        info!(
            "Generation {} ready with {} detection(s)",
            outcome.generation,
            detections.len()
        );
        self.committed = Some(outcome.generation);
        self.state = PipelineState::Ready(detections);
        Applied::Committed
    }

    /// Select `source` and wait for its result
    pub async fn detect_now(&mut self, source: ImageSource) -> &PipelineState {
        let outcome = self.select_image(source).run().await;
        self.apply(outcome);
        &self.state
    }
}
