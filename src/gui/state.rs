use iced::widget::image::Handle;

use crate::config::DetectionSettings;
use crate::detection::ContourLoader;
use crate::display::FitHeight;
use crate::orchestrator::Orchestrator;

/// Height of the detector frame the image is fitted into
pub const FRAME_HEIGHT: f32 = 400.0;

pub struct AppState {
    pub orchestrator: Orchestrator<ContourLoader, FitHeight>,
    /// Image currently shown in the frame
    pub image: Option<Handle>,
}

impl AppState {
    pub fn new(settings: DetectionSettings) -> Self {
        Self {
            orchestrator: Orchestrator::new(
                ContourLoader,
                FitHeight {
                    height: FRAME_HEIGHT,
                },
                settings,
            ),
            image: None,
        }
    }
}
