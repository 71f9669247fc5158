use std::path::PathBuf;

use crate::orchestrator::DetectionOutcome;

#[derive(Debug, Clone)]
pub enum Message {
    OpenFilePicker,
    ImagePicked(Option<PathBuf>),
    DetectionFinished(DetectionOutcome),
}
