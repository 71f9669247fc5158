use crate::models::{
    BoundingBox, Detection, ImageDimensions, NormalizedDetection, clamp_score, is_usable_side,
};

/// Display size assumed when the rendered image has not been laid out yet
pub const FALLBACK_DISPLAY: ImageDimensions = ImageDimensions {
    width: 150.0,
    height: 500.0,
};

/// Rescale model-space detections into display-space pixels.
///
/// x and width follow the width ratio, y and height the height ratio.
/// A missing or zero display axis is replaced by the matching `fallback`
/// axis. Without a usable `model_size` the boxes are passed through as-is.
pub fn normalize_detections(
    detections: &[Detection],
    model_size: Option<ImageDimensions>,
    display_size: Option<ImageDimensions>,
    fallback: ImageDimensions,
) -> Vec<NormalizedDetection> {
    let Some(model_size) = model_size.filter(ImageDimensions::is_usable) else {
        return detections.iter().map(|d| with_bbox(d, d.bbox)).collect();
    };

    let display_width = display_size
        .map(|size| size.width)
        .filter(|w| is_usable_side(*w))
        .unwrap_or(fallback.width);
    let display_height = display_size
        .map(|size| size.height)
        .filter(|h| is_usable_side(*h))
        .unwrap_or(fallback.height);

    detections
        .iter()
        .map(|detection| {
            let bbox = detection.bbox;
            with_bbox(
                detection,
                BoundingBox {
                    x: bbox.x * display_width / model_size.width,
                    y: bbox.y * display_height / model_size.height,
                    width: bbox.width * display_width / model_size.width,
                    height: bbox.height * display_height / model_size.height,
                },
            )
        })
        .collect()
}

fn with_bbox(detection: &Detection, bbox: BoundingBox) -> NormalizedDetection {
    NormalizedDetection {
        bbox,
        label: detection.label.clone(),
        score: clamp_score(detection.score),
    }
}
