use std::f32::consts::FRAC_PI_4;

use crate::models::{Contour, Detection};

/// Edge density separating round outlines from boxy ones
const ROUND_BOXY_SPLIT: f32 = 0.9;

/// Label a contour by its outline shape and score how well it fits
pub fn classify(contour: &Contour) -> Detection {
    let density = contour.edge_density();
    let round = density < ROUND_BOXY_SPLIT;

    let label = match (round, contour.is_roughly_square()) {
        (true, true) => "circle",
        (true, false) => "ellipse",
        (false, true) => "square",
        (false, false) => "rectangle",
    };

    let ideal = if round { FRAC_PI_4 } else { 1.0 };
    let score = 1.0 - (density - ideal).abs() / ideal;

    Detection::new(contour.bbox(), label, score)
}
