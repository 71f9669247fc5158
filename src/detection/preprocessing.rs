use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

use super::ContourParams;

/// Grayscale, blur and Canny edges in one pass
pub fn edge_map(img: &DynamicImage, params: &ContourParams) -> GrayImage {
    let gray = img.to_luma8();
    let blurred = gaussian_blur_f32(&gray, params.blur_sigma);
    canny(&blurred, params.low_threshold, params.high_threshold)
}
