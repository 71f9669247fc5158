use image::{DynamicImage, GenericImageView};

/// Axis-aligned box in whichever pixel space produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// One object reported by a detection model, in model-space
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub label: String,
    pub score: f32,
}

impl Detection {
    /// Build a detection, clamping `score` into `[0, 1]`
    pub fn new(bbox: BoundingBox, label: impl Into<String>, score: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            score: clamp_score(score),
        }
    }
}

pub(crate) fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Width and height of an image, either natural (decoded) or as rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDimensions {
    pub width: f32,
    pub height: f32,
}

impl ImageDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Natural size of a decoded image
    pub fn of(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_pixels(width, height)
    }

    /// Both sides are finite and strictly positive
    pub fn is_usable(&self) -> bool {
        is_usable_side(self.width) && is_usable_side(self.height)
    }
}

pub(crate) fn is_usable_side(side: f32) -> bool {
    side.is_finite() && side > 0.0
}

/// A detection rescaled into display-space pixels
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDetection {
    pub bbox: BoundingBox,
    pub label: String,
    pub score: f32,
}

impl NormalizedDetection {
    /// Overlay text, e.g. `cat 87.00`
    pub fn caption(&self) -> String {
        format!("{} {:.2}", self.label, self.score * 100.0)
    }
}

/// Connected edge region found by the contour detector
#[derive(Debug, Clone)]
pub struct Contour {
    pub label: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u32,
}

impl Contour {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn aspect_ratio(&self) -> f32 {
        let w = self.width() as f32;
        let h = self.height() as f32;
        if h == 0.0 {
            return 0.0;
        }
        w / h
    }

    pub fn perimeter(&self) -> f32 {
        // Perimeter of the bounding box
        2.0 * (self.width() as f32 + self.height() as f32)
    }

    /// Edge pixels relative to the bounding box perimeter.
    ///
    /// A rectangle outline sits close to 1.0, an inscribed ellipse close to π/4.
    pub fn edge_density(&self) -> f32 {
        let perimeter = self.perimeter();
        if perimeter == 0.0 {
            return 0.0;
        }
        self.pixel_count as f32 / perimeter
    }

    pub fn is_roughly_square(&self) -> bool {
        let aspect = self.aspect_ratio();
        (0.7..=1.4).contains(&aspect)
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.min_x as f32,
            self.min_y as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }
}
