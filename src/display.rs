use crate::models::ImageDimensions;

/// Lookup for the size an image is currently rendered at.
///
/// Queried once per committed detection run, never cached across runs.
pub trait DisplaySurface {
    /// Rendered size for an image with the given natural size, or `None`
    /// when nothing has been laid out.
    fn rendered_size(&self, natural: ImageDimensions) -> Option<ImageDimensions>;
}

/// Rendered at its natural size
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalSize;

impl DisplaySurface for NaturalSize {
    fn rendered_size(&self, natural: ImageDimensions) -> Option<ImageDimensions> {
        Some(natural)
    }
}

/// Rendered at an explicit size regardless of the source
#[derive(Debug, Clone, Copy)]
pub struct FixedSurface(pub ImageDimensions);

impl DisplaySurface for FixedSurface {
    fn rendered_size(&self, _natural: ImageDimensions) -> Option<ImageDimensions> {
        Some(self.0)
    }
}

/// Scaled to a fixed height, width following the aspect ratio
#[derive(Debug, Clone, Copy)]
pub struct FitHeight {
    pub height: f32,
}

impl DisplaySurface for FitHeight {
    fn rendered_size(&self, natural: ImageDimensions) -> Option<ImageDimensions> {
        if !natural.is_usable() {
            return None;
        }
        let width = natural.width * self.height / natural.height;
        Some(ImageDimensions::new(width, self.height))
    }
}

/// Nothing rendered yet
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrendered;

impl DisplaySurface for Unrendered {
    fn rendered_size(&self, _natural: ImageDimensions) -> Option<ImageDimensions> {
        None
    }
}

impl<F> DisplaySurface for F
where
    F: Fn(ImageDimensions) -> Option<ImageDimensions>,
{
    fn rendered_size(&self, natural: ImageDimensions) -> Option<ImageDimensions> {
        self(natural)
    }
}
