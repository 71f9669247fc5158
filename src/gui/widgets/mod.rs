use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke};
use iced::widget::image::Handle;
use iced::widget::{container, image, stack, text};
use iced::{
    Color, ContentFit, Element, Length, Point, Rectangle, Renderer, Size, Theme, border, mouse,
};
use iced_widget::container::bordered_box;

use super::state::FRAME_HEIGHT;
use crate::models::{ImageDimensions, NormalizedDetection};

const BOX_COLOR: Color = Color::from_rgb(0.0, 0.0, 1.0);
const BOX_STROKE: f32 = 4.0;
const CAPTION_SIZE: f32 = 17.0;
const FRAME_BORDER: f32 = 3.0;
pub const FRAME_MIN_WIDTH: f32 = 200.0;

/// Size the image is drawn at: the display size its detections were scaled to
pub fn image_bounds(display: Option<ImageDimensions>) -> Option<Size> {
    display
        .filter(ImageDimensions::is_usable)
        .map(|size| Size::new(size.width, size.height))
}

/// Inner width of the detector frame, never narrower than `FRAME_MIN_WIDTH`
pub fn frame_width(display: Option<ImageDimensions>) -> Length {
    match image_bounds(display) {
        Some(size) => Length::Fixed(size.width.max(FRAME_MIN_WIDTH)),
        None => Length::Shrink,
    }
}

/// Draws one labelled rectangle per detection, in display pixels
struct Overlay<'a> {
    detections: &'a [NormalizedDetection],
}

impl<Message> canvas::Program<Message> for Overlay<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        for detection in self.detections {
            let bbox = detection.bbox;
            frame.stroke(
                &Path::rectangle(Point::new(bbox.x, bbox.y), Size::new(bbox.width, bbox.height)),
                Stroke::default()
                    .with_width(BOX_STROKE)
                    .with_color(BOX_COLOR),
            );
            // Caption sits just above the top-left corner
            frame.fill_text(canvas::Text {
                content: detection.caption(),
                position: Point::new(bbox.x - 5.0, bbox.y - 1.5 * CAPTION_SIZE),
                color: BOX_COLOR,
                size: CAPTION_SIZE.into(),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

/// Bordered frame holding the image with its detection overlay.
///
/// Once `display` is known the image is stretched to exactly that size so
/// the overlay and the pixels share one coordinate space.
pub fn detector_frame<'a, Message: 'a>(
    image_handle: Option<&Handle>,
    display: Option<ImageDimensions>,
    detections: &'a [NormalizedDetection],
) -> Element<'a, Message> {
    let content: Element<'a, Message> = match (image_handle, image_bounds(display)) {
        (Some(handle), Some(size)) => stack![
            image(handle.clone())
                .width(Length::Fixed(size.width))
                .height(Length::Fixed(size.height))
                .content_fit(ContentFit::Fill),
            Canvas::new(Overlay { detections })
                .width(Length::Fill)
                .height(Length::Fill),
        ]
        .into(),
        // Still loading: nothing to overlay yet
        (Some(handle), None) => image(handle.clone())
            .height(Length::Fixed(FRAME_HEIGHT))
            .into(),
        (None, _) => container(text("No image selected"))
            .center_x(Length::Fixed(FRAME_MIN_WIDTH))
            .into(),
    };

    container(content)
        .padding(FRAME_BORDER)
        .center_x(frame_width(display))
        .center_y(Length::Fixed(FRAME_HEIGHT + 2.0 * FRAME_BORDER))
        .style(|theme: &Theme| {
            bordered_box(theme).border(border::rounded(5).width(FRAME_BORDER).color(Color::WHITE))
        })
        .into()
}
