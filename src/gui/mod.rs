mod app;
mod message;
mod state;
mod widgets;

pub use app::BoxsightApp;
pub use message::Message;
pub use state::AppState;
pub use widgets::{FRAME_MIN_WIDTH, frame_width, image_bounds};
