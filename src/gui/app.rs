use iced::widget::{button, column, container, image::Handle};
use iced::{Alignment::Center, Element, Length, Task, Theme};
use log::warn;
use rfd::AsyncFileDialog;

use super::{AppState, Message, widgets};
use crate::config::DetectionSettings;
use crate::model::ImageSource;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

pub struct BoxsightApp {
    state: AppState,
}

impl BoxsightApp {
    pub fn new() -> (Self, Task<Message>) {
        let settings = DetectionSettings::load(None).unwrap_or_else(|err| {
            warn!("Using default settings: {err:#}");
            DetectionSettings::default()
        });
        (
            Self {
                state: AppState::new(settings),
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFilePicker => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Select Image")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file(),
                |handle| Message::ImagePicked(handle.map(|file| file.path().to_path_buf())),
            ),
            Message::ImagePicked(Some(path)) => {
                self.state.image = Some(Handle::from_path(&path));
                let pending = self.state.orchestrator.select_image(ImageSource::Path(path));
                Task::perform(pending.run(), Message::DetectionFinished)
            }
            Message::ImagePicked(None) => Task::none(),
            Message::DetectionFinished(outcome) => {
                self.state.orchestrator.apply(outcome);
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let pipeline = self.state.orchestrator.state();

        let content = column![
            widgets::detector_frame(
                self.state.image.as_ref(),
                self.state.orchestrator.display_size(),
                pipeline.detections(),
            ),
            button(pipeline.button_label()).on_press(Message::OpenFilePicker),
        ]
        .spacing(32)
        .align_x(Center);

        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}
