use boxsight::gui::BoxsightApp;

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(BoxsightApp::new, BoxsightApp::update, BoxsightApp::view)
        .title("Boxsight - Object Detection")
        .theme(BoxsightApp::theme)
        .run()
}
