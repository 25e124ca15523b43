// Declare the application modules
mod app;
mod clipboard;
mod gemini;
mod state;
mod ui;

use app::ImageAnalyzer;

fn main() -> iced::Result {
    // Pick up GEMINI_API_KEY from a local .env during development;
    // a missing file is fine, the variable can come from the shell
    let _ = dotenvy::dotenv();
    env_logger::init();

    log::info!("Image Analyzer starting (model: {})", gemini::GEMINI_MODEL);

    iced::application("Image Analyzer", ImageAnalyzer::update, ImageAnalyzer::view)
        .theme(ImageAnalyzer::theme)
        .window_size(iced::Size::new(1100.0, 720.0))
        .centered()
        .run_with(ImageAnalyzer::new)
}
