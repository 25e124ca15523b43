use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use iced::widget::image::Handle;
use iced::widget::{column, container, row, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;

use crate::clipboard;
use crate::gemini::{self, ClientError};
use crate::state::analysis::{media_type_for_path, Analysis, SelectedImage};
use crate::ui;

/// How long the copy confirmation stays visible before reverting
const COPY_CONFIRMATION_WINDOW: Duration = Duration::from_secs(2);

/// Main application state
pub struct ImageAnalyzer {
    /// The image currently selected for analysis, if any
    selected: Option<SelectedImage>,
    /// Renderable preview built from the selected image's bytes
    preview: Option<Handle>,
    /// Lifecycle of the current analysis request
    analysis: Analysis,
    /// Transient message for local failures (invalid file, clipboard, ...)
    /// that must not clobber a stored result
    notice: Option<String>,
    /// Whether the copy confirmation is currently showing
    copied: bool,
    /// Request generation; a completion with a stale token is discarded
    request_seq: u64,
    /// Copy generation; a timed reset with a stale token is ignored
    copy_seq: u64,
    /// Clipboard sink; swapped out in tests so the update loop can be
    /// driven without touching the real OS clipboard
    copy_sink: fn(&str) -> Result<(), String>,
}

impl Default for ImageAnalyzer {
    fn default() -> Self {
        ImageAnalyzer {
            selected: None,
            preview: None,
            analysis: Analysis::default(),
            notice: None,
            copied: false,
            request_seq: 0,
            copy_seq: 0,
            copy_sink: clipboard::copy_text,
        }
    }
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the "Upload Image" button
    PickImage,
    /// Background file read completed
    ImageLoaded(Result<SelectedImage, String>),
    /// User clicked the "Analyze Image" button
    Analyze,
    /// The inference call for request `token` completed
    AnalysisComplete(u64, Result<String, ClientError>),
    /// User clicked the "Copy" button
    CopyResult,
    /// The confirmation window for copy `token` elapsed
    CopyReset(u64),
}

impl ImageAnalyzer {
    /// Create a new instance of the application
    pub fn new() -> (Self, Task<Message>) {
        (Self::default(), Task::none())
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                // Show the native file picker dialog
                let picked = FileDialog::new().set_title("Select an Image").pick_file();

                if let Some(path) = picked {
                    return Task::perform(load_selected_image(path), Message::ImageLoaded);
                }

                Task::none()
            }
            Message::ImageLoaded(Ok(selected)) => {
                if !selected.is_image() {
                    log::warn!(
                        "Rejected non-image selection: {} ({})",
                        selected.file_name,
                        selected.media_type
                    );
                    // Invalid selection leaves no image selected; any prior
                    // result stays on screen next to the message
                    self.selected = None;
                    self.preview = None;
                    self.notice = Some("Please upload a valid image file.".to_string());
                    return Task::none();
                }

                log::info!(
                    "Selected {} ({}, {} bytes)",
                    selected.file_name,
                    selected.media_type,
                    selected.bytes.len()
                );

                self.preview = Some(Handle::from_bytes(selected.bytes.clone()));
                self.selected = Some(selected);
                self.analysis = Analysis::Idle;
                self.notice = None;
                self.copied = false;

                Task::none()
            }
            Message::ImageLoaded(Err(message)) => {
                self.notice = Some(message);
                Task::none()
            }
            Message::Analyze => {
                // One request in flight at a time; a second trigger while
                // loading is rejected, not queued
                if self.analysis.is_loading() {
                    return Task::none();
                }

                let Some(selected) = &self.selected else {
                    self.notice = Some("Please upload an image first.".to_string());
                    return Task::none();
                };

                self.request_seq += 1;
                let token = self.request_seq;
                self.analysis = Analysis::Loading { token };
                self.notice = None;
                self.copied = false;

                let bytes = selected.bytes.clone();
                let media_type = selected.media_type.clone();

                Task::perform(gemini::analyze_image(bytes, media_type), move |outcome| {
                    Message::AnalysisComplete(token, outcome)
                })
            }
            Message::AnalysisComplete(token, outcome) => {
                if !self.analysis.is_current(token) {
                    // A newer selection or trigger superseded this request
                    log::debug!("Discarding stale analysis response (token {})", token);
                    return Task::none();
                }

                self.analysis = match outcome {
                    Ok(text) => Analysis::Complete(text),
                    Err(error) => Analysis::Failed(error.to_string()),
                };

                Task::none()
            }
            Message::CopyResult => {
                let Some(result_text) = self.analysis.result_text() else {
                    return Task::none();
                };
                if self.copied {
                    return Task::none();
                }

                match (self.copy_sink)(result_text) {
                    Ok(()) => {
                        self.copied = true;
                        self.copy_seq += 1;
                        let token = self.copy_seq;

                        Task::perform(tokio::time::sleep(COPY_CONFIRMATION_WINDOW), move |_| {
                            Message::CopyReset(token)
                        })
                    }
                    Err(message) => {
                        log::error!("{}", message);
                        self.notice = Some(message);
                        Task::none()
                    }
                }
            }
            Message::CopyReset(token) => {
                // A reset scheduled for an older copy must not clobber a
                // newer copy's confirmation
                if token == self.copy_seq {
                    self.copied = false;
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let header = column![
            text("Image Analyzer").size(44),
            text("Upload any photo and let Gemini provide a comprehensive interpretation.")
                .size(16),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let panels = row![
            ui::panels::upload_panel(
                self.selected.as_ref(),
                self.preview.as_ref(),
                self.analysis.is_loading(),
            ),
            ui::panels::result_panel(&self.analysis, self.notice.as_deref(), self.copied),
        ]
        .spacing(24);

        let content = column![header, panels]
            .spacing(24)
            .padding(32)
            .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Async function to read the picked file and derive its media type
/// Runs in the background to avoid blocking the UI
async fn load_selected_image(path: PathBuf) -> Result<SelectedImage, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let media_type = media_type_for_path(&path);
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    // Probe the pixel dimensions for the preview caption
    let dimensions = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());

    Ok(SelectedImage {
        file_name,
        media_type,
        bytes,
        dimensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    thread_local! {
        static COPIED_TEXT: RefCell<Option<String>> = const { RefCell::new(None) };
    }

    fn recording_sink(text: &str) -> Result<(), String> {
        COPIED_TEXT.with(|slot| *slot.borrow_mut() = Some(text.to_string()));
        Ok(())
    }

    fn failing_sink(_text: &str) -> Result<(), String> {
        Err("Failed to copy text to clipboard: access denied".to_string())
    }

    fn rejecting_sink(_text: &str) -> Result<(), String> {
        panic!("the clipboard must not be touched on this path");
    }

    fn app() -> ImageAnalyzer {
        ImageAnalyzer::default()
    }

    fn png() -> SelectedImage {
        SelectedImage {
            file_name: "cat.png".to_string(),
            media_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
            dimensions: Some((2, 2)),
        }
    }

    fn text_file() -> SelectedImage {
        SelectedImage {
            file_name: "notes.txt".to_string(),
            media_type: "text/plain".to_string(),
            bytes: b"not an image".to_vec(),
            dimensions: None,
        }
    }

    #[test]
    fn non_image_selection_sets_error_and_leaves_image_unset() {
        let mut app = app();

        let _ = app.update(Message::ImageLoaded(Ok(text_file())));

        assert!(app.selected.is_none());
        assert!(app.preview.is_none());
        assert_eq!(
            app.notice.as_deref(),
            Some("Please upload a valid image file.")
        );
    }

    #[test]
    fn non_image_selection_keeps_prior_result() {
        let mut app = app();
        app.analysis = Analysis::Complete("old result".to_string());

        let _ = app.update(Message::ImageLoaded(Ok(text_file())));

        assert_eq!(app.analysis.result_text(), Some("old result"));
    }

    #[test]
    fn image_selection_clears_prior_result_and_error() {
        let mut app = app();
        app.analysis = Analysis::Failed("old error".to_string());
        app.notice = Some("old notice".to_string());
        app.copied = true;

        let _ = app.update(Message::ImageLoaded(Ok(png())));

        assert!(app.selected.is_some());
        assert!(app.preview.is_some());
        assert_eq!(app.analysis, Analysis::Idle);
        assert!(app.notice.is_none());
        assert!(!app.copied);
    }

    #[test]
    fn analyze_without_image_sets_error_and_stays_idle() {
        let mut app = app();

        let _ = app.update(Message::Analyze);

        assert_eq!(app.notice.as_deref(), Some("Please upload an image first."));
        assert_eq!(app.analysis, Analysis::Idle);
        assert_eq!(app.request_seq, 0);
    }

    #[test]
    fn analyze_while_loading_is_rejected() {
        let mut app = app();
        app.selected = Some(png());
        app.analysis = Analysis::Loading { token: 7 };
        app.request_seq = 7;

        let _ = app.update(Message::Analyze);

        assert_eq!(app.analysis, Analysis::Loading { token: 7 });
        assert_eq!(app.request_seq, 7);
    }

    #[test]
    fn select_trigger_complete_scenario() {
        let mut app = app();

        let _ = app.update(Message::ImageLoaded(Ok(png())));
        let _ = app.update(Message::Analyze);

        assert!(app.analysis.is_loading());
        assert!(app.notice.is_none());

        let token = app.request_seq;
        let _ = app.update(Message::AnalysisComplete(
            token,
            Ok("# Cat\nA photo of a cat.".to_string()),
        ));

        assert_eq!(app.analysis.result_text(), Some("# Cat\nA photo of a cat."));
        assert!(app.notice.is_none());
        assert!(!app.analysis.is_loading());
    }

    #[test]
    fn failed_call_surfaces_underlying_message() {
        let mut app = app();
        app.analysis = Analysis::Loading { token: 1 };
        app.request_seq = 1;

        let _ = app.update(Message::AnalysisComplete(
            1,
            Err(ClientError::Api("connection refused".to_string())),
        ));

        match &app.analysis {
            Analysis::Failed(message) => assert!(message.contains("connection refused")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut app = app();
        app.analysis = Analysis::Loading { token: 2 };
        app.request_seq = 2;

        let _ = app.update(Message::AnalysisComplete(1, Ok("late".to_string())));

        assert_eq!(app.analysis, Analysis::Loading { token: 2 });
    }

    #[test]
    fn copy_without_result_is_a_noop() {
        let mut app = app();
        app.copy_sink = rejecting_sink;

        let _ = app.update(Message::CopyResult);

        assert!(!app.copied);
        assert!(app.notice.is_none());
    }

    #[test]
    fn copy_while_confirmation_pending_is_a_noop() {
        let mut app = app();
        app.copy_sink = rejecting_sink;
        app.analysis = Analysis::Complete("text".to_string());
        app.copied = true;
        app.copy_seq = 1;

        let _ = app.update(Message::CopyResult);

        assert_eq!(app.copy_seq, 1);
        assert!(app.copied);
    }

    #[tokio::test]
    async fn copy_hands_exact_result_text_to_clipboard() {
        let mut app = app();
        app.copy_sink = recording_sink;
        app.analysis = Analysis::Complete("# Cat\nA photo of a cat.".to_string());

        let _ = app.update(Message::CopyResult);

        assert!(app.copied);
        assert_eq!(
            COPIED_TEXT.with(|slot| slot.borrow().clone()).as_deref(),
            Some("# Cat\nA photo of a cat.")
        );

        // The confirmation reverts once its window elapses
        let _ = app.update(Message::CopyReset(app.copy_seq));
        assert!(!app.copied);
    }

    #[test]
    fn copy_failure_sets_error_and_keeps_result() {
        let mut app = app();
        app.copy_sink = failing_sink;
        app.analysis = Analysis::Complete("text".to_string());

        let _ = app.update(Message::CopyResult);

        assert!(!app.copied);
        assert!(app
            .notice
            .as_deref()
            .is_some_and(|notice| notice.contains("Failed to copy text to clipboard")));
        assert_eq!(app.analysis.result_text(), Some("text"));
    }

    #[test]
    fn stale_copy_reset_is_ignored() {
        let mut app = app();
        app.analysis = Analysis::Complete("text".to_string());
        app.copied = true;
        app.copy_seq = 2;

        let _ = app.update(Message::CopyReset(1));
        assert!(app.copied);

        let _ = app.update(Message::CopyReset(2));
        assert!(!app.copied);
    }
}
