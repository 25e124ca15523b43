use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Length};

use crate::app::Message;
use crate::state::analysis::{Analysis, SelectedImage};

const PREVIEW_HEIGHT: f32 = 320.0;

/// Left panel: preview, file caption and the upload/analyze buttons.
pub fn upload_panel<'a>(
    selected: Option<&'a SelectedImage>,
    preview: Option<&'a Handle>,
    loading: bool,
) -> Element<'a, Message> {
    let preview_area: Element<'a, Message> = match preview {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(PREVIEW_HEIGHT))
            .into(),
        None => container(
            text("Click Upload Image to choose a PNG, JPG or GIF")
                .size(14)
                .style(text::secondary),
        )
        .width(Length::Fill)
        .height(Length::Fixed(PREVIEW_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into(),
    };

    let caption: Element<'a, Message> = match selected {
        Some(image) => text(image_caption(image))
            .size(13)
            .style(text::secondary)
            .into(),
        None => text("").size(13).into(),
    };

    let analyze_label = if loading { "Analyzing..." } else { "Analyze Image" };
    let can_analyze = selected.is_some() && !loading;

    let content = column![
        text("1. Upload Your Image").size(22),
        preview_area,
        caption,
        row![
            button("Upload Image").on_press(Message::PickImage).padding(10),
            button(analyze_label)
                .on_press_maybe(can_analyze.then_some(Message::Analyze))
                .padding(10),
        ]
        .spacing(12),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::FillPortion(1))
        .padding(20)
        .style(container::rounded_box)
        .into()
}

/// Right panel: copy button header plus the loading/error/result body.
pub fn result_panel<'a>(
    analysis: &'a Analysis,
    notice: Option<&'a str>,
    copied: bool,
) -> Element<'a, Message> {
    let copy_label = if copied { "Copied!" } else { "Copy" };
    let can_copy = analysis.result_text().is_some() && !copied;

    let header = row![
        text("2. Gemini's Analysis").size(22),
        horizontal_space(),
        button(copy_label)
            .on_press_maybe(can_copy.then_some(Message::CopyResult))
            .padding(8),
    ]
    .align_y(Alignment::Center);

    let mut body = column![].spacing(12);

    if analysis.is_loading() {
        body = body.push(text("Analyzing, please wait...").size(16));
    }
    if let Some(message) = notice {
        body = body.push(text(message).style(text::danger));
    }
    body = match analysis {
        // TODO: render the Markdown the prompt asks for instead of raw text
        Analysis::Complete(result) => body.push(text(result)),
        Analysis::Failed(message) => body.push(text(message).style(text::danger)),
        Analysis::Idle if notice.is_none() => body.push(
            text("The analysis of your image will appear here.").style(text::secondary),
        ),
        _ => body,
    };

    let content = column![header, scrollable(body).height(Length::Fill)].spacing(16);

    container(content)
        .width(Length::FillPortion(1))
        .height(Length::Fixed(PREVIEW_HEIGHT + 140.0))
        .padding(20)
        .style(container::rounded_box)
        .into()
}

fn image_caption(image: &SelectedImage) -> String {
    let kib = (image.bytes.len() as f64 / 1024.0).max(1.0).round() as u64;
    match image.dimensions {
        Some((width, height)) => {
            format!("{} ({}x{}, {} KB)", image.file_name, width, height, kib)
        }
        None => format!("{} ({} KB)", image.file_name, kib),
    }
}
